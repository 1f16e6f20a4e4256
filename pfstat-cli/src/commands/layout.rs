//! `pfstat layout` command handler

use std::io::Write;

use serde::Serialize;

use pfstat_core::config::PfstatConfig;
use pfstat_pf_common::StatusLayout;

use crate::cli::LayoutArgs;
use crate::commands::resolve_layout;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `layout` command.
pub fn execute(
    args: LayoutArgs,
    config: &PfstatConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let layout = resolve_layout(args.layout.as_deref(), config)?;
    writer.render(&LayoutReport::from(&layout))
}

/// Field table of a record layout.
#[derive(Serialize)]
pub struct LayoutReport {
    pub name: &'static str,
    pub record_len: usize,
    pub fields: Vec<FieldRow>,
}

#[derive(Serialize)]
pub struct FieldRow {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
}

impl From<&StatusLayout> for LayoutReport {
    fn from(layout: &StatusLayout) -> Self {
        Self {
            name: layout.name,
            record_len: layout.record_len(),
            fields: layout
                .fields()
                .into_iter()
                .map(|f| FieldRow {
                    name: f.name,
                    offset: f.offset,
                    size: f.size,
                })
                .collect(),
        }
    }
}

impl Render for LayoutReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Layout {} ({} bytes)",
            self.name.bold(),
            self.record_len
        )?;
        writeln!(w)?;
        writeln!(w, "  {:<12} {:>8} {:>8}", "Field", "Offset", "Size")?;
        for field in &self.fields {
            writeln!(
                w,
                "  {:<12} {:>8} {:>8}",
                field.name, field.offset, field.size
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_report_from_v1() {
        let report = LayoutReport::from(&StatusLayout::V1);
        assert_eq!(report.name, "v1");
        assert_eq!(report.record_len, 392);
        assert_eq!(report.fields.len(), 16);
        assert_eq!(report.fields[0].name, "counters");
        let chksum = report.fields.last().unwrap();
        assert_eq!((chksum.name, chksum.offset, chksum.size), ("pf_chksum", 376, 16));
    }

    #[test]
    fn test_layout_report_render_text() {
        let report = LayoutReport::from(&StatusLayout::V1);
        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("392 bytes"));
        assert!(output.contains(&format!("  {:<12} {:>8} {:>8}\n", "hostid", 352, 4)));
        assert!(output.contains(&format!("  {:<12} {:>8} {:>8}\n", "since", 328, 8)));
    }

    #[test]
    fn test_layout_report_json() {
        let value = serde_json::to_value(LayoutReport::from(&StatusLayout::V1)).unwrap();
        assert_eq!(value["record_len"], 392);
        assert_eq!(value["fields"][1]["name"], "lcounters");
        assert_eq!(value["fields"][1]["offset"], 120);
    }
}
