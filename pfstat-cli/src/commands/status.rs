//! `pfstat status` command handler

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use pfstat_core::config::PfstatConfig;
use pfstat_status::StatusSnapshot;

use crate::cli::StatusArgs;
use crate::commands::{read_snapshot, resolve_layout};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `status` command.
///
/// Decodes the dump at `args.path` (or `status.input`) and prints the report.
pub async fn execute(
    args: StatusArgs,
    config: &PfstatConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let layout = resolve_layout(args.layout.as_deref(), config)?;
    let path = args
        .path
        .unwrap_or_else(|| PathBuf::from(&config.status.input));

    info!(path = %path.display(), layout = layout.name, "decoding status dump");
    let snapshot = read_snapshot(&path, &layout).await?;

    let report = StatusReport::new(path.display().to_string(), layout.name, snapshot);
    writer.render(&report)
}

/// Decoded status report.
///
/// JSON output carries the snapshot fields alongside the source path.
/// Text output is the column-aligned report.
#[derive(Serialize)]
pub struct StatusReport {
    /// Dump file path
    pub source: String,
    /// Layout used for decoding
    pub layout: &'static str,
    #[serde(flatten)]
    pub snapshot: StatusSnapshot,
    /// Report text rendered at construction time
    #[serde(skip)]
    pub text: String,
}

impl StatusReport {
    pub fn new(source: String, layout: &'static str, snapshot: StatusSnapshot) -> Self {
        let text = snapshot.render();
        Self {
            source,
            layout,
            snapshot,
            text,
        }
    }
}

impl Render for StatusReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", self.text)
    }
}
