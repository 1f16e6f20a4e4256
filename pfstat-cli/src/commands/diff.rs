//! `pfstat diff` command handler

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use pfstat_core::config::PfstatConfig;
use pfstat_status::{AddressFamily, CounterGroup, Direction, PacketAction, SnapshotDelta};

use crate::cli::DiffArgs;
use crate::commands::{read_snapshot, resolve_layout};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `diff` command.
///
/// Both dumps must come from the same enable period; counters restart from
/// zero when the filter is re-enabled.
pub async fn execute(
    args: DiffArgs,
    config: &PfstatConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let layout = resolve_layout(args.layout.as_deref(), config)?;

    info!(
        earlier = %args.earlier.display(),
        later = %args.later.display(),
        "comparing status dumps"
    );
    let earlier = read_snapshot(&args.earlier, &layout).await?;
    let later = read_snapshot(&args.later, &layout).await?;

    let delta = later.delta_since(&earlier).ok_or_else(|| {
        CliError::Command(format!(
            "filter was re-enabled between {} and {}; counters are not comparable",
            args.earlier.display(),
            args.later.display()
        ))
    })?;

    let report = DiffReport {
        earlier: args.earlier.display().to_string(),
        later: args.later.display().to_string(),
        interval_secs: args.interval,
        delta,
    };
    writer.render(&report)
}

/// Counter growth between two dumps.
#[derive(Serialize)]
pub struct DiffReport {
    pub earlier: String,
    pub later: String,
    /// Seconds between the dumps, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
    pub delta: SnapshotDelta,
}

impl DiffReport {
    fn interval(&self) -> Option<Duration> {
        self.interval_secs.map(Duration::from_secs)
    }

    fn write_row(&self, w: &mut dyn Write, label: &str, value: u64) -> std::io::Result<()> {
        write!(w, "  {label:<25} {value:>14}")?;
        match self
            .interval()
            .and_then(|interval| SnapshotDelta::rate(value, interval))
        {
            Some(rate) => writeln!(w, " {rate:>14.1}/s"),
            None => writeln!(w),
        }
    }

    fn write_group(
        &self,
        w: &mut dyn Write,
        title: &str,
        current_change: Option<i64>,
        group: &CounterGroup,
    ) -> std::io::Result<()> {
        writeln!(w, "{title}")?;
        if let Some(change) = current_change {
            writeln!(w, "  {:<25} {:>14}", "current entries", format!("{change:+}"))?;
        }
        for (label, value) in group.iter() {
            self.write_row(w, label, value)?;
        }
        Ok(())
    }
}

impl Render for DiffReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        write!(w, "Counter growth: {} -> {}", self.earlier.bold(), self.later.bold())?;
        match self.interval_secs {
            Some(secs) => writeln!(w, " ({secs}s)")?,
            None => writeln!(w)?,
        }
        writeln!(w)?;

        writeln!(w, "{:<27} {:>14} {:>16}", "", "Change", "Rate")?;
        for section in self.delta.sections() {
            self.write_group(w, section.title, section.current_change, section.counters)?;
        }

        let traffic = &self.delta.traffic;
        writeln!(w, "Interface Traffic {:>24} {:>16}", "IPv4", "IPv6")?;
        for dir in Direction::ALL {
            writeln!(
                w,
                "  {:<25} {:>14} {:>16}",
                format!("Bytes {}", dir.label()),
                traffic.bytes(dir, AddressFamily::Inet),
                traffic.bytes(dir, AddressFamily::Inet6),
            )?;
        }
        for dir in Direction::ALL {
            for action in PacketAction::ALL {
                writeln!(
                    w,
                    "  {:<25} {:>14} {:>16}",
                    format!("Packets {} {}", dir.label(), action.label()),
                    traffic.packets(dir, action, AddressFamily::Inet),
                    traffic.packets(dir, action, AddressFamily::Inet6),
                )?;
            }
        }

        Ok(())
    }
}
