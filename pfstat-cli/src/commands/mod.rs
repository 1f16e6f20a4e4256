//! Command handlers -- one module per subcommand

pub mod config;
pub mod diff;
pub mod layout;
pub mod status;

use std::path::Path;

use tracing::debug;

use pfstat_core::config::PfstatConfig;
use pfstat_core::error::PfstatError;
use pfstat_pf_common::StatusLayout;
use pfstat_status::StatusSnapshot;

use crate::cli::Commands;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Dispatch a parsed subcommand.
///
/// `loaded` is the result of loading `config_path` at startup. `config`
/// subcommands reload the file themselves so they can report errors;
/// every other subcommand needs a valid configuration.
pub async fn run(
    command: Commands,
    config_path: &Path,
    loaded: Result<PfstatConfig, PfstatError>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match command {
        Commands::Config(args) => config::execute(args, config_path, writer).await,
        Commands::Status(args) => status::execute(args, &loaded?, writer).await,
        Commands::Diff(args) => diff::execute(args, &loaded?, writer).await,
        Commands::Layout(args) => layout::execute(args, &loaded?, writer),
    }
}

/// Resolve a layout name, falling back to `status.layout` from the config.
pub(crate) fn resolve_layout(
    requested: Option<&str>,
    config: &PfstatConfig,
) -> Result<StatusLayout, CliError> {
    let name = requested.unwrap_or(&config.status.layout);
    StatusLayout::by_name(name).ok_or_else(|| {
        let known: Vec<&str> = StatusLayout::KNOWN.iter().map(|l| l.name).collect();
        CliError::Command(format!(
            "unknown layout '{}' (expected one of: {})",
            name,
            known.join(", ")
        ))
    })
}

/// Read a status dump from disk and decode it.
pub(crate) async fn read_snapshot(
    path: &Path,
    layout: &StatusLayout,
) -> Result<StatusSnapshot, CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::Dump {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        len = bytes.len(),
        layout = layout.name,
        "read status dump"
    );
    Ok(StatusSnapshot::decode(&bytes, layout)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_layout_uses_config_default() {
        let config = PfstatConfig::default();
        let layout = resolve_layout(None, &config).expect("default layout should resolve");
        assert_eq!(layout, StatusLayout::V1);
    }

    #[test]
    fn test_resolve_layout_flag_overrides_config() {
        let mut config = PfstatConfig::default();
        config.status.layout = "v9".to_owned();
        let layout = resolve_layout(Some("v1"), &config).expect("flag should win");
        assert_eq!(layout.name, "v1");
    }

    #[test]
    fn test_resolve_layout_unknown_name() {
        let config = PfstatConfig::default();
        let err = resolve_layout(Some("v9"), &config).expect_err("v9 is not a layout");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("unknown layout 'v9'"));
        assert!(err.to_string().contains("v1"));
    }

    #[tokio::test]
    async fn test_read_snapshot_missing_file() {
        let err = read_snapshot(Path::new("/nonexistent/pfstat/status.bin"), &StatusLayout::V1)
            .await
            .expect_err("missing file should fail");
        assert!(matches!(err, CliError::Dump { .. }));
        assert_eq!(err.exit_code(), 10);
    }

    #[tokio::test]
    async fn test_read_snapshot_truncated_file() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [0u8; 64]).expect("should write dump");

        let err = read_snapshot(&path, &StatusLayout::V1)
            .await
            .expect_err("short dump should fail");
        assert!(matches!(err, CliError::Malformed(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_read_snapshot_zeroed_record() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("zero.bin");
        std::fs::write(&path, vec![0u8; StatusLayout::V1.record_len()]).unwrap();

        let snapshot = read_snapshot(&path, &StatusLayout::V1).await.unwrap();
        assert!(!snapshot.is_running());
        assert_eq!(snapshot.since(), None);
        assert_eq!(snapshot.interface_name(), "");
    }
}
