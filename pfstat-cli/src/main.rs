//! pfstat -- packet filter status decoder CLI

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;
use tracing::debug;

use pfstat_core::config::{GeneralConfig, PfstatConfig};
use pfstat_core::error::PfstatError;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = PfstatConfig::load_or_default(&cli.config).await;
    let general = match log_settings(&loaded, cli.log_level.as_deref()) {
        Ok(general) => general,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }

    debug!(config = %cli.config.display(), "pfstat starting");

    let writer = OutputWriter::new(cli.output);
    if let Err(e) = commands::run(cli.command, &cli.config, loaded, &writer).await {
        debug!(error = ?e, exit_code = e.exit_code(), "command failed");
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}

/// Logging settings from the loaded config with `--log-level` applied.
///
/// A broken config file is reported by the subcommand, so logging falls back
/// to defaults here. The flag is checked with the same rules as the file and
/// environment values.
fn log_settings(
    loaded: &Result<PfstatConfig, PfstatError>,
    level_flag: Option<&str>,
) -> Result<GeneralConfig, CliError> {
    let mut general = match loaded {
        Ok(config) => config.general.clone(),
        Err(_) => GeneralConfig::default(),
    };
    if let Some(level) = level_flag {
        general.log_level = level.to_owned();
        general.validate()?;
    }
    Ok(general)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pfstat_core::error::ConfigError;

    #[test]
    fn test_log_settings_flag_overrides_config() {
        let general = log_settings(&Ok(PfstatConfig::default()), Some("debug"))
            .expect("debug is a valid level");
        assert_eq!(general.log_level, "debug");
    }

    #[test]
    fn test_log_settings_rejects_unknown_flag_level() {
        let err = log_settings(&Ok(PfstatConfig::default()), Some("verbose"))
            .expect_err("verbose is not a level");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("general.log_level"));
    }

    #[test]
    fn test_log_settings_defaults_when_config_is_broken() {
        let broken = Err(PfstatError::Config(ConfigError::ParseFailed {
            reason: "bad toml".to_owned(),
        }));
        let general = log_settings(&broken, None).expect("defaults are valid");
        assert_eq!(general.log_level, "warn");
        assert_eq!(general.log_format, "pretty");
    }
}
