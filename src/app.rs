//! Command-line parsing and command routing.

use crate::commands;
use crate::config::{config_path, PresetName};
use crate::logging;
use crate::recorder::ControlLayout;
use crate::setup;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// Terminal voice clip recorder with per-clip playback controls
#[derive(Parser)]
#[command(name = "micdeck")]
#[command(version)]
#[command(
    long_about = "Terminal voice clip recorder with per-clip playback controls.\n\nDEFAULT COMMAND:\n    If no command is specified, 'record' is used by default.\n\nEXAMPLES:\n    # Record with the low quality preset\n    $ micdeck --preset low\n\n    # Show the send control on every recording\n    $ micdeck record --controls extended\n\n    # Toggle the microphone from another terminal\n    $ pkill -USR1 micdeck"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/micdeck/micdeck.toml\n    Logs:               ~/.local/state/micdeck/micdeck.log.*"
)]
struct Cli {
    /// Capture quality preset (overrides the config file)
    #[arg(long, value_enum, global = true)]
    preset: Option<PresetName>,

    /// Controls shown on each recording (overrides the config file)
    #[arg(long, value_enum, global = true)]
    controls: Option<ControlLayout>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the recorder screen (default)
    ///
    /// Space toggles the microphone. Each finished capture is added to the
    /// list with replay, pause, play and delete controls.
    #[command(visible_alias = "r")]
    Record,

    /// List available audio input and output devices
    ///
    /// Shows device IDs, names, and default configurations for the
    /// input_device and output_device settings in micdeck.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries
    ///
    /// Displays the last 50 lines of the most recent log file.
    Logs,

    /// Open the configuration file in your preferred editor
    #[command(visible_alias = "c")]
    Config,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   micdeck completions bash > micdeck.bash
    ///   micdeck completions zsh > _micdeck
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the command selected on the command line.
///
/// # Errors
/// - If logging or first-run setup fails
/// - If the command fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // These write to the terminal directly and need no config or log file
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "micdeck", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            if let Err(e) = commands::handle_list_devices() {
                eprintln!("Error: {e}");
                process::exit(1);
            }
            return Ok(());
        }
        Some(Commands::Logs) => {
            if let Err(e) = commands::handle_logs() {
                eprintln!("Error: {e}");
                process::exit(1);
            }
            return Ok(());
        }
        _ => {}
    }

    logging::init_logging()?;

    let config_path = config_path()?;
    if setup::ensure_config(&config_path)? {
        tracing::info!("First run: created {}", config_path.display());
    }

    match cli.command {
        None | Some(Commands::Record) => {
            commands::handle_record(cli.preset, cli.controls).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. } | Commands::ListDevices | Commands::Logs) => {
            unreachable!("handled before logging is initialized")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_record_is_default_and_takes_overrides() {
        let cli = Cli::try_parse_from(["micdeck", "--preset", "low"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.preset, Some(PresetName::Low));

        let cli = Cli::try_parse_from(["micdeck", "r", "--controls", "extended"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Record)));
        assert_eq!(cli.controls, Some(ControlLayout::Extended));
    }

    #[test]
    fn test_rejects_unknown_preset() {
        assert!(Cli::try_parse_from(["micdeck", "--preset", "lossless"]).is_err());
    }
}
