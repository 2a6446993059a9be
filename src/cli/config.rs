//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult};
use crate::config::{Config, ThemeMode};
use crate::models::KeyboardLayout;
use clap::{Args, Subcommand};
use serde::Serialize;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print the configuration file path
    Path,
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Theme mode (auto, light, or dark)
    #[arg(long, value_name = "MODE")]
    theme: Option<String>,

    /// Layout before any field asks for one (default or numeric)
    #[arg(long, value_name = "LAYOUT")]
    initial_layout: Option<String>,

    /// Show the keyboard at startup
    #[arg(long, value_name = "BOOL")]
    show_on_start: Option<bool>,

    /// Log filter, e.g. `debug` or `kioskboard=trace`
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Write logs to the log file
    #[arg(long, value_name = "BOOL")]
    logging: Option<bool>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    path: String,
    ui: UiOutput,
    keyboard: KeyboardOutput,
    logging: LoggingOutput,
}

#[derive(Serialize, Debug)]
struct UiOutput {
    theme: String,
}

#[derive(Serialize, Debug)]
struct KeyboardOutput {
    show_on_start: bool,
    initial_layout: KeyboardLayout,
}

#[derive(Serialize, Debug)]
struct LoggingOutput {
    enabled: bool,
    level: String,
    file: String,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()
                    .map_err(|e| CliError::io(format!("Failed to resolve config path: {e}")))?;
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e}")))?;

        if self.json {
            output_json(&config)?;
        } else {
            output_human_readable(&config)?;
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.theme.is_none()
            && self.initial_layout.is_none()
            && self.show_on_start.is_none()
            && self.log_level.is_none()
            && self.logging.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --theme, --initial-layout, --show-on-start, --log-level, or --logging",
            ));
        }

        let mut config = Config::load().unwrap_or_default();

        if let Some(theme) = &self.theme {
            config.ui.theme_mode = theme.parse::<ThemeMode>().map_err(|_| {
                CliError::validation("Invalid theme mode. Must be 'auto', 'light', or 'dark'")
            })?;
        }

        if let Some(layout) = &self.initial_layout {
            config.keyboard.initial_layout = layout.parse::<KeyboardLayout>().map_err(|_| {
                CliError::validation("Invalid layout. Must be 'default' or 'numeric'")
            })?;
        }

        if let Some(show) = self.show_on_start {
            config.keyboard.show_on_start = show;
        }

        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }

        if let Some(enabled) = self.logging {
            config.logging.enabled = enabled;
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e}")))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

fn theme_name(mode: ThemeMode) -> String {
    format!("{mode:?}").to_lowercase()
}

/// Output configuration in JSON format
fn output_json(config: &Config) -> CliResult<()> {
    let path = Config::config_file_path()
        .map_err(|e| CliError::io(format!("Failed to resolve config path: {e}")))?;
    let log_file = Config::log_file_path()
        .map_err(|e| CliError::io(format!("Failed to resolve log path: {e}")))?;

    let output = ConfigOutput {
        path: path.to_string_lossy().to_string(),
        ui: UiOutput {
            theme: theme_name(config.ui.theme_mode),
        },
        keyboard: KeyboardOutput {
            show_on_start: config.keyboard.show_on_start,
            initial_layout: config.keyboard.initial_layout,
        },
        logging: LoggingOutput {
            enabled: config.logging.enabled,
            level: config.logging.level.clone(),
            file: log_file.to_string_lossy().to_string(),
        },
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::io(format!("Failed to serialize configuration to JSON: {e}")))?;

    println!("{json}");
    Ok(())
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) -> CliResult<()> {
    let path = Config::config_file_path()
        .map_err(|e| CliError::io(format!("Failed to resolve config path: {e}")))?;

    println!("Kioskboard Configuration");
    println!("========================");
    println!("File: {}", path.display());
    println!();
    println!("UI:");
    println!("  Theme: {}", theme_name(config.ui.theme_mode));
    println!();
    println!("Keyboard:");
    println!("  Show on start: {}", config.keyboard.show_on_start);
    println!("  Initial layout: {}", config.keyboard.initial_layout);
    println!();
    println!("Logging:");
    println!("  Enabled: {}", config.logging.enabled);
    println!("  Level: {}", config.logging.level);

    Ok(())
}
