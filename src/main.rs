//! Kioskboard - on-screen keyboard kiosk for the terminal
//!
//! Runs the demo kiosk by default. The subcommands give scripted access to
//! the configuration and the key tables.

use anyhow::Result;
use clap::{Parser, Subcommand};

use kioskboard::cli::{CliError, ConfigArgs, LayoutsArgs};
use kioskboard::config::Config;
use kioskboard::constants::{APP_BINARY_NAME, APP_NAME};
use kioskboard::{logging, tui};

/// Kioskboard - on-screen keyboard kiosk for the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the kiosk (default)
    Run,
    /// Show the keyboard layouts
    Layouts(LayoutsArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        None | Some(Commands::Run) => return run_kiosk(),
        Some(Commands::Layouts(args)) => args.execute(),
        Some(Commands::Config(args)) => args.execute(),
    };

    if let Err(CliError { message, exit_code }) = result {
        eprintln!("Error: {message}");
        std::process::exit(exit_code.code());
    }
    Ok(())
}

fn run_kiosk() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {e:#}");
            eprintln!("Falling back to defaults. Fix it with `{APP_BINARY_NAME} config set`.");
            Config::default()
        }
    };
    config.validate()?;

    if let Some(path) = logging::init(&config.logging)? {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            log = %path.display(),
            "{} starting",
            APP_NAME
        );
    }

    let mut app = tui::KioskApp::new(config)?;
    let mut terminal = tui::setup_terminal()?;
    let result = tui::run_kiosk(&mut app, &mut terminal);
    tui::restore_terminal(terminal)?;

    result
}
