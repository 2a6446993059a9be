//! CLI command handlers for Kioskboard.
//!
//! Headless access to the configuration and the keyboard layouts, for
//! provisioning kiosks from scripts.

pub mod common;
pub mod config;
pub mod layouts;

pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use layouts::LayoutsArgs;
