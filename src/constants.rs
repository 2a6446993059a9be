//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and config locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Kioskboard";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "kioskboard";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "Kioskboard";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "KIOSKBOARD_CONFIG_DIR";
