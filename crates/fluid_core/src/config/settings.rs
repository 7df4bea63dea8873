//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Window appearance and sizing.
    #[serde(default)]
    pub window: WindowSettings,

    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            paths: PathSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Window configuration for the demo surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Title shown on the window.
    #[serde(default = "default_title")]
    pub title: String,

    /// Window width is the screen width divided by this.
    #[serde(default = "default_divisor")]
    pub width_divisor: u32,

    /// Window height is the screen height divided by this.
    #[serde(default = "default_divisor")]
    pub height_divisor: u32,
}

fn default_title() -> String {
    "Bind Example".to_string()
}

fn default_divisor() -> u32 {
    1
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            width_divisor: default_divisor(),
            height_divisor: default_divisor(),
        }
    }
}

/// Path configuration for the demo page, temp, and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// HTML document loaded into the surface.
    #[serde(default = "default_page_file")]
    pub page_file: String,

    /// Root folder for temporary files.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_page_file() -> String {
    "web/index.html".to_string()
}

fn default_temp_root() -> String {
    ".temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            page_file: default_page_file(),
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for diagnostics and the session transcript.
    #[serde(default)]
    pub level: LogLevel,

    /// Prefix session log lines with a timestamp.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            show_timestamps: true,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Window,
    Paths,
    Logging,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Window => "window",
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
        }
    }
}
