//! FluidUI demo harness - Main entry point
//!
//! Wires the call bridge to a scripted surface. It handles:
//! - Application-level logging initialization
//! - Configuration loading
//! - Directory creation
//! - Demo binding registration and the session run

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use fluid_core::bridge::{BridgeError, CallBridge};
use fluid_core::config::{ConfigError, ConfigManager};
use fluid_core::fsutil::{self, FsError};
use fluid_core::logging::{
    init_tracing, init_tracing_with_file, SessionConfig, SessionLog, UiLogCallback,
};
use fluid_core::screen::{self, ScreenSize};
use fluid_core::surface::{SurfaceError, UiSurface};

mod demo;
mod surface;

use surface::{HeadlessSurface, ScriptedCall};

/// How long the compute binding pretends to work.
const COMPUTE_DELAY: Duration = Duration::from_secs(1);

/// Dimensions used when the screen cannot be probed.
const FALLBACK_SCREEN: ScreenSize = ScreenSize {
    width: 1280,
    height: 720,
};

/// Default config path: .config/settings.toml (relative to current working directory)
fn default_config_path() -> PathBuf {
    PathBuf::from(".config").join("settings.toml")
}

/// Errors that end the demo run.
#[derive(Error, Debug)]
enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("File error: {0}")]
    Fs(#[from] FsError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Failed to create session log: {0}")]
    SessionLog(#[from] std::io::Error),
}

fn main() {
    // Load configuration first (needed for logs directory path)
    let config_path = default_config_path();
    let mut config_manager = ConfigManager::new(&config_path);

    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    // Initialize application-level logging
    let logs_dir = config_manager.logs_folder();
    let level = config_manager.settings().logging.level;
    let _log_guard = match init_tracing_with_file(level, &logs_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to set up file logging: {}", e);
            init_tracing(level);
            None
        }
    };

    tracing::info!("FluidUI demo starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", fluid_core::version());

    if let Err(e) = run(config_manager) {
        tracing::error!("Demo run failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config_manager: ConfigManager) -> Result<(), AppError> {
    // Ensure all configured directories exist
    config_manager.ensure_dirs_exist()?;

    let settings = config_manager.settings().clone();

    // Session transcript, mirrored into diagnostics
    let session_config = SessionConfig {
        level: settings.logging.level,
        show_timestamps: settings.logging.show_timestamps,
    };
    let mirror: UiLogCallback = Box::new(|line| tracing::debug!("{}", line));
    let session_log = Arc::new(SessionLog::new(
        "demo",
        config_manager.logs_folder(),
        session_config,
        Some(mirror),
    )?);

    // Scratch space for the session
    let scratch = fsutil::create_temp_folder(&settings.paths.temp_root)?;
    tracing::debug!("Scratch folder: {}", scratch.display());

    // Render the formatter showcase into the transcript
    demo::log_value_showcase(&session_log);
    session_log.flush();

    // Window geometry from the screen, with a fallback when probing fails
    let screen = match screen::screen_size() {
        Ok(size) => {
            tracing::info!("Screen size: {}", size);
            size
        }
        Err(e) => {
            tracing::warn!(
                "Could not determine screen size: {}. Using {}.",
                e,
                FALLBACK_SCREEN
            );
            FALLBACK_SCREEN
        }
    };
    let width = screen.width / settings.window.width_divisor.max(1);
    let height = screen.height / settings.window.height_divisor.max(1);

    // The demo page is required
    let html = fsutil::read_to_string(&settings.paths.page_file)?;

    // Bridge with a channel sink; the surface drains the other end
    let (tx, rx) = mpsc::channel();
    let mut bridge = CallBridge::new(Box::new(move |response| {
        let _ = tx.send(response);
    }));
    demo::register_bindings(&mut bridge, COMPUTE_DELAY)?;
    tracing::info!("Registered bindings: {:?}", bridge.handler_names());

    // Script the calls the page makes on load
    let script = vec![
        ScriptedCall::new("count", "[5]"),
        ScriptedCall::new("count", "[-3]"),
        ScriptedCall::new("compute", "{}"),
    ];

    let mut surface = HeadlessSurface::new(script, rx, Arc::clone(&session_log));
    surface.set_title(&settings.window.title)?;
    surface.set_size(width, height)?;
    surface.set_html(&html)?;
    surface.run(&mut bridge)?;

    // Tear down workers before the transcript closes
    bridge.shutdown();
    session_log.close();

    tracing::info!(
        "Demo session finished. Transcript: {}",
        session_log.log_path().display()
    );
    Ok(())
}
