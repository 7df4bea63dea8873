//! Screen metrics queries.
//!
//! Resolution comes from an environment override when present, otherwise
//! from a per-platform probe of an external tool. Unsupported platforms
//! fail explicitly; the query never fabricates a zero size.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the probe, as `WIDTHxHEIGHT`.
pub const SCREEN_SIZE_ENV: &str = "FLUID_SCREEN_SIZE";

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Errors raised by the screen query.
#[derive(Error, Debug)]
pub enum ScreenError {
    /// No probe exists for this platform.
    #[error("No screen size probe for platform '{platform}'")]
    Unsupported { platform: &'static str },

    /// The probe tool failed to run or its output made no sense.
    #[error("{tool} probe failed: {message}")]
    ProbeFailed { tool: &'static str, message: String },

    /// The override variable was set but not in `WIDTHxHEIGHT` form.
    #[error("Invalid FLUID_SCREEN_SIZE override '{value}', expected WIDTHxHEIGHT")]
    BadOverride { value: String },
}

/// Result type for screen queries.
pub type ScreenResult<T> = Result<T, ScreenError>;

/// Query the primary display's size in pixels.
///
/// Checks the `FLUID_SCREEN_SIZE` override first, then probes the
/// platform's display tool.
pub fn screen_size() -> ScreenResult<ScreenSize> {
    if let Ok(value) = env::var(SCREEN_SIZE_ENV) {
        return parse_size(&value).ok_or(ScreenError::BadOverride { value });
    }
    probe()
}

/// Parse a `WIDTHxHEIGHT` string. Zero dimensions are rejected.
fn parse_size(value: &str) -> Option<ScreenSize> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let width = w.trim().parse().ok()?;
    let height = h.trim().parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(ScreenSize { width, height })
}

#[cfg(target_os = "linux")]
fn probe() -> ScreenResult<ScreenSize> {
    let output = std::process::Command::new("xrandr")
        .arg("--current")
        .output()
        .map_err(|e| ScreenError::ProbeFailed {
            tool: "xrandr",
            message: format!("failed to run: {}", e),
        })?;

    if !output.status.success() {
        return Err(ScreenError::ProbeFailed {
            tool: "xrandr",
            message: "exited with an error".to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_xrandr(&stdout).ok_or_else(|| ScreenError::ProbeFailed {
        tool: "xrandr",
        message: "no current resolution in output".to_string(),
    })
}

#[cfg(target_os = "macos")]
fn probe() -> ScreenResult<ScreenSize> {
    let output = std::process::Command::new("system_profiler")
        .arg("SPDisplaysDataType")
        .output()
        .map_err(|e| ScreenError::ProbeFailed {
            tool: "system_profiler",
            message: format!("failed to run: {}", e),
        })?;

    if !output.status.success() {
        return Err(ScreenError::ProbeFailed {
            tool: "system_profiler",
            message: "exited with an error".to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_system_profiler(&stdout).ok_or_else(|| ScreenError::ProbeFailed {
        tool: "system_profiler",
        message: "no resolution line in output".to_string(),
    })
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn probe() -> ScreenResult<ScreenSize> {
    Err(ScreenError::Unsupported {
        platform: env::consts::OS,
    })
}

/// Pull `W x H` out of the `current 1920 x 1080,` clause in xrandr's
/// screen header line.
#[cfg(any(target_os = "linux", test))]
fn parse_xrandr(output: &str) -> Option<ScreenSize> {
    let clause = output.split("current ").nth(1)?.split(',').next()?;
    parse_size(clause)
}

/// Find the first `Resolution: W x H ...` line in system_profiler output.
#[cfg(any(target_os = "macos", test))]
fn parse_system_profiler(output: &str) -> Option<ScreenSize> {
    let line = output
        .lines()
        .find(|l| l.trim_start().starts_with("Resolution:"))?;
    let mut words = line.split_whitespace().skip(1);
    let width = words.next()?.parse().ok()?;
    if words.next()? != "x" {
        return None;
    }
    let height = words.next()?.parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(ScreenSize { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_overrides() {
        let size = parse_size("1920x1080").unwrap();
        assert_eq!(size.width, 1920);
        assert_eq!(size.height, 1080);

        let size = parse_size(" 2560 X 1440 ").unwrap();
        assert_eq!(size.width, 2560);
        assert_eq!(size.height, 1440);
    }

    #[test]
    fn rejects_malformed_or_zero_overrides() {
        assert!(parse_size("banana").is_none());
        assert!(parse_size("1920").is_none());
        assert!(parse_size("0x0").is_none());
        assert!(parse_size("1920x").is_none());
    }

    #[test]
    fn parses_xrandr_header_line() {
        let output = "Screen 0: minimum 320 x 200, current 1920 x 1080, maximum 16384 x 16384\n\
                      HDMI-1 connected primary 1920x1080+0+0 (normal left inverted) 531mm x 299mm\n";
        let size = parse_xrandr(output).unwrap();
        assert_eq!(size.width, 1920);
        assert_eq!(size.height, 1080);

        assert!(parse_xrandr("no resolutions here").is_none());
    }

    #[test]
    fn parses_system_profiler_resolution_line() {
        let output = "Graphics/Displays:\n  Apple M1:\n    Displays:\n      Color LCD:\n        Resolution: 2560 x 1600 Retina\n";
        let size = parse_system_profiler(output).unwrap();
        assert_eq!(size.width, 2560);
        assert_eq!(size.height, 1600);

        assert!(parse_system_profiler("Resolution: garbage").is_none());
    }

    #[test]
    fn env_override_controls_the_query() {
        // No other test reads this variable, so mutating it is safe.
        env::set_var(SCREEN_SIZE_ENV, "800x600");
        let size = screen_size().unwrap();
        assert_eq!(
            size,
            ScreenSize {
                width: 800,
                height: 600
            }
        );

        env::set_var(SCREEN_SIZE_ENV, "not-a-size");
        let err = screen_size().unwrap_err();
        assert!(matches!(err, ScreenError::BadOverride { .. }));

        env::remove_var(SCREEN_SIZE_ENV);
    }

    #[test]
    fn screen_size_formats_as_w_x_h() {
        let size = ScreenSize {
            width: 640,
            height: 480,
        };
        assert_eq!(size.to_string(), "640x480");
    }
}
