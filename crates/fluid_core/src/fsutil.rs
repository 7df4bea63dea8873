//! File helpers for the demo harness.
//!
//! Failures are logged at error level and re-raised; callers decide
//! whether they are fatal. Nothing here retries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

/// Errors raised by file operations.
#[derive(Error, Debug)]
pub enum FsError {
    /// The file does not exist.
    #[error("File does not exist: {path}")]
    NotFound { path: String },

    /// The file exists but could not be opened or read.
    #[error("Could not open file: {path}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The file could not be written.
    #[error("Could not write file: {path}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A directory could not be created.
    #[error("Could not create directory: {path}")]
    CreateDir {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for file operations.
pub type FsResult<T> = Result<T, FsError>;

/// Read an entire file into a string.
///
/// A missing file is reported distinctly from one that exists but
/// cannot be read. Nothing is returned partially.
pub fn read_to_string(path: impl AsRef<Path>) -> FsResult<String> {
    let path = path.as_ref();
    if !exists(path) {
        tracing::error!("File does not exist: {}", path.display());
        return Err(FsError::NotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|source| {
        tracing::error!("Could not open file: {}", path.display());
        FsError::Open {
            path: path.display().to_string(),
            source,
        }
    })
}

/// Write a string to a file, replacing any existing content.
pub fn write_string(path: impl AsRef<Path>, content: &str) -> FsResult<()> {
    let path = path.as_ref();
    fs::write(path, content).map_err(|source| {
        tracing::error!("Could not write file: {}", path.display());
        FsError::Write {
            path: path.display().to_string(),
            source,
        }
    })
}

/// Check whether a path exists.
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Generate a random string drawn from `[a-zA-Z0-9]`.
pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Create a uniquely named scratch folder under `root`.
///
/// The name carries eight random alphanumeric characters; with 62
/// characters to draw from, collisions are negligible. Pass
/// `std::env::temp_dir()` to use the system temp directory.
pub fn create_temp_folder(root: impl AsRef<Path>) -> FsResult<PathBuf> {
    let folder = root.as_ref().join(format!("fluid_{}", random_string(8)));
    match fs::create_dir(&folder) {
        Ok(()) => {
            tracing::info!("Temporary folder created: {}", folder.display());
            Ok(folder)
        }
        Err(source) => {
            tracing::error!("Failed to create temporary folder: {}", folder.display());
            Err(FsError::CreateDir {
                path: folder.display().to_string(),
                source,
            })
        }
    }
}
