//! UI surface trait definition.
//!
//! The bridge stays independent of any rendering stack. Anything that
//! can show a page and exchange bridge calls with it implements this
//! trait; the demo binary ships a headless implementation.

use thiserror::Error;

use crate::bridge::CallBridge;

/// Trait for embedding surfaces.
///
/// A surface is configured, given its page, then run. The embedder
/// calls these in order:
///
/// 1. `set_title` / `set_size` - Describe the window
/// 2. `set_html` - Load the page the surface renders
/// 3. `run` - Drive the event loop until the page is done
///
/// During `run` the surface dispatches page calls through
/// `bridge.invoke` and drains the response sink it handed the bridge at
/// construction. Async completions cross back into the surface's loop
/// through that sink only.
///
/// # Example
///
/// ```ignore
/// let mut surface = HeadlessSurface::new(script, receiver);
/// surface.set_title("Bind Example")?;
/// surface.set_size(640, 480)?;
/// surface.set_html(&page)?;
/// surface.run(&mut bridge)?;
/// ```
pub trait UiSurface {
    /// Get the surface name (for logging and error context).
    fn name(&self) -> &str;

    /// Set the window title.
    fn set_title(&mut self, title: &str) -> SurfaceResult<()>;

    /// Set the window size in pixels.
    fn set_size(&mut self, width: u32, height: u32) -> SurfaceResult<()>;

    /// Load the page the surface will render, as a full HTML document.
    fn set_html(&mut self, html: &str) -> SurfaceResult<()>;

    /// Run the event loop until the page is done.
    ///
    /// Must not return while bridge calls are still outstanding; a
    /// surface that cannot wait any longer fails with
    /// [`SurfaceError::Stalled`] instead of dropping them silently.
    fn run(&mut self, bridge: &mut CallBridge) -> SurfaceResult<()>;
}

/// Error raised by a surface.
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The surface could not be brought up.
    #[error("Surface '{surface}' failed to initialize: {message}")]
    Init { surface: String, message: String },

    /// The loop gave up waiting for async completions.
    #[error("Surface gave up after {waited_ms} ms with {pending} call(s) still pending")]
    Stalled { pending: usize, waited_ms: u64 },

    /// The response channel closed while calls were still outstanding.
    #[error("Response channel disconnected with {pending} call(s) still pending")]
    Disconnected { pending: usize },
}

impl SurfaceError {
    /// Create an initialization error.
    pub fn init(surface: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Init {
            surface: surface.into(),
            message: message.into(),
        }
    }

    /// Create a stalled error.
    pub fn stalled(pending: usize, waited_ms: u64) -> Self {
        Self::Stalled { pending, waited_ms }
    }

    /// Create a disconnected error.
    pub fn disconnected(pending: usize) -> Self {
        Self::Disconnected { pending }
    }
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;
