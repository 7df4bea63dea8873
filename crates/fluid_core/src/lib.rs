//! Fluid Core - Backend logic for the FluidUI demo harness
//!
//! This crate contains the call bridge and utility logic with zero UI
//! dependencies. It can be driven by a desktop surface or a headless
//! harness.

pub mod bridge;
pub mod config;
pub mod fsutil;
pub mod logging;
pub mod screen;
pub mod surface;
pub mod value;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
