//! Platform abstraction layer
//!
//! Handles the pieces the simulation never sees:
//! - Tick scheduling
//! - Terminal window and drawing
//! - Key input

pub mod terminal;
pub mod ticker;

pub use terminal::TerminalCanvas;
pub use ticker::Ticker;
