//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard event handling
//! - `styles`: Light and dark palettes and text styling
//! - `tabs`: Per-dataset list rendering

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
