//! Rendering primitives: frame assembly output and minimal-diff emission.
//!
//! The prompt engine renders whole frames (header lines + message line +
//! prompt body) every iteration of an input loop; `Display` diffs each
//! frame against the previous one so steady-state keystrokes repaint only
//! the rows they touch, and an unchanged frame writes nothing at all.
//!
//! Exposed components:
//! - `writer`: terminal command batching (relative moves, clears, prints)
//!   flushed once per frame.
//! - `display`: the differential renderer and its relative coordinate
//!   model.

pub mod display;
pub mod writer;

pub use display::Display;
pub use writer::{Command, Writer};
