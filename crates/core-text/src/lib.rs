//! Text primitives for the prompt engine: grapheme-aware display widths,
//! NFC normalization + segmentation, and styled line assembly.
//!
//! Invariants:
//! - `width::egc_width` is the only authority on terminal cell widths.
//! - `StyledLine` rendering is deterministic: equal lines produce equal
//!   ANSI strings, which is what the differential renderer diffs on.

pub mod segment;
pub mod style;
pub mod width;

pub use segment::{Segment, normalize, normalize_and_segment};
pub use style::{Span, StyleBuilder, StyledLine, parse_style};
pub use width::{display_width, egc_width, truncate_width};
