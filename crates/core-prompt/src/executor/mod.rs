//! Per-variant prompt executors.
//!
//! Every executor is the same loop: render a frame, read one operation
//! token, mutate local state; leave on commit (`Ok(Some(answer))`), back
//! navigation (`Ok(None)` for Escape), or cancellation (`Err`). Frames are
//! drawn through the session, which prefixes the shared header.

pub(crate) mod checkbox;
pub(crate) mod choice;
pub(crate) mod confirm;
pub(crate) mod grid;
pub(crate) mod input;
pub(crate) mod list;
pub(crate) mod text;
