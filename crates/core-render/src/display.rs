//! Differential frame renderer.
//!
//! `Display` turns a target frame (styled lines + intended cursor position
//! + current terminal size) into the minimal command sequence transforming
//! the previously emitted frame into the target: relative cursor moves,
//! clear-to-end-of-line/screen, and line prints.
//!
//! Coordinate model: row 0 is the first line of the frame, wherever the
//! frame happens to sit on the physical screen. All motion is relative, so
//! the whole frame may scroll (when it grows at the bottom of the screen)
//! without invalidating the renderer's bookkeeping.
//!
//! Invariants:
//! - Rendering the same frame twice writes zero bytes the second time.
//! - Lines are truncated to the terminal width before diffing; autowrap is
//!   never relied upon.
//! - New frame rows are materialised with explicit `\r\n`; no newline is
//!   ever written after the last row, so the frame never scrolls by
//!   accident.
//! - A terminal-size change between frames forces a full clear + repaint.

use std::io::Write;

use tracing::trace;

use core_text::StyledLine;

use crate::writer::Writer;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderedLine {
    ansi: String,
    width: u16,
}

/// Physical cursor position relative to the frame top, plus how many frame
/// rows already exist on screen.
#[derive(Debug, Clone, Copy)]
struct FrameCursor {
    row: usize,
    col: u16,
    materialized: usize,
}

impl FrameCursor {
    fn origin() -> Self {
        Self {
            row: 0,
            col: 0,
            materialized: 1,
        }
    }

    fn ensure_col<W: Write>(&mut self, w: &mut Writer<'_, W>, col: u16) {
        if self.col != col {
            w.move_to_column(col);
            self.col = col;
        }
    }

    /// Move to `row`, creating it with explicit newlines if the frame has
    /// never extended that far.
    fn goto_row<W: Write>(&mut self, w: &mut Writer<'_, W>, row: usize) {
        if row == self.row {
            return;
        }
        if row < self.row {
            w.move_up((self.row - row) as u16);
        } else if row < self.materialized {
            w.move_down((row - self.row) as u16);
        } else {
            if self.materialized - 1 > self.row {
                w.move_down((self.materialized - 1 - self.row) as u16);
            }
            w.move_to_column(0);
            for _ in self.materialized..=row {
                w.print("\r\n");
            }
            self.materialized = row + 1;
            self.col = 0;
        }
        self.row = row;
    }
}

/// Cell-width-aware differential renderer over an output handle.
pub struct Display<W: Write> {
    out: W,
    prev: Vec<RenderedLine>,
    cursor: FrameCursor,
    size: Option<(u16, u16)>,
}

impl<W: Write> Display<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            prev: Vec::new(),
            cursor: FrameCursor::origin(),
            size: None,
        }
    }

    /// Emit the minimal update transforming the previous frame into
    /// `lines`, leaving the terminal cursor at `cursor` = (row, column).
    ///
    /// `size` is `(columns, rows)` as observed for this frame.
    pub fn draw(
        &mut self,
        lines: &[StyledLine],
        cursor: (usize, u16),
        size: (u16, u16),
    ) -> std::io::Result<()> {
        let Self {
            out,
            prev,
            cursor: cur,
            size: prev_size,
        } = self;
        let mut w = Writer::new(out);

        let resized = prev_size.is_some_and(|s| s != size);
        *prev_size = Some(size);
        if resized {
            // Stale geometry: repaint everything from the frame top.
            cur.goto_row(&mut w, 0);
            cur.ensure_col(&mut w, 0);
            w.clear_down();
            prev.clear();
        }

        let target: Vec<RenderedLine> = lines
            .iter()
            .map(|l| {
                let t = l.truncated(size.0);
                RenderedLine {
                    ansi: t.to_ansi(),
                    width: t.width(),
                }
            })
            .collect();

        let mut repainted = 0usize;
        let rows = target.len().max(prev.len());
        for row in 0..rows {
            match (target.get(row), prev.get(row)) {
                (Some(t), Some(p)) if t == p => {}
                (Some(t), _) => {
                    cur.goto_row(&mut w, row);
                    cur.ensure_col(&mut w, 0);
                    w.clear_line();
                    w.print(t.ansi.clone());
                    cur.col = t.width;
                    repainted += 1;
                }
                (None, Some(_)) => {
                    // Frame shrank: blank every vacated row in one clear.
                    cur.goto_row(&mut w, row);
                    cur.ensure_col(&mut w, 0);
                    w.clear_down();
                    break;
                }
                (None, None) => unreachable!("row bounded by max(target, prev)"),
            }
        }

        let (crow, ccol) = cursor;
        cur.goto_row(&mut w, crow);
        cur.ensure_col(&mut w, ccol);

        if !w.is_empty() {
            trace!(
                target: "render.diff",
                rows = target.len(),
                repainted,
                resized,
                "frame_emit"
            );
        }
        w.flush()?;
        *prev = target;
        Ok(())
    }

    /// Park the cursor on a fresh line below the frame and reset the
    /// renderer, so whatever runs next starts under the final output.
    pub fn finalize(&mut self) -> std::io::Result<()> {
        let Self {
            out, prev, cursor, ..
        } = self;
        let mut w = Writer::new(out);
        let last = prev.len().saturating_sub(1);
        cursor.goto_row(&mut w, last);
        w.print("\r\n");
        w.flush()?;
        self.prev.clear();
        self.cursor = FrameCursor::origin();
        self.size = None;
        Ok(())
    }

    /// Shared access to the output handle (used by tests and teardown).
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }
}
