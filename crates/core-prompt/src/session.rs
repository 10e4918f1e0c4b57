//! Shared executor plumbing.
//!
//! A `Session` borrows the engine's collaborators for the duration of one
//! prompt: the TTY backend for size queries, the differential display, the
//! non-blocking reader + binding reader pair, the resolved config, and the
//! accumulated header. Executors compose body lines and a body-relative
//! cursor; the session prefixes the header before handing the frame to the
//! renderer.

use std::io::Write;

use core_input::NonBlockingReader;
use core_keymap::{BindingOutcome, BindingReader, KeyMap};
use core_render::Display;
use core_terminal::TtyBackend;
use core_text::StyledLine;

use crate::config::PrompterConfig;
use crate::error::{PromptError, Result};
use crate::ops::Op;

pub(crate) struct Session<'a, B: TtyBackend, W: Write> {
    pub backend: &'a mut B,
    pub display: &'a mut Display<W>,
    pub reader: &'a mut NonBlockingReader,
    pub binding: &'a mut BindingReader,
    pub config: &'a PrompterConfig,
    pub header: &'a [StyledLine],
}

impl<'a, B: TtyBackend, W: Write> Session<'a, B, W> {
    /// Terminal size as `(columns, rows)`, re-read once per frame.
    pub fn size(&self) -> Result<(u16, u16)> {
        self.backend.size().map_err(PromptError::Terminal)
    }

    /// Rows left for a prompt body under the header and message line.
    pub fn body_rows(&self, rows: u16) -> usize {
        (rows as usize)
            .saturating_sub(self.header.len())
            .saturating_sub(1)
            .max(1)
    }

    /// Draw header + body, cursor given body-relative.
    pub fn draw(
        &mut self,
        body: &[StyledLine],
        cursor_row: usize,
        cursor_col: u16,
        size: (u16, u16),
    ) -> Result<()> {
        let mut lines = Vec::with_capacity(self.header.len() + body.len());
        lines.extend_from_slice(self.header);
        lines.extend_from_slice(body);
        self.display
            .draw(&lines, (self.header.len() + cursor_row, cursor_col), size)?;
        Ok(())
    }

    /// Resolve the next operation token.
    pub fn read_op(&mut self, map: &KeyMap<Op>) -> Result<Op> {
        match self.binding.read_binding(map, self.reader) {
            BindingOutcome::Token(op) => Ok(op),
            BindingOutcome::Eof => Err(PromptError::UnexpectedEof),
        }
    }

    /// Character consumed by the last `Op::Insert`.
    pub fn inserted_char(&self) -> Option<char> {
        self.binding.last_char()
    }

    /// The styled "? message " line shown above every prompt body.
    pub fn message_line(&self, message: &str) -> StyledLine {
        let st = &self.config.styles;
        let mut line = StyledLine::new();
        line.push_styled("?", st.marker);
        line.push_raw(" ");
        line.push_styled(message.to_string(), st.message);
        line.push_raw(" ");
        line
    }
}
