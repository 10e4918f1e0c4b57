//! Terminal writer abstraction.
//!
//! A thin layer that batches primitive terminal operations so a frame is
//! emitted as one queued burst rather than interleaved writes.
//!
//! Design invariants:
//! * Commands preserve ordering; no flushing mid-frame.
//! * All cursor motion is explicit and relative; the writer never relies on
//!   terminal autowrap to reach a row.
//! * The writer owns no global state; it is a short-lived object per frame
//!   borrowing the output handle.
//! * An empty command list flushes nothing: zero commands means zero bytes.

use std::io::Write;

use crossterm::{
    cursor::{MoveDown, MoveToColumn, MoveUp},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

#[derive(Debug)]
pub enum Command {
    MoveUp(u16),
    MoveDown(u16),
    MoveToColumn(u16),
    /// Clear from the cursor to the end of the current line.
    ClearLine,
    /// Clear from the cursor to the end of the screen.
    ClearDown,
    Print(String),
}

pub struct Writer<'a, W: Write> {
    out: &'a mut W,
    cmds: Vec<Command>,
}

impl<'a, W: Write> Writer<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self {
            out,
            cmds: Vec::new(),
        }
    }

    pub fn move_up(&mut self, n: u16) {
        if n > 0 {
            self.cmds.push(Command::MoveUp(n));
        }
    }

    pub fn move_down(&mut self, n: u16) {
        if n > 0 {
            self.cmds.push(Command::MoveDown(n));
        }
    }

    pub fn move_to_column(&mut self, col: u16) {
        self.cmds.push(Command::MoveToColumn(col));
    }

    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }

    pub fn clear_down(&mut self) {
        self.cmds.push(Command::ClearDown);
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn command_count(&self) -> usize {
        self.cmds.len()
    }

    pub fn flush(self) -> std::io::Result<()> {
        if self.cmds.is_empty() {
            return Ok(());
        }
        for c in self.cmds {
            match c {
                Command::MoveUp(n) => queue!(self.out, MoveUp(n))?,
                Command::MoveDown(n) => queue!(self.out, MoveDown(n))?,
                Command::MoveToColumn(col) => queue!(self.out, MoveToColumn(col))?,
                Command::ClearLine => queue!(self.out, Clear(ClearType::UntilNewLine))?,
                Command::ClearDown => queue!(self.out, Clear(ClearType::FromCursorDown))?,
                Command::Print(s) => queue!(self.out, Print(s))?,
            }
        }
        self.out.flush()
    }
}
