//! Terminal backend abstraction and crossterm implementation.
//!
//! The prompt engine needs exactly three things from the terminal: a size
//! query re-read every frame, a raw-mode toggle with save/restore, and the
//! guarantee that raw mode is entered at most once and left on every exit
//! path. Rendering goes through a plain `Write` handle owned elsewhere, so
//! this layer deliberately does not touch the output stream and never
//! switches to the alternate screen: prompt frames live inline in the
//! scrollback.

use anyhow::Result;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, size};
use tracing::debug;

/// TTY surface consumed by the prompt engine.
pub trait TtyBackend {
    /// Current terminal size as `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
    /// Enter raw mode, saving prior attributes. Idempotent.
    fn enter(&mut self) -> Result<()>;
    /// Restore the saved attributes. Idempotent.
    fn leave(&mut self) -> Result<()>;
}

/// Real TTY backed by crossterm.
pub struct CrosstermTty {
    entered: bool,
}

impl Default for CrosstermTty {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTty {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TtyGuard<'_, Self>> {
        self.enter()?;
        Ok(TtyGuard {
            backend: self,
            active: true,
        })
    }
}

impl TtyBackend for CrosstermTty {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(size()?)
    }

    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            self.entered = true;
            debug!(target: "terminal", "raw_mode_enter");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "terminal", "raw_mode_leave");
        }
        Ok(())
    }
}

impl Drop for CrosstermTty {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// RAII guard ensuring terminal restoration even if the caller early-returns
/// or panics.
pub struct TtyGuard<'a, B: TtyBackend> {
    backend: &'a mut B,
    active: bool,
}

impl<'a, B: TtyBackend> TtyGuard<'a, B> {
    pub fn new(backend: &'a mut B) -> Result<Self> {
        backend.enter()?;
        Ok(Self {
            backend,
            active: true,
        })
    }

    /// Leave raw mode now rather than at drop, surfacing any error.
    pub fn release(mut self) -> Result<()> {
        self.active = false;
        self.backend.leave()
    }
}

impl<'a, B: TtyBackend> Drop for TtyGuard<'a, B> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

/// Fixed-size backend with no raw-mode side effects, for tests and for
/// driving the engine over captured streams.
pub struct NullTty {
    pub cols: u16,
    pub rows: u16,
}

impl NullTty {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl TtyBackend for NullTty {
    fn size(&self) -> Result<(u16, u16)> {
        Ok((self.cols, self.rows))
    }

    fn enter(&mut self) -> Result<()> {
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_backend_reports_fixed_size() {
        let tty = NullTty::new(80, 24);
        assert_eq!(tty.size().unwrap(), (80, 24));
    }

    #[test]
    fn guard_releases_backend() {
        struct Probe {
            entered: u32,
            left: u32,
        }
        impl TtyBackend for Probe {
            fn size(&self) -> Result<(u16, u16)> {
                Ok((1, 1))
            }
            fn enter(&mut self) -> Result<()> {
                self.entered += 1;
                Ok(())
            }
            fn leave(&mut self) -> Result<()> {
                self.left += 1;
                Ok(())
            }
        }
        let mut probe = Probe {
            entered: 0,
            left: 0,
        };
        {
            let _guard = TtyGuard::new(&mut probe).unwrap();
        }
        assert_eq!(probe.entered, 1);
        assert_eq!(probe.left, 1);
    }
}
