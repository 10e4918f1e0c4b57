//! Error taxonomy for prompt runs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// Underlying read/write against the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal backend failure (size query, raw-mode toggle).
    #[error("terminal backend failure: {0}")]
    Terminal(#[source] anyhow::Error),

    /// The engine was used incorrectly (re-entry, unknown prompt shape).
    #[error("prompt engine misuse: {0}")]
    Usage(String),

    /// The user pressed the interrupt key. Raised after terminal restore.
    #[error("prompt run cancelled by interrupt")]
    Cancelled,

    /// The input stream ended while a prompt was still collecting input.
    #[error("input stream ended before the prompt committed")]
    UnexpectedEof,
}

pub type Result<T> = std::result::Result<T, PromptError>;
