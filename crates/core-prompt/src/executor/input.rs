//! Free-text input executor.
//!
//! State: the character buffer, a parallel masked echo, and a column
//! cursor. Enter with an empty buffer commits the default value when one
//! is set; otherwise the buffer verbatim (NFC-normalized). Validation
//! errors render on the line below and the prompt keeps collecting.

use std::io::Write;

use tracing::debug;

use core_terminal::TtyBackend;
use core_text::{StyledLine, display_width, normalize};

use crate::answer::Answer;
use crate::error::{PromptError, Result};
use crate::ops::{self, Op};
use crate::prompt::InputSpec;
use crate::session::Session;

/// Tab-completion cycle: the prefix it was started from and the index of
/// the candidate applied last.
struct CompletionCycle {
    prefix: String,
    index: usize,
}

pub(crate) fn run<B: TtyBackend, W: Write>(
    sess: &mut Session<'_, B, W>,
    message: &str,
    spec: &InputSpec,
) -> Result<Option<Answer>> {
    let keymap = ops::input_keymap(sess.config.ambiguous_timeout);
    let mut buf: Vec<char> = Vec::new();
    let mut cursor = 0usize;
    let mut error: Option<String> = None;
    let mut completion: Option<CompletionCycle> = None;

    loop {
        let size = sess.size()?;
        let msg = sess.message_line(message);
        let masked = |c: &char| spec.mask.unwrap_or(*c);
        let shown: String = buf.iter().map(masked).collect();
        let prefix: String = buf[..cursor].iter().map(masked).collect();
        let col = msg.width() + display_width(&prefix);

        let mut line = msg;
        line.push_raw(shown);
        let mut body = vec![line];
        if let Some(err) = &error {
            let mut e = StyledLine::new();
            e.push_styled(format!(">> {err}"), sess.config.styles.error);
            body.push(e);
        }
        sess.draw(&body, 0, col, size)?;

        match sess.read_op(&keymap)? {
            Op::Insert => {
                if let Some(c) = sess.inserted_char() {
                    buf.insert(cursor, c);
                    cursor += 1;
                    error = None;
                    completion = None;
                }
            }
            Op::Backspace => {
                if cursor > 0 {
                    cursor -= 1;
                    buf.remove(cursor);
                    completion = None;
                }
            }
            Op::Delete => {
                if cursor < buf.len() {
                    buf.remove(cursor);
                    completion = None;
                }
            }
            Op::Left => cursor = cursor.saturating_sub(1),
            Op::Right => cursor = (cursor + 1).min(buf.len()),
            Op::BeginningOfLine => cursor = 0,
            Op::EndOfLine => cursor = buf.len(),
            Op::SelectCandidate => {
                if let Some(cycle) = next_candidate(&buf, spec, completion.take()) {
                    buf = spec.candidates[cycle.index].chars().collect();
                    cursor = buf.len();
                    completion = Some(cycle);
                }
            }
            Op::Exit => {
                let typed: String = buf.iter().collect();
                let value = if typed.is_empty() {
                    spec.default_value.clone().unwrap_or_default()
                } else {
                    normalize(&typed)
                };
                if let Some(validate) = &spec.validator
                    && let Err(msg) = validate(&value)
                {
                    debug!(target: "prompt.exec", "input_validation_failed");
                    error = Some(msg);
                    continue;
                }
                return Ok(Some(Answer::Input(value)));
            }
            Op::Escape => return Ok(None),
            Op::Cancel => return Err(PromptError::Cancelled),
            _ => {}
        }
    }
}

/// Pick the next candidate matching the cycle prefix, starting a new cycle
/// from the current buffer when none is active.
fn next_candidate(
    buf: &[char],
    spec: &InputSpec,
    active: Option<CompletionCycle>,
) -> Option<CompletionCycle> {
    if spec.candidates.is_empty() {
        return None;
    }
    let (prefix, start_after) = match active {
        Some(cycle) => (cycle.prefix, Some(cycle.index)),
        None => (buf.iter().collect::<String>(), None),
    };
    let n = spec.candidates.len();
    let begin = start_after.map(|i| i + 1).unwrap_or(0);
    for offset in 0..n {
        let i = (begin + offset) % n;
        if spec.candidates[i].starts_with(&prefix) {
            return Some(CompletionCycle { prefix, index: i });
        }
    }
    None
}
