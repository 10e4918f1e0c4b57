//! Yes/no confirmation executor.
//!
//! Typing `y`/`n` (case-insensitive) updates the pending value and its
//! echo; Enter commits the pending value, or the default when nothing was
//! typed.

use std::io::Write;

use core_terminal::TtyBackend;
use core_text::StyledLine;

use crate::answer::Answer;
use crate::error::{PromptError, Result};
use crate::ops::{self, Op};
use crate::session::Session;

fn echo_text(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub(crate) fn run<B: TtyBackend, W: Write>(
    sess: &mut Session<'_, B, W>,
    message: &str,
    default_yes: bool,
) -> Result<Option<Answer>> {
    let keymap = ops::choice_keymap(sess.config.ambiguous_timeout);
    let mut pending: Option<bool> = None;

    let draw = |sess: &mut Session<'_, B, W>, shown: Option<bool>| -> Result<()> {
        let size = sess.size()?;
        let mut line = sess.message_line(message);
        line.push_styled("(y/n) ", sess.config.styles.disabled);
        if let Some(v) = shown {
            line.push_styled(echo_text(v), sess.config.styles.answer);
        }
        let col = line.width();
        sess.draw(&[line], 0, col, size)
    };

    loop {
        draw(sess, pending)?;
        match sess.read_op(&keymap)? {
            Op::Insert => match sess.inserted_char() {
                Some(c) if c.eq_ignore_ascii_case(&'y') => pending = Some(true),
                Some(c) if c.eq_ignore_ascii_case(&'n') => pending = Some(false),
                _ => {}
            },
            Op::Exit => {
                let value = pending.unwrap_or(default_yes);
                draw(sess, Some(value))?;
                return Ok(Some(Answer::Confirm(value)));
            }
            Op::Escape => return Ok(None),
            Op::Cancel => return Err(PromptError::Cancelled),
            _ => {}
        }
    }
}
