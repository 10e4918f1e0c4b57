//! Single-key choice executor.
//!
//! No cursor navigation: every item prints once, then a `Choice:` line
//! waits for a printable character matching a selectable item's shortcut
//! (case-insensitive). Enter commits the default choice when one exists,
//! and the committed frame re-renders the choice line with the chosen key
//! so the echo is identical however the commit happened.

use std::io::Write;

use core_terminal::TtyBackend;
use core_text::StyledLine;

use crate::answer::Answer;
use crate::error::{PromptError, Result};
use crate::executor::grid::{self, RowKind};
use crate::item::PromptItem;
use crate::ops::{self, Op};
use crate::session::Session;

pub(crate) fn run<B: TtyBackend, W: Write>(
    sess: &mut Session<'_, B, W>,
    message: &str,
    items: &[PromptItem],
) -> Result<Option<Answer>> {
    if grid::first_selectable(items).is_none() {
        return Ok(Some(Answer::Choice(None)));
    }
    let keymap = ops::choice_keymap(sess.config.ambiguous_timeout);
    let key_w = grid::key_prefix_width(items);
    let default_index = items.iter().position(|i| i.selectable && i.default);

    let draw = |sess: &mut Session<'_, B, W>, echo: Option<char>| -> Result<()> {
        let size = sess.size()?;
        let mut body: Vec<StyledLine> = vec![sess.message_line(message)];
        for item in items {
            body.push(grid::render_cell(
                item,
                false,
                RowKind::List,
                false,
                key_w,
                sess.config,
            ));
        }
        let mut choice_line = StyledLine::new();
        choice_line.push_styled("Choice", sess.config.styles.message);
        choice_line.push_raw(": ");
        if let Some(c) = echo {
            choice_line.push_styled(c.to_string(), sess.config.styles.answer);
        }
        let col = choice_line.width();
        let row = body.len();
        body.push(choice_line);
        sess.draw(&body, row, col, size)
    };

    loop {
        draw(sess, None)?;
        let commit = match sess.read_op(&keymap)? {
            Op::Insert => sess
                .inserted_char()
                .and_then(|c| grid::shortcut_index(items, c)),
            Op::Exit => default_index,
            Op::Escape => return Ok(None),
            Op::Cancel => return Err(PromptError::Cancelled),
            _ => None,
        };
        if let Some(index) = commit {
            let item = &items[index];
            draw(sess, item.key)?;
            return Ok(Some(Answer::Choice(Some(item.name.clone()))));
        }
    }
}
