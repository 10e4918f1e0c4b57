//! Single-select list executor.

use std::io::Write;

use core_terminal::TtyBackend;
use core_text::StyledLine;

use crate::answer::Answer;
use crate::error::{PromptError, Result};
use crate::executor::grid::{self, PageWindow, RowKind};
use crate::item::PromptItem;
use crate::ops::{self, Op};
use crate::session::Session;

pub(crate) fn run<B: TtyBackend, W: Write>(
    sess: &mut Session<'_, B, W>,
    message: &str,
    items: &[PromptItem],
) -> Result<Option<Answer>> {
    let Some(mut cursor) = grid::first_selectable(items) else {
        // Nothing to select: commit the sentinel without an input loop.
        return Ok(Some(Answer::List(None)));
    };
    let keymap = ops::list_keymap(sess.config.ambiguous_timeout);
    let key_w = grid::key_prefix_width(items);
    let mut window = PageWindow::new();

    loop {
        let size = sess.size()?;
        let available = sess.body_rows(size.1);
        let widths: Vec<u16> = items
            .iter()
            .map(|i| grid::cell_width(i, RowKind::List, key_w, sess.config))
            .collect();
        let layout = grid::layout(&widths, size.0, available);

        let mut body: Vec<StyledLine> = vec![sess.message_line(message)];
        let cursor_row = if layout.columns == 1 {
            let visible = available.min(items.len());
            let range = window.view(cursor, visible, items.len());
            let first = range.start;
            for k in range {
                body.push(grid::render_cell(
                    &items[k],
                    k == cursor,
                    RowKind::List,
                    false,
                    key_w,
                    sess.config,
                ));
            }
            1 + cursor - first
        } else {
            body.extend(grid::grid_rows(
                items,
                layout,
                cursor,
                RowKind::List,
                |_| false,
                key_w,
                sess.config,
            ));
            1 + cursor / layout.columns
        };
        sess.draw(&body, cursor_row, 0, size)?;

        match sess.read_op(&keymap)? {
            Op::ForwardOneLine => cursor = grid::step_selectable(items, cursor, true),
            Op::BackwardOneLine => cursor = grid::step_selectable(items, cursor, false),
            Op::ForwardOneColumn => {
                if layout.columns > 1 {
                    cursor = grid::column_step(items, layout.columns, cursor, true);
                }
            }
            Op::BackwardOneColumn => {
                if layout.columns > 1 {
                    cursor = grid::column_step(items, layout.columns, cursor, false);
                }
            }
            Op::Insert => {
                if let Some(c) = sess.inserted_char()
                    && let Some(hit) = grid::shortcut_index(items, c)
                {
                    cursor = hit;
                }
            }
            Op::Exit => return Ok(Some(Answer::List(Some(items[cursor].name.clone())))),
            Op::Escape => return Ok(None),
            Op::Cancel => return Err(PromptError::Cancelled),
            _ => {}
        }
    }
}
