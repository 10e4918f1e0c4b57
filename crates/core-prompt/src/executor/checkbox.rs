//! Multi-select checkbox executor.
//!
//! Identical navigation to the list executor, plus a toggle set keyed by
//! item name. The committed set is always a subset of the selectable item
//! names: initial check marks on non-selectable items are ignored, and
//! Space only flips the (selectable, by navigation invariant) item under
//! the cursor.

use std::collections::BTreeSet;
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
    let mut checked: BTreeSet<String> = items
        .iter()
        .filter(|i| i.selectable && i.initially_checked)
        .map(|i| i.name.clone())
        .collect();
    let Some(mut cursor) = grid::first_selectable(items) else {
        return Ok(Some(Answer::Checkbox(BTreeSet::new())));
    };
    let keymap = ops::checkbox_keymap(sess.config.ambiguous_timeout);
    let key_w = grid::key_prefix_width(items);
    let mut window = PageWindow::new();

    loop {
        let size = sess.size()?;
        let available = sess.body_rows(size.1);
        let widths: Vec<u16> = items
            .iter()
            .map(|i| grid::cell_width(i, RowKind::Checkbox, key_w, sess.config))
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
                    RowKind::Checkbox,
                    checked.contains(&items[k].name),
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
                RowKind::Checkbox,
                |item| checked.contains(&item.name),
                key_w,
                sess.config,
            ));
            1 + cursor / layout.columns
        };
        sess.draw(&body, cursor_row, 0, size)?;

        match sess.read_op(&keymap)? {
            Op::Toggle => {
                let name = &items[cursor].name;
                if !checked.remove(name) {
                    checked.insert(name.clone());
                }
            }
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
            Op::Exit => return Ok(Some(Answer::Checkbox(checked))),
            Op::Escape => return Ok(None),
            Op::Cancel => return Err(PromptError::Cancelled),
            _ => {}
        }
    }
}
