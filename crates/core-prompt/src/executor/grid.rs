//! Grid layout, navigation, and row rendering shared by the list and
//! checkbox executors.
//!
//! Layout is recomputed once per frame from the current terminal size.
//! Ordering is row-first: item `k` sits at `(row = k / columns,
//! col = k % columns)`.
//!
//! Invariants:
//! - Navigation only ever lands on selectable items; non-selectable
//!   entries (separators, disabled rows) are skipped with wrap-around.
//! - Pagination applies only to single-column layouts; multi-column
//!   layouts grow columns until every line fits the available rows.

use core_text::{Span, StyledLine, display_width};

use crate::config::PrompterConfig;
use crate::item::PromptItem;

/// Below this many items the layout stays single-column.
pub(crate) const MIN_ITEMS_FOR_MULTICOLUMN: usize = 6;
/// Blank columns between grid cells.
pub(crate) const MARGIN: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GridLayout {
    pub columns: usize,
    pub lines: usize,
    pub column_width: u16,
}

impl GridLayout {
    pub fn single(lines: usize, term_cols: u16) -> Self {
        Self {
            columns: 1,
            lines,
            column_width: term_cols,
        }
    }
}

/// Decide columns/lines for this frame.
///
/// `cell_widths` are the rendered widths of each item cell (text plus the
/// per-row fixed overhead); `available_rows` is what remains under the
/// header and message line.
pub(crate) fn layout(cell_widths: &[u16], term_cols: u16, available_rows: usize) -> GridLayout {
    let n = cell_widths.len();
    if n < MIN_ITEMS_FOR_MULTICOLUMN {
        return GridLayout::single(n, term_cols);
    }
    let max_w = cell_widths.iter().copied().max().unwrap_or(1).max(1);
    let mut columns = ((term_cols / (max_w + MARGIN)) as usize).max(1).min(n);
    let mut lines = n.div_ceil(columns);
    while lines > available_rows.max(1) && columns < n {
        columns += 1;
        lines = n.div_ceil(columns);
    }
    if columns == 1 {
        return GridLayout::single(lines, term_cols);
    }
    let column_width = (term_cols.saturating_sub((columns as u16 - 1) * MARGIN)) / columns as u16;
    GridLayout {
        columns,
        lines,
        column_width: column_width.max(1),
    }
}

// -------------------------------------------------------------------------------------------------
// Navigation
// -------------------------------------------------------------------------------------------------

pub(crate) fn first_selectable(items: &[PromptItem]) -> Option<usize> {
    items.iter().position(|i| i.selectable)
}

/// Step to the next (or previous) selectable item, wrapping around.
/// Returns `idx` unchanged when no other selectable item exists.
pub(crate) fn step_selectable(items: &[PromptItem], idx: usize, forward: bool) -> usize {
    let n = items.len();
    if n == 0 {
        return idx;
    }
    let mut j = idx;
    for _ in 0..n {
        j = if forward { (j + 1) % n } else { (j + n - 1) % n };
        if items[j].selectable {
            return j;
        }
    }
    idx
}

/// Move one column within the current row (mod columns). Falls back to the
/// linear next/previous selectable item when the landing cell is missing
/// or not selectable.
pub(crate) fn column_step(
    items: &[PromptItem],
    columns: usize,
    idx: usize,
    forward: bool,
) -> usize {
    if columns <= 1 {
        return idx;
    }
    let row = idx / columns;
    let col = idx % columns;
    let new_col = if forward {
        (col + 1) % columns
    } else {
        (col + columns - 1) % columns
    };
    let candidate = row * columns + new_col;
    if candidate < items.len() && items[candidate].selectable {
        candidate
    } else {
        step_selectable(items, idx, forward)
    }
}

/// First selectable item whose shortcut matches `c`.
pub(crate) fn shortcut_index(items: &[PromptItem], c: char) -> Option<usize> {
    items
        .iter()
        .position(|i| i.selectable && i.matches_key(c))
}

// -------------------------------------------------------------------------------------------------
// Pagination (single-column only)
// -------------------------------------------------------------------------------------------------

/// Sliding window keeping the cursor visible across frames.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PageWindow {
    first: usize,
}

impl PageWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the visible range for this frame. A cursor already inside
    /// the window keeps it; otherwise the window recentres so the cursor
    /// sits one row above the bottom edge.
    pub fn view(&mut self, cursor: usize, visible: usize, total: usize) -> std::ops::Range<usize> {
        if visible == 0 || total == 0 {
            return 0..0;
        }
        if total <= visible {
            self.first = 0;
            return 0..total;
        }
        let max_first = total - visible;
        self.first = self.first.min(max_first);
        let in_window = cursor >= self.first && cursor < self.first + visible;
        if !in_window {
            self.first = if cursor < self.first {
                cursor
            } else {
                (cursor + 2).saturating_sub(visible).min(max_first)
            };
        }
        self.first..self.first + visible
    }
}

// -------------------------------------------------------------------------------------------------
// Row rendering
// -------------------------------------------------------------------------------------------------

/// Which executor family the cell is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowKind {
    List,
    Checkbox,
}

/// Width of the `k) ` shortcut prefix column, or 0 when no item has one.
pub(crate) fn key_prefix_width(items: &[PromptItem]) -> u16 {
    if items.iter().any(|i| i.key.is_some()) {
        3
    } else {
        0
    }
}

fn push_glyph(line: &mut StyledLine, glyph: &str, style: crossterm::style::ContentStyle) {
    line.push_styled(glyph.to_string(), style);
    if !glyph.ends_with(' ') {
        line.push_raw(" ");
    }
}

fn key_prefix(item: &PromptItem, key_w: u16) -> Option<String> {
    if key_w == 0 {
        return None;
    }
    Some(match item.key {
        Some(k) => format!("{k}) "),
        None => "   ".to_string(),
    })
}

/// Render one item cell.
pub(crate) fn render_cell(
    item: &PromptItem,
    on_cursor: bool,
    kind: RowKind,
    checked: bool,
    key_w: u16,
    cfg: &PrompterConfig,
) -> StyledLine {
    let g = &cfg.glyphs;
    let st = &cfg.styles;
    let pad = " ".repeat(display_width(&g.indicator) as usize);
    let mut line = StyledLine::new();

    if item.selectable {
        if on_cursor {
            line.push_styled(g.indicator.clone(), st.cursor);
        } else {
            line.push_raw(pad);
        }
        line.push_raw(" ");
        if kind == RowKind::Checkbox {
            if checked {
                push_glyph(&mut line, &g.checked, st.checkbox);
            } else {
                push_glyph(&mut line, &g.unchecked, st.box_element);
            }
        }
        if let Some(prefix) = key_prefix(item, key_w) {
            line.push_raw(prefix);
        }
        if on_cursor {
            line.push_styled(item.text.clone(), st.selected);
        } else {
            line.push_raw(item.text.clone());
        }
    } else if item.disabled {
        line.push_raw(pad);
        line.push_raw(" ");
        if kind == RowKind::Checkbox {
            push_glyph(&mut line, &g.unavailable, st.disabled);
        }
        if let Some(prefix) = key_prefix(item, key_w) {
            line.push_raw(prefix);
        }
        line.push_styled(item.text.clone(), st.disabled);
        line.push_styled(format!(" ({})", item.disabled_reason()), st.disabled);
    } else {
        // Separator.
        line.push_raw(pad);
        line.push_styled(item.text.clone(), st.disabled);
    }
    line
}

/// Rendered width of a cell without building its spans, for layout.
pub(crate) fn cell_width(item: &PromptItem, kind: RowKind, key_w: u16, cfg: &PrompterConfig) -> u16 {
    let g = &cfg.glyphs;
    let mut w = display_width(&g.indicator) + 1 + key_w + display_width(&item.text);
    if kind == RowKind::Checkbox && (item.selectable || item.disabled) {
        let glyph = &g.unchecked;
        w += display_width(glyph) + u16::from(!glyph.ends_with(' '));
    }
    if item.disabled {
        w += display_width(item.disabled_reason()) + 3;
    }
    w
}

fn pad_to(line: &mut StyledLine, width: u16) {
    let w = line.width();
    if w < width {
        line.push_raw(" ".repeat((width - w) as usize));
    }
}

/// Assemble multi-column body rows for the whole item set.
pub(crate) fn grid_rows(
    items: &[PromptItem],
    layout: GridLayout,
    cursor: usize,
    kind: RowKind,
    is_checked: impl Fn(&PromptItem) -> bool,
    key_w: u16,
    cfg: &PrompterConfig,
) -> Vec<StyledLine> {
    let mut rows = Vec::with_capacity(layout.lines);
    for row in 0..layout.lines {
        let mut line = StyledLine::new();
        for col in 0..layout.columns {
            let k = row * layout.columns + col;
            if k >= items.len() {
                break;
            }
            if col > 0 {
                pad_to(
                    &mut line,
                    col as u16 * (layout.column_width + MARGIN),
                );
            }
            let item = &items[k];
            let cell = render_cell(item, k == cursor, kind, is_checked(item), key_w, cfg)
                .truncated(layout.column_width);
            for span in cell.spans {
                line.push(Span::styled(span.text, span.style));
            }
        }
        rows.push(line);
    }
    rows
}
