//! Grapheme cluster display-width engine.
//!
//! A single authoritative function `egc_width` returns the terminal column
//! width for one grapheme cluster (EGC). All width decisions in the
//! workspace flow through it; no other crate calls `unicode_width` directly.
//!
//! The baseline crate mis-measures several composite sequences (ZWJ emoji,
//! flags, keycaps, skin-tone modifiers), so a small heuristic classifier
//! sits on top of it. The classifier favors over-estimation: an extra blank
//! cell is harmless, while under-estimation drifts the cursor.
//!
//! Invariants:
//! - Callers segment first; `egc_width` operates on a single-EGC slice.
//! - Ornamental dingbats (U+2768..U+2775, neighbors of the `❯` selection
//!   indicator) and other narrow BMP symbols stay one cell even though they
//!   sit near blocks full of emoji-presentation candidates.

// -------------------------------------------------------------------------------------------------
// Classifier
// -------------------------------------------------------------------------------------------------

/// Semantic classification of a single grapheme cluster (EGC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EgcKind {
    Ascii,
    Narrow,
    Wide,
    EmojiSimple,     // Single pictographic (with optional VS16) no modifiers
    EmojiModifier,   // Emoji + skin tone modifier
    EmojiKeycap,     // Keycap sequence (base + optional VS16 + \u{20E3})
    EmojiFlag,       // Regional indicator pair
    EmojiZwj,        // ZWJ sequence combining >=2 pictographic bases
    Combining(bool), // Base + combining mark(s); bool indicates base wide/emoji (true => width 2)
    Other,
}

const ZWJ: char = '\u{200D}';
const VS16: char = '\u{FE0F}';
const KEYCAP_COMBINING: char = '\u{20E3}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

// Rough Extended Pictographic heuristic. The ornamental bracket run inside
// Dingbats is carved out: those glyphs render narrow everywhere.
fn is_extended_pictographic(c: char) -> bool {
    if ('\u{2768}'..='\u{2775}').contains(&c) {
        return false;
    }
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

// Combining mark ranges commonly encountered (subset).
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

/// Classify an EGC (single grapheme slice).
fn classify(egc: &str) -> EgcKind {
    if egc.is_empty() {
        return EgcKind::Other;
    }
    let first = egc.chars().next().unwrap();
    let single = egc.chars().count() == 1;

    if single {
        if first.is_ascii() {
            return EgcKind::Ascii;
        }
        let uwidth = unicode_width::UnicodeWidthChar::width(first).unwrap_or(1);
        if is_extended_pictographic(first) && (uwidth == 2 || first >= '\u{1F300}') {
            // Supplementary-plane pictographs are emoji even when the
            // baseline tables claim width 1; BMP symbols follow the tables.
            return EgcKind::EmojiSimple;
        }
        if uwidth == 2 {
            return EgcKind::Wide;
        }
        return EgcKind::Narrow;
    }

    let mut count_ep = 0usize;
    let mut count_ri = 0usize;
    let mut has_zwj = false;
    let mut has_skin = false;
    let mut has_combining = false;
    let mut keycap_base: Option<char> = None;
    let mut ends_with_keycap = false;
    let mut any_wide = false;
    let mut base_wide_or_emoji = false;
    let mut saw_non_mark_base = false;

    let cluster_len = egc.chars().count();
    for (i, c) in egc.chars().enumerate() {
        if is_extended_pictographic(c) {
            count_ep += 1;
        }
        if is_regional_indicator(c) {
            count_ri += 1;
        }
        if c == ZWJ {
            has_zwj = true;
        }
        if c == VS16 { /* emoji presentation hint, folded into pictographic detection */ }
        if is_skin_tone_modifier(c) {
            has_skin = true;
        }
        if is_combining_mark(c) {
            has_combining = true;
        }
        if c == KEYCAP_COMBINING && i == cluster_len - 1 {
            ends_with_keycap = true;
        }
        if keycap_base.is_none() && (c.is_ascii_digit() || c == '#' || c == '*') {
            keycap_base = Some(c);
        }
        if unicode_width::UnicodeWidthChar::width(c).unwrap_or(1) == 2 {
            any_wide = true;
        }
        if !saw_non_mark_base && !is_combining_mark(c) {
            saw_non_mark_base = true;
            if is_extended_pictographic(c)
                || unicode_width::UnicodeWidthChar::width(c).unwrap_or(1) == 2
            {
                base_wide_or_emoji = true;
            }
        }
    }

    if ends_with_keycap && keycap_base.is_some() {
        return EgcKind::EmojiKeycap;
    }
    if count_ri == 2 && cluster_len == 2 {
        return EgcKind::EmojiFlag;
    }
    if has_zwj && count_ep >= 2 {
        return EgcKind::EmojiZwj;
    }
    if count_ep >= 1 && has_skin {
        return EgcKind::EmojiModifier;
    }
    if count_ep == 1 && !has_zwj && egc.chars().any(|c| c >= '\u{1F300}' || c == VS16) {
        return EgcKind::EmojiSimple;
    }
    if has_combining {
        return EgcKind::Combining(base_wide_or_emoji);
    }
    if any_wide {
        return EgcKind::Wide;
    }
    if count_ep > 0 && egc.chars().any(|c| c >= '\u{1F300}') {
        return EgcKind::EmojiSimple;
    }
    EgcKind::Narrow
}

#[inline]
fn width_for_kind(kind: EgcKind) -> u16 {
    match kind {
        EgcKind::Ascii | EgcKind::Narrow => 1,
        EgcKind::Wide
        | EgcKind::EmojiSimple
        | EgcKind::EmojiModifier
        | EgcKind::EmojiKeycap
        | EgcKind::EmojiFlag
        | EgcKind::EmojiZwj => 2,
        EgcKind::Combining(base_wide) => {
            if base_wide {
                2
            } else {
                1
            }
        }
        EgcKind::Other => 1,
    }
}

/// Return the display column width for a single grapheme cluster (EGC).
///
/// Precondition: `egc` MUST be a single grapheme cluster boundary slice.
/// Empty input returns 0.
#[inline]
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }

    let kind = classify(egc);
    let mut width = width_for_kind(kind);

    // Conservative fallback: supplementary-plane pictographic or regional
    // indicator signals widen a width-1 verdict to avoid cursor drift.
    if width == 1 {
        let mut has_signal = false;
        for c in egc.chars() {
            if (is_extended_pictographic(c) && c >= '\u{1F300}') || is_regional_indicator(c) {
                has_signal = true;
                break;
            }
        }
        if has_signal {
            width = 2;
        }
    }
    width
}

/// Display width of an arbitrary string: the sum of its clusters' widths.
pub fn display_width(s: &str) -> u16 {
    use unicode_segmentation::UnicodeSegmentation;
    s.graphemes(true).map(egc_width).sum()
}

/// Truncate `s` to at most `max_cols` display columns on a cluster boundary.
/// Returns the byte length of the kept prefix and its width.
pub fn truncate_width(s: &str, max_cols: u16) -> (usize, u16) {
    use unicode_segmentation::UnicodeSegmentation;
    let mut cols = 0u16;
    let mut bytes = 0usize;
    for g in s.graphemes(true) {
        let w = egc_width(g);
        if cols + w > max_cols {
            break;
        }
        cols += w;
        bytes += g.len();
    }
    (bytes, cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii() {
        assert_eq!(egc_width("a"), 1);
    }

    #[test]
    fn wide_cjk() {
        assert_eq!(egc_width("界"), 2);
    }

    #[test]
    fn emoji_basic() {
        assert_eq!(egc_width("😀"), 2);
    }

    #[test]
    fn combining_acute() {
        assert_eq!(egc_width("e\u{0301}"), 1);
    }

    #[test]
    fn emoji_flag() {
        assert_eq!(egc_width("🇺🇸"), 2);
    }

    #[test]
    fn emoji_keycap() {
        assert_eq!(egc_width("1️⃣"), 2);
    }

    #[test]
    fn emoji_zwj_family() {
        assert_eq!(egc_width("👨‍👩‍👧‍👦"), 2);
    }

    #[test]
    fn emoji_skin_tone() {
        assert_eq!(egc_width("👍🏻"), 2);
    }

    #[test]
    fn selection_indicator_is_narrow() {
        assert_eq!(egc_width("❯"), 1);
    }

    #[test]
    fn prompt_glyphs_are_narrow() {
        for g in ["◯", "◉", "⊝", ">"] {
            assert_eq!(egc_width(g), 1, "glyph {g} must be one cell");
        }
    }

    #[test]
    fn single_regional_indicator_alone() {
        assert_eq!(egc_width("🇺"), 2);
    }

    #[test]
    fn keycap_without_vs16() {
        assert_eq!(egc_width("2\u{20E3}"), 2);
    }

    #[test]
    fn wide_base_with_combining_mark() {
        let seq = "界\u{0301}";
        assert_eq!(egc_width(seq), 2);
    }

    #[test]
    fn display_width_sums_clusters() {
        assert_eq!(display_width("ab界😀"), 1 + 1 + 2 + 2);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_on_cluster_boundary() {
        let s = "a界b";
        let (bytes, cols) = truncate_width(s, 2);
        assert_eq!(cols, 1, "wide cluster must not be split");
        assert_eq!(&s[..bytes], "a");
        let (bytes, cols) = truncate_width(s, 3);
        assert_eq!(cols, 3);
        assert_eq!(&s[..bytes], "a界");
    }
}
