//! Styled text segments and style-string parsing.
//!
//! A `Span` is a run of text under one `crossterm::style::ContentStyle`; a
//! `StyledLine` is the ordered list of spans making up one terminal row.
//! Lines know their display width and can truncate themselves on cluster
//! boundaries, so the renderer never has to re-measure text.
//!
//! Style strings are comma-separated tokens: attribute names (`bold`,
//! `dim`, `italic`, `underline`, `reverse`, `blink`, `crossed-out`), a bare
//! color name or `#rrggbb`/ANSI-index foreground, or `bg-<color>`. Unknown
//! tokens are ignored and logged at `warn` so a bad override can never fail
//! a run.

use crossterm::style::{Attribute, Color, ContentStyle};
use tracing::warn;

use crate::width::{display_width, truncate_width};

/// Fluent builder for `ContentStyle` values.
#[derive(Default)]
pub struct StyleBuilder {
    style: ContentStyle,
}

impl StyleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color.
    pub fn fg(mut self, color: Color) -> Self {
        self.style.foreground_color = Some(color);
        self
    }

    /// Set the background color.
    pub fn bg(mut self, color: Color) -> Self {
        self.style.background_color = Some(color);
        self
    }

    /// Add a text attribute.
    pub fn attr(mut self, attribute: Attribute) -> Self {
        self.style.attributes.set(attribute);
        self
    }

    pub fn build(self) -> ContentStyle {
        self.style
    }
}

fn parse_color(token: &str) -> Option<Color> {
    if let Some(hex) = token.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Color::Rgb { r, g, b });
        }
        return None;
    }
    if let Ok(n) = token.parse::<u8>() {
        return Some(Color::AnsiValue(n));
    }
    let color = match token {
        "black" => Color::Black,
        "red" => Color::Red,
        "dark-red" => Color::DarkRed,
        "green" => Color::Green,
        "dark-green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark-yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark-blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark-magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark-cyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "dark-grey" | "dark-gray" => Color::DarkGrey,
        _ => return None,
    };
    Some(color)
}

fn parse_attribute(token: &str) -> Option<Attribute> {
    let attr = match token {
        "bold" => Attribute::Bold,
        "dim" => Attribute::Dim,
        "italic" => Attribute::Italic,
        "underline" => Attribute::Underlined,
        "reverse" => Attribute::Reverse,
        "blink" => Attribute::SlowBlink,
        "crossed-out" => Attribute::CrossedOut,
        _ => return None,
    };
    Some(attr)
}

/// Parse a comma-separated style string into a `ContentStyle`.
pub fn parse_style(spec: &str) -> ContentStyle {
    let mut builder = StyleBuilder::new();
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(attr) = parse_attribute(token) {
            builder = builder.attr(attr);
        } else if let Some(rest) = token.strip_prefix("bg-") {
            match parse_color(rest) {
                Some(c) => builder = builder.bg(c),
                None => warn!(target: "config", token, "unknown_background_color"),
            }
        } else if let Some(c) = parse_color(token) {
            builder = builder.fg(c);
        } else {
            warn!(target: "config", token, "unknown_style_token");
        }
    }
    builder.build()
}

// -------------------------------------------------------------------------------------------------
// Span / StyledLine
// -------------------------------------------------------------------------------------------------

/// A run of text rendered under a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: ContentStyle,
}

impl Span {
    /// Unstyled text.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: ContentStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: ContentStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn width(&self) -> u16 {
        display_width(&self.text)
    }
}

/// One terminal row assembled from styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<Span>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::raw(text)],
        }
    }

    pub fn push(&mut self, span: Span) {
        if !span.text.is_empty() {
            self.spans.push(span);
        }
    }

    pub fn push_raw(&mut self, text: impl Into<String>) {
        self.push(Span::raw(text));
    }

    pub fn push_styled(&mut self, text: impl Into<String>, style: ContentStyle) {
        self.push(Span::styled(text, style));
    }

    /// Total display width of the line in terminal cells.
    pub fn width(&self) -> u16 {
        self.spans.iter().map(Span::width).sum()
    }

    /// Concatenated text without styling.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Render the line into a byte-for-byte reproducible ANSI string.
    /// Default-styled spans emit bare text so unstyled lines carry no
    /// escape sequences at all.
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            if span.style == ContentStyle::default() {
                out.push_str(&span.text);
            } else {
                out.push_str(&span.style.apply(span.text.as_str()).to_string());
            }
        }
        out
    }

    /// Truncate to at most `max_cols` display columns, on cluster boundaries.
    pub fn truncated(&self, max_cols: u16) -> StyledLine {
        let mut out = StyledLine::new();
        let mut remaining = max_cols;
        for span in &self.spans {
            if remaining == 0 {
                break;
            }
            let w = span.width();
            if w <= remaining {
                remaining -= w;
                out.spans.push(span.clone());
            } else {
                let (bytes, used) = truncate_width(&span.text, remaining);
                if bytes > 0 {
                    out.spans
                        .push(Span::styled(span.text[..bytes].to_string(), span.style));
                }
                remaining -= used;
                break;
            }
        }
        out
    }
}

impl From<Span> for StyledLine {
    fn from(span: Span) -> Self {
        Self { spans: vec![span] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_foreground_and_attrs() {
        let s = parse_style("cyan,bold");
        assert_eq!(s.foreground_color, Some(Color::Cyan));
        assert!(s.attributes.has(Attribute::Bold));
    }

    #[test]
    fn parse_background_and_hex() {
        let s = parse_style("bg-blue,#ff8000");
        assert_eq!(s.background_color, Some(Color::Blue));
        assert_eq!(
            s.foreground_color,
            Some(Color::Rgb {
                r: 0xff,
                g: 0x80,
                b: 0x00
            })
        );
    }

    #[test]
    fn parse_ignores_unknown_tokens() {
        let s = parse_style("sparkly,red");
        assert_eq!(s.foreground_color, Some(Color::Red));
    }

    #[test]
    fn unstyled_line_has_no_escapes() {
        let line = StyledLine::raw("plain");
        assert_eq!(line.to_ansi(), "plain");
    }

    #[test]
    fn styled_line_width_counts_cells() {
        let mut line = StyledLine::new();
        line.push_raw("ab");
        line.push_styled("界", parse_style("bold"));
        assert_eq!(line.width(), 4);
        assert_eq!(line.plain(), "ab界");
    }

    #[test]
    fn truncation_respects_span_boundaries() {
        let mut line = StyledLine::new();
        line.push_raw("abc");
        line.push_styled("def", parse_style("dim"));
        let t = line.truncated(4);
        assert_eq!(t.plain(), "abcd");
        assert_eq!(t.spans.len(), 2);
        assert_eq!(t.spans[1].text, "d");
    }

    #[test]
    fn empty_spans_are_dropped() {
        let mut line = StyledLine::new();
        line.push_raw("");
        line.push_raw("x");
        assert_eq!(line.spans.len(), 1);
    }
}
