//! Prompt item model.
//!
//! The list/checkbox/choice variants share one record; per-variant extras
//! (shortcut key, default flag, initial check state) live on the same
//! struct and are ignored by executors that do not use them.
//!
//! Invariants enforced by construction:
//! - A separator is never selectable and carries no name.
//! - A disabled item is never selectable; it renders with the
//!   "unavailable" glyph and its reason in parentheses.

/// One row of a list, checkbox, or choice prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptItem {
    /// Identifier committed in results. Unique within a prompt.
    pub name: String,
    /// Visible row text.
    pub text: String,
    /// Whether the cursor may land on (and commit) this item.
    pub selectable: bool,
    /// Disabled items render dimmed with a reason; separators do not.
    pub disabled: bool,
    /// Reason shown after a disabled item's text.
    pub disabled_text: Option<String>,
    /// Single-character shortcut (required for choice items).
    pub key: Option<char>,
    /// Marks the choice committed by a bare Enter.
    pub default: bool,
    /// Initial toggle state in checkbox prompts.
    pub initially_checked: bool,
}

impl PromptItem {
    /// A selectable item.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            selectable: true,
            disabled: false,
            disabled_text: None,
            key: None,
            default: false,
            initially_checked: false,
        }
    }

    /// A non-selectable separator row.
    pub fn separator(text: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            text: text.into(),
            selectable: false,
            disabled: false,
            disabled_text: None,
            key: None,
            default: false,
            initially_checked: false,
        }
    }

    /// A visible but unavailable item: skipped by navigation, rendered
    /// with its reason.
    pub fn unavailable(
        name: impl Into<String>,
        text: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            selectable: false,
            disabled: true,
            disabled_text: Some(reason.into()),
            key: None,
            default: false,
            initially_checked: false,
        }
    }

    pub fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.initially_checked = checked;
        self
    }

    /// Reason rendered after a disabled item.
    pub fn disabled_reason(&self) -> &str {
        self.disabled_text.as_deref().unwrap_or("unavailable")
    }

    /// Shortcut match, case-insensitive.
    pub fn matches_key(&self, c: char) -> bool {
        self.key
            .is_some_and(|k| k.eq_ignore_ascii_case(&c) || k == c)
    }
}
