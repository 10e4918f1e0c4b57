//! Prompter configuration: glyphs, styles, behavior knobs.
//!
//! Sources, in increasing precedence:
//! 1. Platform defaults (Unicode glyphs on Unix-likes, ASCII on Windows).
//! 2. `prompter.toml` — current directory first, then the platform config
//!    dir. Parse errors fall back to defaults; a config file can never
//!    fail a run.
//! 3. The `PROMPTER_COLORS` environment variable for styles:
//!    colon-separated `key=value` pairs, each value a comma-separated
//!    style string (`cyan,bold`, `bg-blue`, `#ff8000`). Unknown keys and
//!    malformed entries are logged at `warn` and skipped.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::style::{Attribute, Color, ContentStyle};
use serde::Deserialize;
use tracing::{info, warn};

use core_text::{StyleBuilder, parse_style};

/// Environment variable carrying style overrides.
pub const COLORS_ENV: &str = "PROMPTER_COLORS";

// -------------------------------------------------------------------------------------------------
// Glyphs
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    /// Drawn on the cursor row.
    pub indicator: String,
    pub unchecked: String,
    pub checked: String,
    /// Drawn instead of a checkbox on disabled rows.
    pub unavailable: String,
}

impl Glyphs {
    pub fn unix() -> Self {
        Self {
            indicator: "❯".into(),
            unchecked: "◯ ".into(),
            checked: "◉ ".into(),
            unavailable: "⊝ ".into(),
        }
    }

    pub fn windows() -> Self {
        Self {
            indicator: ">".into(),
            unchecked: "( )".into(),
            checked: "(x)".into(),
            unavailable: "( )".into(),
        }
    }

    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::windows()
        } else {
            Self::unix()
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Styles
// -------------------------------------------------------------------------------------------------

/// Resolved styles for every themable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSheet {
    /// `cu` — cursor indicator.
    pub cursor: ContentStyle,
    /// `be` — box element (unchecked / frame glyphs).
    pub box_element: ContentStyle,
    /// `bd` — disabled rows and separators.
    pub disabled: ContentStyle,
    /// `pr` — prompt marker (`?`).
    pub marker: ContentStyle,
    /// `me` — prompt message.
    pub message: ContentStyle,
    /// `an` — committed answer echo.
    pub answer: ContentStyle,
    /// `se` — text of the row under the cursor.
    pub selected: ContentStyle,
    /// `cb` — checked checkbox glyph.
    pub checkbox: ContentStyle,
    /// Inline validation errors (not environment-themable).
    pub error: ContentStyle,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            cursor: StyleBuilder::new().fg(Color::Cyan).build(),
            box_element: StyleBuilder::new().fg(Color::Cyan).build(),
            disabled: StyleBuilder::new().attr(Attribute::Dim).build(),
            marker: StyleBuilder::new().fg(Color::Green).build(),
            message: StyleBuilder::new().attr(Attribute::Bold).build(),
            answer: StyleBuilder::new().fg(Color::Cyan).build(),
            selected: StyleBuilder::new().attr(Attribute::Bold).build(),
            checkbox: StyleBuilder::new().fg(Color::Green).build(),
            error: StyleBuilder::new().fg(Color::Red).build(),
        }
    }
}

impl StyleSheet {
    /// Apply a `PROMPTER_COLORS`-format override string.
    pub fn apply_overrides(&mut self, spec: &str) {
        for pair in spec.split(':') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let Some((key, value)) = pair.split_once('=') else {
                warn!(target: "config", entry = pair, "style_entry_missing_equals");
                continue;
            };
            let style = parse_style(value);
            match key {
                "cu" => self.cursor = style,
                "be" => self.box_element = style,
                "bd" => self.disabled = style,
                "pr" => self.marker = style,
                "me" => self.message = style,
                "an" => self.answer = style,
                "se" => self.selected = style,
                "cb" => self.checkbox = style,
                other => warn!(target: "config", key = other, "unknown_style_key"),
            }
        }
    }

    /// Read overrides from the environment, if set.
    pub fn apply_env(&mut self) {
        if let Ok(spec) = std::env::var(COLORS_ENV) {
            self.apply_overrides(&spec);
        }
    }
}

// -------------------------------------------------------------------------------------------------
// File format
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
struct GlyphsFile {
    indicator: Option<String>,
    unchecked: Option<String>,
    checked: Option<String>,
    unavailable: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
struct BehaviorFile {
    cancellable_first_prompt: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
struct InputFile {
    #[serde(default = "InputFile::default_ambiguous_timeout_ms")]
    ambiguous_timeout_ms: u64,
}

impl Default for InputFile {
    fn default() -> Self {
        Self {
            ambiguous_timeout_ms: Self::default_ambiguous_timeout_ms(),
        }
    }
}

impl InputFile {
    const fn default_ambiguous_timeout_ms() -> u64 {
        150
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
struct ConfigFile {
    #[serde(default)]
    glyphs: GlyphsFile,
    #[serde(default)]
    behavior: BehaviorFile,
    #[serde(default)]
    input: InputFile,
}

/// Best-effort config path following platform conventions.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("prompter.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("prompter").join("prompter.toml");
    }
    PathBuf::from("prompter.toml")
}

// -------------------------------------------------------------------------------------------------
// Resolved configuration
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PrompterConfig {
    pub glyphs: Glyphs,
    pub styles: StyleSheet,
    /// Escape on the first prompt aborts the run with an empty map.
    pub cancellable_first_prompt: bool,
    /// Wait at an ambiguous key-sequence node before committing its leaf.
    pub ambiguous_timeout: Duration,
}

impl Default for PrompterConfig {
    fn default() -> Self {
        Self {
            glyphs: Glyphs::platform_default(),
            styles: StyleSheet::default(),
            cancellable_first_prompt: false,
            ambiguous_timeout: Duration::from_millis(150),
        }
    }
}

impl PrompterConfig {
    /// Load from the discovered config file and the environment.
    pub fn load() -> Self {
        match Self::load_from(None) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(target: "config", error = %e, "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(discover);
        let mut cfg = Self::default();
        if let Ok(content) = std::fs::read_to_string(&path) {
            match toml::from_str::<ConfigFile>(&content) {
                Ok(file) => {
                    cfg.apply_file(&file);
                    info!(target: "config", path = %path.display(), "config_loaded");
                }
                Err(e) => {
                    warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
                }
            }
        }
        cfg.styles.apply_env();
        Ok(cfg)
    }

    pub fn cancellable_first_prompt(mut self, cancellable: bool) -> Self {
        self.cancellable_first_prompt = cancellable;
        self
    }

    fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(v) = &file.glyphs.indicator {
            self.glyphs.indicator = v.clone();
        }
        if let Some(v) = &file.glyphs.unchecked {
            self.glyphs.unchecked = v.clone();
        }
        if let Some(v) = &file.glyphs.checked {
            self.glyphs.checked = v.clone();
        }
        if let Some(v) = &file.glyphs.unavailable {
            self.glyphs.unavailable = v.clone();
        }
        if let Some(v) = file.behavior.cancellable_first_prompt {
            self.cancellable_first_prompt = v;
        }
        self.ambiguous_timeout = Duration::from_millis(file.input.ambiguous_timeout_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform() {
        let cfg = PrompterConfig::default();
        if cfg!(windows) {
            assert_eq!(cfg.glyphs.indicator, ">");
        } else {
            assert_eq!(cfg.glyphs.indicator, "❯");
        }
        assert!(!cfg.cancellable_first_prompt);
        assert_eq!(cfg.ambiguous_timeout, Duration::from_millis(150));
    }

    #[test]
    fn style_overrides_replace_listed_keys_only() {
        let mut styles = StyleSheet::default();
        styles.apply_overrides("cu=red:zz=blue:pr=yellow,bold");
        assert_eq!(styles.cursor.foreground_color, Some(Color::Red));
        assert_eq!(styles.marker.foreground_color, Some(Color::Yellow));
        assert!(styles.marker.attributes.has(Attribute::Bold));
        // Untouched keys keep their defaults.
        assert_eq!(styles.answer.foreground_color, Some(Color::Cyan));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let mut styles = StyleSheet::default();
        styles.apply_overrides("nonsense:an=green");
        assert_eq!(styles.answer.foreground_color, Some(Color::Green));
    }

    #[test]
    fn config_file_overrides_glyphs_and_behavior() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[glyphs]\nindicator = \">\"\n[behavior]\ncancellable_first_prompt = true\n[input]\nambiguous_timeout_ms = 80\n",
        )
        .unwrap();
        let cfg = PrompterConfig::load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.glyphs.indicator, ">");
        assert!(cfg.cancellable_first_prompt);
        assert_eq!(cfg.ambiguous_timeout, Duration::from_millis(80));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg =
            PrompterConfig::load_from(Some(PathBuf::from("__nonexistent_prompter__.toml")))
                .unwrap();
        assert_eq!(cfg.glyphs, Glyphs::platform_default());
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "not [valid toml").unwrap();
        let cfg = PrompterConfig::load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.glyphs, Glyphs::platform_default());
    }
}
