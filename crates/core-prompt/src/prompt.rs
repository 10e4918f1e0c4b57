//! Prompt variants and their builders.

use crate::item::PromptItem;

/// Validation hook for input prompts. Errors render inline below the
/// prompt, which then continues collecting input.
pub type Validator = Box<dyn Fn(&str) -> Result<(), String>>;

/// Payload of an input prompt.
#[derive(Default)]
pub struct InputSpec {
    pub default_value: Option<String>,
    /// Echo substitute for every typed character (passwords).
    pub mask: Option<char>,
    /// Completion candidates cycled by Tab.
    pub candidates: Vec<String>,
    pub validator: Option<Validator>,
}

/// Variant payloads.
pub enum PromptKind {
    Input(InputSpec),
    List { items: Vec<PromptItem> },
    Checkbox { items: Vec<PromptItem> },
    Choice { items: Vec<PromptItem> },
    Confirm { default_yes: bool },
    Text { lines: Vec<String> },
}

/// One prompt in a run: a unique name, a message, and a variant payload.
pub struct Prompt {
    pub name: String,
    pub message: String,
    pub kind: PromptKind,
}

impl Prompt {
    pub fn input(name: impl Into<String>, message: impl Into<String>) -> InputBuilder {
        InputBuilder {
            name: name.into(),
            message: message.into(),
            spec: InputSpec::default(),
        }
    }

    pub fn list(
        name: impl Into<String>,
        message: impl Into<String>,
        items: Vec<PromptItem>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::List { items },
        }
    }

    pub fn checkbox(
        name: impl Into<String>,
        message: impl Into<String>,
        items: Vec<PromptItem>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Checkbox { items },
        }
    }

    pub fn choice(
        name: impl Into<String>,
        message: impl Into<String>,
        items: Vec<PromptItem>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Choice { items },
        }
    }

    pub fn confirm(
        name: impl Into<String>,
        message: impl Into<String>,
        default_yes: bool,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Confirm { default_yes },
        }
    }

    pub fn text(
        name: impl Into<String>,
        message: impl Into<String>,
        lines: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Text { lines },
        }
    }

    /// Items of a list/checkbox/choice prompt, if any.
    pub fn items(&self) -> Option<&[PromptItem]> {
        match &self.kind {
            PromptKind::List { items }
            | PromptKind::Checkbox { items }
            | PromptKind::Choice { items } => Some(items),
            _ => None,
        }
    }
}

/// Builder for input prompts; the other variants construct directly.
pub struct InputBuilder {
    name: String,
    message: String,
    spec: InputSpec,
}

impl InputBuilder {
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.spec.default_value = Some(value.into());
        self
    }

    pub fn mask(mut self, mask: char) -> Self {
        self.spec.mask = Some(mask);
        self
    }

    pub fn candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn validator(
        mut self,
        validator: impl Fn(&str) -> Result<(), String> + 'static,
    ) -> Self {
        self.spec.validator = Some(Box::new(validator));
        self
    }

    pub fn build(self) -> Prompt {
        Prompt {
            name: self.name,
            message: self.message,
            kind: PromptKind::Input(self.spec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_builder_collects_fields() {
        let p = Prompt::input("user", "Username")
            .default_value("guest")
            .mask('*')
            .candidates(["alice", "bob"])
            .build();
        match p.kind {
            PromptKind::Input(spec) => {
                assert_eq!(spec.default_value.as_deref(), Some("guest"));
                assert_eq!(spec.mask, Some('*'));
                assert_eq!(spec.candidates, vec!["alice", "bob"]);
            }
            _ => panic!("expected input payload"),
        }
    }

    #[test]
    fn items_accessor_covers_item_prompts() {
        let p = Prompt::list("l", "Pick", vec![PromptItem::new("a", "A")]);
        assert_eq!(p.items().unwrap().len(), 1);
        let c = Prompt::confirm("c", "Sure?", true);
        assert!(c.items().is_none());
    }
}
