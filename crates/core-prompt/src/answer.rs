//! Committed prompt results.

use std::collections::{BTreeMap, BTreeSet};

/// The typed value a prompt commits.
///
/// `List`/`Choice` carry `None` only when the prompt had zero selectable
/// items and committed immediately with an empty selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Input(String),
    List(Option<String>),
    Checkbox(BTreeSet<String>),
    Choice(Option<String>),
    Confirm(bool),
    Text,
}

impl Answer {
    pub fn as_input(&self) -> Option<&str> {
        match self {
            Answer::Input(s) => Some(s),
            _ => None,
        }
    }

    /// Selected id of a single-select commit (list or choice).
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            Answer::List(id) | Answer::Choice(id) => id.as_deref(),
            _ => None,
        }
    }

    pub fn checked_ids(&self) -> Option<&BTreeSet<String>> {
        match self {
            Answer::Checkbox(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn as_confirm(&self) -> Option<bool> {
        match self {
            Answer::Confirm(v) => Some(*v),
            _ => None,
        }
    }
}

/// Results of a run, keyed by prompt name. Keys are exactly the prompts
/// whose commit has been reached and not rewound.
pub type AnswerMap = BTreeMap<String, Answer>;
