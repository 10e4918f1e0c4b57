//! Interactive terminal prompt engine.
//!
//! A synchronous, single-threaded engine driving a raw-mode TTY through a
//! sequence of prompts — free-text input, single-select lists, checkbox
//! multi-select, single-key choice, yes/no confirmation, and static text —
//! rendering each prompt frame-by-frame through a differential renderer
//! and collecting typed results.
//!
//! Data flow: keystrokes → non-blocking reader → binding reader →
//! executor state machine → styled frame → differential display → TTY.
//! On commit the flow controller stores the answer, appends a summary line
//! to the shared header, and advances; Escape steps back one prompt with a
//! full visual rewind, and the interrupt key unwinds the whole run.
//!
//! ```no_run
//! use core_prompt::{Prompt, PromptItem, Prompter, PrompterConfig};
//!
//! let mut prompter = Prompter::stdio(PrompterConfig::load());
//! let prompts = vec![
//!     Prompt::input("name", "Your name").default_value("anon").build(),
//!     Prompt::list(
//!         "color",
//!         "Favorite color",
//!         vec![PromptItem::new("r", "red"), PromptItem::new("g", "green")],
//!     ),
//! ];
//! let answers = prompter.run(Vec::new(), &prompts)?;
//! # Ok::<(), core_prompt::PromptError>(())
//! ```

pub mod answer;
pub mod config;
pub mod error;
mod executor;
pub mod flow;
pub mod item;
pub mod ops;
pub mod prompt;
mod session;

pub use answer::{Answer, AnswerMap};
pub use config::{COLORS_ENV, Glyphs, PrompterConfig, StyleSheet};
pub use error::{PromptError, Result};
pub use flow::Prompter;
pub use item::PromptItem;
pub use ops::Op;
pub use prompt::{InputBuilder, InputSpec, Prompt, PromptKind, Validator};
