//! Prompt flow controller.
//!
//! Drives a sequence of prompts over one raw-mode session: static lists
//! via `run`, provider-driven sequences via `run_dynamic`. Commits are
//! transactional with the header — each one appends exactly one summary
//! line and records an undo entry, so a single back step (Escape) rewinds
//! both the result map and the visual context deterministically.
//!
//! Contract:
//! - Raw mode is entered exactly once per run and restored on every exit
//!   path (normal completion, cancel, error; panic is covered by `Drop`).
//! - The final screen state shows the accumulated header and a trailing
//!   newline, with no live cursor artefacts.
//! - Interrupt (`Ctrl-C`) unwinds the whole run as `PromptError::Cancelled`
//!   after the terminal is restored; Escape is local back-navigation and
//!   never an error.
//! - Re-entering the engine while a run is active is a usage error.

use std::io::{self, Write};

use tracing::{debug, info, warn};

use core_input::NonBlockingReader;
use core_keymap::BindingReader;
use core_render::Display;
use core_terminal::{CrosstermTty, TtyBackend};
use core_text::StyledLine;

use crate::answer::{Answer, AnswerMap};
use crate::config::PrompterConfig;
use crate::error::{PromptError, Result};
use crate::executor;
use crate::prompt::{Prompt, PromptKind};
use crate::session::Session;

/// Per-commit rewind record: what one back step must undo.
struct UndoRecord {
    name: String,
    header_added: usize,
}

enum BatchOutcome {
    Completed {
        names: Vec<String>,
        header_added: usize,
    },
    /// The user escaped past the first uncommitted prompt of the batch.
    SteppedBack,
}

/// The interactive prompt engine.
pub struct Prompter<B: TtyBackend, W: Write> {
    backend: B,
    display: Display<W>,
    reader: NonBlockingReader,
    binding: BindingReader,
    config: PrompterConfig,
    header: Vec<StyledLine>,
    active: bool,
}

impl Prompter<CrosstermTty, io::Stdout> {
    /// Engine over the process stdio with the given configuration.
    pub fn stdio(config: PrompterConfig) -> Self {
        Self::with_io(config, CrosstermTty::new(), io::stdin(), io::stdout())
    }
}

impl<B: TtyBackend, W: Write> Prompter<B, W> {
    /// Engine over explicit collaborators. `source` feeds the key decoder;
    /// `sink` receives the rendered frames.
    pub fn with_io<R>(config: PrompterConfig, backend: B, source: R, sink: W) -> Self
    where
        R: io::Read + Send + 'static,
    {
        Self {
            backend,
            display: Display::new(sink),
            reader: NonBlockingReader::spawn(source),
            binding: BindingReader::new(),
            config,
            header: Vec::new(),
            active: false,
        }
    }

    pub fn config(&self) -> &PrompterConfig {
        &self.config
    }

    /// Run a static prompt list. Returns the committed answers; empty when
    /// the user escaped past a cancellable first prompt.
    pub fn run(&mut self, header: Vec<StyledLine>, prompts: &[Prompt]) -> Result<AnswerMap> {
        if prompts.is_empty() {
            // Nothing to ask: never touch raw mode.
            return Ok(AnswerMap::new());
        }
        self.begin(header)?;
        let mut map = AnswerMap::new();
        let result = self.drive_static(prompts, &mut map);
        self.finish(result.map(|_| map))
    }

    /// Run a dynamic sequence: `provider` receives the cumulative answers
    /// and returns the next prompt batch, or `None` to terminate.
    pub fn run_dynamic<P>(&mut self, header: Vec<StyledLine>, mut provider: P) -> Result<AnswerMap>
    where
        P: FnMut(&AnswerMap) -> Option<Vec<Prompt>>,
    {
        self.begin(header)?;
        let mut map = AnswerMap::new();
        let result = self.drive_dynamic(&mut provider, &mut map);
        self.finish(result.map(|_| map))
    }

    fn begin(&mut self, header: Vec<StyledLine>) -> Result<()> {
        if self.active {
            return Err(PromptError::Usage(
                "prompt engine re-entered while a run is active".into(),
            ));
        }
        self.header = header;
        self.backend.enter().map_err(PromptError::Terminal)?;
        self.active = true;
        info!(target: "prompt.flow", header_lines = self.header.len(), "run_start");
        Ok(())
    }

    /// Restore the terminal and rewrite the final screen: accumulated
    /// header, trailing newline, no cursor artefacts. Teardown failures
    /// are secondary to a primary error.
    fn finish(&mut self, primary: Result<AnswerMap>) -> Result<AnswerMap> {
        let teardown = self.rewrite_final_screen();
        let left = self.backend.leave().map_err(PromptError::Terminal);
        self.active = false;
        self.header.clear();
        match primary {
            Ok(map) => {
                teardown?;
                left?;
                info!(target: "prompt.flow", answers = map.len(), "run_complete");
                Ok(map)
            }
            Err(e) => {
                if let Err(t) = teardown {
                    warn!(target: "prompt.flow", error = %t, "teardown_after_failure");
                }
                if let Err(t) = left {
                    warn!(target: "prompt.flow", error = %t, "restore_after_failure");
                }
                info!(target: "prompt.flow", error = %e, "run_aborted");
                Err(e)
            }
        }
    }

    fn rewrite_final_screen(&mut self) -> Result<()> {
        let size = self.backend.size().map_err(PromptError::Terminal)?;
        let row = self.header.len().saturating_sub(1);
        let col = self.header.last().map(StyledLine::width).unwrap_or(0);
        self.display.draw(&self.header, (row, col), size)?;
        self.display.finalize()?;
        Ok(())
    }

    fn drive_static(&mut self, prompts: &[Prompt], map: &mut AnswerMap) -> Result<()> {
        loop {
            match self.run_batch(prompts, map)? {
                BatchOutcome::Completed { .. } => return Ok(()),
                BatchOutcome::SteppedBack => {
                    if self.config.cancellable_first_prompt {
                        map.clear();
                        debug!(target: "prompt.flow", "run_cancelled_at_first_prompt");
                        return Ok(());
                    }
                    // Not cancellable: re-prompt from the first prompt.
                }
            }
        }
    }

    fn drive_dynamic<P>(&mut self, provider: &mut P, map: &mut AnswerMap) -> Result<()>
    where
        P: FnMut(&AnswerMap) -> Option<Vec<Prompt>>,
    {
        // Prior batches: names committed and header lines added, for
        // cross-batch back-navigation.
        let mut batches: Vec<(Vec<String>, usize)> = Vec::new();
        loop {
            let Some(prompts) = provider(map) else {
                return Ok(());
            };
            if prompts.is_empty() {
                return Ok(());
            }
            match self.run_batch(&prompts, map)? {
                BatchOutcome::Completed {
                    names,
                    header_added,
                } => batches.push((names, header_added)),
                BatchOutcome::SteppedBack => {
                    if let Some((names, header_added)) = batches.pop() {
                        for name in &names {
                            map.remove(name);
                        }
                        for _ in 0..header_added {
                            self.header.pop();
                        }
                        debug!(
                            target: "prompt.flow",
                            keys_removed = names.len(),
                            header_popped = header_added,
                            "batch_rewind"
                        );
                    } else if self.config.cancellable_first_prompt {
                        map.clear();
                        debug!(target: "prompt.flow", "run_cancelled_at_first_prompt");
                        return Ok(());
                    }
                    // Not cancellable with nothing to pop: re-run the batch.
                }
            }
        }
    }

    /// Execute one batch under static semantics: commit forward, one-step
    /// back on Escape, `SteppedBack` when Escape falls off the front.
    fn run_batch(&mut self, prompts: &[Prompt], map: &mut AnswerMap) -> Result<BatchOutcome> {
        let mut undo: Vec<UndoRecord> = Vec::new();
        let mut i = 0usize;
        while i < prompts.len() {
            let prompt = &prompts[i];
            match self.execute_prompt(prompt)? {
                Some(answer) => {
                    let summary = self.summary_line(prompt, &answer);
                    self.header.push(summary);
                    map.insert(prompt.name.clone(), answer);
                    undo.push(UndoRecord {
                        name: prompt.name.clone(),
                        header_added: 1,
                    });
                    debug!(target: "prompt.flow", prompt = %prompt.name, "prompt_commit");
                    i += 1;
                }
                None => {
                    debug!(target: "prompt.flow", prompt = %prompt.name, "prompt_back");
                    match undo.pop() {
                        Some(rec) => {
                            map.remove(&rec.name);
                            for _ in 0..rec.header_added {
                                self.header.pop();
                            }
                            i -= 1;
                        }
                        None => return Ok(BatchOutcome::SteppedBack),
                    }
                }
            }
        }
        Ok(BatchOutcome::Completed {
            names: undo.iter().map(|r| r.name.clone()).collect(),
            header_added: undo.iter().map(|r| r.header_added).sum(),
        })
    }

    fn execute_prompt(&mut self, prompt: &Prompt) -> Result<Option<Answer>> {
        debug!(target: "prompt.exec", prompt = %prompt.name, "prompt_start");
        let mut sess = Session {
            backend: &mut self.backend,
            display: &mut self.display,
            reader: &mut self.reader,
            binding: &mut self.binding,
            config: &self.config,
            header: &self.header,
        };
        match &prompt.kind {
            PromptKind::Input(spec) => executor::input::run(&mut sess, &prompt.message, spec),
            PromptKind::List { items } => executor::list::run(&mut sess, &prompt.message, items),
            PromptKind::Checkbox { items } => {
                executor::checkbox::run(&mut sess, &prompt.message, items)
            }
            PromptKind::Choice { items } => {
                executor::choice::run(&mut sess, &prompt.message, items)
            }
            PromptKind::Confirm { default_yes } => {
                executor::confirm::run(&mut sess, &prompt.message, *default_yes)
            }
            PromptKind::Text { lines } => executor::text::run(&mut sess, lines),
        }
    }

    /// The "? message answer" line appended to the header on commit. The
    /// answer is styled and appended only when a textual one exists.
    fn summary_line(&self, prompt: &Prompt, answer: &Answer) -> StyledLine {
        let st = &self.config.styles;
        let mut line = StyledLine::new();
        line.push_styled("?", st.marker);
        line.push_raw(" ");
        line.push_styled(prompt.message.clone(), st.message);
        if let Some(text) = answer_text(prompt, answer).filter(|t| !t.is_empty()) {
            line.push_raw(" ");
            line.push_styled(text, st.answer);
        }
        line
    }
}

impl<B: TtyBackend, W: Write> Drop for Prompter<B, W> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}

/// Echoed answer text for the header summary, when one exists.
fn answer_text(prompt: &Prompt, answer: &Answer) -> Option<String> {
    match answer {
        Answer::Input(value) => {
            let mask = match &prompt.kind {
                PromptKind::Input(spec) => spec.mask,
                _ => None,
            };
            Some(match mask {
                Some(m) => m.to_string().repeat(value.chars().count()),
                None => value.clone(),
            })
        }
        Answer::Confirm(v) => Some(if *v { "yes" } else { "no" }.to_string()),
        Answer::List(Some(id)) | Answer::Choice(Some(id)) => prompt
            .items()?
            .iter()
            .find(|i| i.name == *id)
            .map(|i| i.text.clone()),
        Answer::List(None) | Answer::Choice(None) => None,
        Answer::Checkbox(ids) => {
            if ids.is_empty() {
                return None;
            }
            Some(
                prompt
                    .items()?
                    .iter()
                    .filter(|i| ids.contains(&i.name))
                    .map(|i| i.text.clone())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        }
        Answer::Text => None,
    }
}
