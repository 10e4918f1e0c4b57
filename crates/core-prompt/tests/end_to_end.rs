//! Whole-engine scenarios: a byte script in, a committed answer map out.
//!
//! The engine runs over an in-memory script as the input source, a no-op
//! fixed-size TTY backend, and a shared byte sink capturing every frame
//! the renderer emits.

use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use core_prompt::{Answer, Prompt, PromptError, PromptItem, Prompter, PrompterConfig};
use core_terminal::NullTty;

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedSink {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn test_config(cancellable: bool) -> PrompterConfig {
    let mut cfg = PrompterConfig::default().cancellable_first_prompt(cancellable);
    // Keep escape-at-end-of-script cases fast.
    cfg.ambiguous_timeout = Duration::from_millis(30);
    cfg
}

fn prompter(script: &[u8], cancellable: bool) -> (Prompter<NullTty, SharedSink>, SharedSink) {
    let sink = SharedSink::default();
    let p = Prompter::with_io(
        test_config(cancellable),
        NullTty::new(80, 24),
        Cursor::new(script.to_vec()),
        sink.clone(),
    );
    (p, sink)
}

fn abc_items() -> Vec<PromptItem> {
    vec![
        PromptItem::new("a", "alpha"),
        PromptItem::new("b", "beta"),
        PromptItem::new("c", "gamma"),
    ]
}

#[test]
fn input_with_default_commits_default_on_bare_enter() {
    let (mut p, _) = prompter(b"\r", false);
    let prompts = vec![Prompt::input("u", "User").default_value("John Doe").build()];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["u"], Answer::Input("John Doe".into()));
}

#[test]
fn input_typed_value_wins_over_default() {
    let (mut p, _) = prompter(b"Ann\r", false);
    let prompts = vec![Prompt::input("u", "User").default_value("John Doe").build()];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["u"], Answer::Input("Ann".into()));
}

#[test]
fn input_editing_operations_shape_the_buffer() {
    // Type "axc", go left, delete the 'x' with backspace, end, type "b".
    let (mut p, _) = prompter(b"axc\x1b[D\x7f\x05b\r", false);
    let prompts = vec![Prompt::input("u", "User").build()];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["u"], Answer::Input("acb".into()));
}

#[test]
fn list_single_column_down_then_enter() {
    let (mut p, _) = prompter(b"\x1b[B\r", false);
    let prompts = vec![Prompt::list("p", "Pick", abc_items())];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["p"], Answer::List(Some("b".into())));
}

#[test]
fn list_navigation_skips_disabled_items() {
    let items = vec![
        PromptItem::new("a", "alpha"),
        PromptItem::unavailable("b", "beta", "not today"),
        PromptItem::new("c", "gamma"),
    ];
    let (mut p, _) = prompter(b"\x1b[B\r", false);
    let prompts = vec![Prompt::list("p", "Pick", items)];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["p"], Answer::List(Some("c".into())));
}

#[test]
fn list_navigation_wraps_past_the_end() {
    // Down three times from alpha wraps back to alpha.
    let (mut p, _) = prompter(b"\x1b[B\x1b[B\x1b[B\r", false);
    let prompts = vec![Prompt::list("p", "Pick", abc_items())];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["p"], Answer::List(Some("a".into())));
}

#[test]
fn checkbox_space_toggles_and_enter_commits_the_set() {
    let items = vec![
        PromptItem::new("x", "ex"),
        PromptItem::new("y", "why"),
    ];
    let (mut p, _) = prompter(b" \x1b[B \r", false);
    let prompts = vec![Prompt::checkbox("c", "Choose", items)];
    let map = p.run(Vec::new(), &prompts).unwrap();
    let expected: BTreeSet<String> = ["x".to_string(), "y".to_string()].into();
    assert_eq!(map["c"], Answer::Checkbox(expected));
}

#[test]
fn checkbox_initial_checks_respect_selectability() {
    let items = vec![
        PromptItem::new("x", "ex").checked(true),
        PromptItem::unavailable("y", "why", "gone").checked(true),
    ];
    let (mut p, _) = prompter(b"\r", false);
    let prompts = vec![Prompt::checkbox("c", "Choose", items)];
    let map = p.run(Vec::new(), &prompts).unwrap();
    let expected: BTreeSet<String> = ["x".to_string()].into();
    assert_eq!(map["c"], Answer::Checkbox(expected));
}

#[test]
fn back_navigation_rewinds_result_and_header() {
    let (mut p, sink) = prompter(b"\r\x1b\r\r", false);
    let prompts = vec![
        Prompt::input("u", "User").default_value("A").build(),
        Prompt::input("v", "Verify").default_value("B").build(),
    ];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["u"], Answer::Input("A".into()));
    assert_eq!(map["v"], Answer::Input("B".into()));
    // The rewound first prompt re-renders after its summary was popped.
    let out = sink.contents();
    assert!(out.matches("User").count() >= 2, "expected re-render of the first prompt");
}

#[test]
fn escape_on_cancellable_first_prompt_returns_empty_map() {
    let (mut p, sink) = prompter(b"\x1b", true);
    let prompts = vec![Prompt::input("u", "User").build()];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert!(map.is_empty());
    assert!(sink.contents().ends_with("\r\n"), "trailing newline expected");
}

#[test]
fn escape_on_non_cancellable_first_prompt_reprompts() {
    let (mut p, _) = prompter(b"\x1bok\r", false);
    let prompts = vec![Prompt::input("u", "User").build()];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["u"], Answer::Input("ok".into()));
}

#[test]
fn choice_bare_enter_commits_the_default() {
    let items = vec![
        PromptItem::new("yes", "Yes").with_key('y').as_default(),
        PromptItem::new("no", "No").with_key('n'),
    ];
    let (mut p, sink) = prompter(b"\r", false);
    let prompts = vec![Prompt::choice("c", "Continue", items)];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["c"], Answer::Choice(Some("yes".into())));
    assert!(sink.contents().contains("Choice"));
}

#[test]
fn choice_shortcut_is_case_insensitive_and_commits_immediately() {
    let items = vec![
        PromptItem::new("yes", "Yes").with_key('y').as_default(),
        PromptItem::new("no", "No").with_key('n'),
    ];
    let (mut p, _) = prompter(b"N\r", false);
    let prompts = vec![Prompt::choice("c", "Continue", items)];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["c"], Answer::Choice(Some("no".into())));
}

#[test]
fn confirm_enter_takes_default_and_typed_key_overrides() {
    let (mut p, _) = prompter(b"\r", false);
    let prompts = vec![Prompt::confirm("ok", "Proceed", true)];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["ok"], Answer::Confirm(true));

    let (mut p, _) = prompter(b"n\r", false);
    let prompts = vec![Prompt::confirm("ok", "Proceed", true)];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["ok"], Answer::Confirm(false));
}

#[test]
fn text_prompt_commits_without_input() {
    let (mut p, sink) = prompter(b"", false);
    let prompts = vec![Prompt::text(
        "banner",
        "Welcome",
        vec!["line one".into(), "line two".into()],
    )];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["banner"], Answer::Text);
    let out = sink.contents();
    assert!(out.contains("line one"));
    assert!(out.contains("line two"));
}

#[test]
fn interrupt_unwinds_the_run_as_cancelled() {
    let (mut p, sink) = prompter(b"\x03", false);
    let prompts = vec![Prompt::input("u", "User").build()];
    let err = p.run(Vec::new(), &prompts).unwrap_err();
    assert!(matches!(err, PromptError::Cancelled));
    assert!(sink.contents().ends_with("\r\n"), "trailing newline expected");
}

#[test]
fn empty_prompt_list_never_touches_the_terminal() {
    let (mut p, sink) = prompter(b"", false);
    let map = p.run(Vec::new(), &[]).unwrap();
    assert!(map.is_empty());
    assert!(sink.contents().is_empty());
}

#[test]
fn empty_item_list_commits_sentinel_immediately() {
    let (mut p, _) = prompter(b"", false);
    let prompts = vec![
        Prompt::list("l", "Pick", Vec::new()),
        Prompt::checkbox("c", "Choose", Vec::new()),
    ];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["l"], Answer::List(None));
    assert_eq!(map["c"], Answer::Checkbox(BTreeSet::new()));
}

#[test]
fn validator_error_renders_inline_and_prompt_continues() {
    let (mut p, sink) = prompter(b"bad\r\x7f\x7f\x7fok\r", false);
    let prompts = vec![
        Prompt::input("u", "User")
            .validator(|v| {
                if v == "bad" {
                    Err("that value is not allowed".into())
                } else {
                    Ok(())
                }
            })
            .build(),
    ];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["u"], Answer::Input("ok".into()));
    assert!(sink.contents().contains("that value is not allowed"));
}

#[test]
fn masked_input_never_echoes_plaintext() {
    let (mut p, sink) = prompter(b"secret\r", false);
    let prompts = vec![Prompt::input("pw", "Password").mask('*').build()];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["pw"], Answer::Input("secret".into()));
    let out = sink.contents();
    assert!(!out.contains("secret"), "plaintext leaked to the terminal");
    assert!(out.contains("******"));
}

#[test]
fn input_tab_cycles_completion_candidates() {
    let (mut p, _) = prompter(b"al\t\r", false);
    let prompts = vec![
        Prompt::input("u", "User")
            .candidates(["albert", "alice", "bob"])
            .build(),
    ];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map["u"], Answer::Input("albert".into()));
}

#[test]
fn header_grows_one_line_per_commit() {
    let (mut p, sink) = prompter(b"\r\r", false);
    let prompts = vec![
        Prompt::input("u", "User").default_value("A").build(),
        Prompt::confirm("ok", "Proceed", true),
    ];
    let map = p.run(Vec::new(), &prompts).unwrap();
    assert_eq!(map.len(), 2);
    // Final screen: both summary lines present, answers echoed.
    let out = sink.contents();
    assert!(out.contains("User"));
    assert!(out.contains("Proceed"));
    assert!(out.contains("yes"));
}

#[test]
fn dynamic_provider_runs_batches_to_completion() {
    let (mut p, _) = prompter(b"\r\r", false);
    let map = p
        .run_dynamic(Vec::new(), |answers| {
            if !answers.contains_key("a") {
                Some(vec![Prompt::input("a", "First").default_value("1").build()])
            } else if !answers.contains_key("b") {
                Some(vec![Prompt::input("b", "Second").default_value("2").build()])
            } else {
                None
            }
        })
        .unwrap();
    assert_eq!(map["a"], Answer::Input("1".into()));
    assert_eq!(map["b"], Answer::Input("2".into()));
}

#[test]
fn dynamic_back_navigation_pops_the_previous_batch() {
    // Commit batch one, escape out of batch two (rewinding batch one),
    // then answer both again.
    let (mut p, _) = prompter(b"\r\x1b\r\r", false);
    let mut first_batch_runs = 0;
    let map = p
        .run_dynamic(Vec::new(), |answers| {
            if !answers.contains_key("a") {
                first_batch_runs += 1;
                Some(vec![Prompt::input("a", "First").default_value("1").build()])
            } else if !answers.contains_key("b") {
                Some(vec![Prompt::input("b", "Second").default_value("2").build()])
            } else {
                None
            }
        })
        .unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(first_batch_runs, 2, "batch one must re-run after the rewind");
}

#[test]
fn sequential_runs_reuse_the_engine() {
    // A completed run releases the engine for the next one.
    let (mut p, _) = prompter(b"\r\r", false);
    let prompts = vec![Prompt::input("u", "User").default_value("A").build()];
    assert!(p.run(Vec::new(), &prompts).is_ok());
    let prompts = vec![Prompt::input("v", "Verify").default_value("B").build()];
    assert!(p.run(Vec::new(), &prompts).is_ok());
}

#[test]
fn initial_header_lines_survive_the_whole_run() {
    use core_text::StyledLine;
    let (mut p, sink) = prompter(b"\r", false);
    let prompts = vec![Prompt::input("u", "User").default_value("A").build()];
    let header = vec![StyledLine::raw("Setup wizard")];
    let map = p.run(header, &prompts).unwrap();
    assert_eq!(map.len(), 1);
    assert!(sink.contents().contains("Setup wizard"));
}
