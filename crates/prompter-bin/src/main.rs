//! Demo programs for the prompt engine.
//!
//! The engine owns stdout while a run is active, so logging goes to
//! `prompter.log` through a non-blocking appender; set `RUST_LOG` to
//! control verbosity.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::Path;
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use core_prompt::{Answer, AnswerMap, Prompt, PromptItem, Prompter, PrompterConfig};
use core_text::StyledLine;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Demo {
    /// Full tour: text banner, input, list, checkbox, choice, confirm.
    Signup,
    /// Provider-driven flow whose later prompts depend on earlier answers.
    Dynamic,
}

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "prompter", version, about = "Interactive prompt engine demos")]
struct Args {
    /// Which demo flow to run.
    #[arg(value_enum, default_value_t = Demo::Signup)]
    demo: Demo,
    /// Escape on the first prompt aborts with no answers.
    #[arg(long)]
    cancellable: bool,
}

fn configure_logging() -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(Path::new("."), "prompter.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn signup_prompts() -> Vec<Prompt> {
    vec![
        Prompt::text(
            "banner",
            "Account setup",
            vec![
                "Welcome! A few questions and you are in.".into(),
                "Press Esc to go back one step, Ctrl-C to abort.".into(),
            ],
        ),
        Prompt::input("user", "Username")
            .default_value("guest")
            .candidates(["guest", "admin", "operator"])
            .validator(|v| {
                if v.chars().all(|c| c.is_ascii_alphanumeric()) {
                    Ok(())
                } else {
                    Err("alphanumeric characters only".into())
                }
            })
            .build(),
        Prompt::input("password", "Password").mask('*').build(),
        Prompt::list(
            "shell",
            "Login shell",
            vec![
                PromptItem::new("bash", "/bin/bash"),
                PromptItem::new("zsh", "/bin/zsh"),
                PromptItem::new("fish", "/usr/bin/fish"),
                PromptItem::unavailable("csh", "/bin/csh", "not installed"),
            ],
        ),
        Prompt::checkbox(
            "features",
            "Optional features",
            vec![
                PromptItem::new("git", "Git integration").checked(true),
                PromptItem::separator("── extras ──"),
                PromptItem::new("docker", "Docker tooling"),
                PromptItem::new("k8s", "Kubernetes client"),
            ],
        ),
        Prompt::choice(
            "plan",
            "Plan",
            vec![
                PromptItem::new("free", "Free tier").with_key('f').as_default(),
                PromptItem::new("pro", "Pro").with_key('p'),
                PromptItem::new("team", "Team").with_key('t'),
            ],
        ),
        Prompt::confirm("confirm", "Create the account", true),
    ]
}

fn dynamic_provider(answers: &AnswerMap) -> Option<Vec<Prompt>> {
    if !answers.contains_key("lang") {
        return Some(vec![Prompt::list(
            "lang",
            "Project language",
            vec![
                PromptItem::new("rust", "Rust"),
                PromptItem::new("go", "Go"),
                PromptItem::new("python", "Python"),
            ],
        )]);
    }
    if !answers.contains_key("tooling") {
        let items = match answers["lang"].selected_id() {
            Some("rust") => vec![
                PromptItem::new("clippy", "clippy").checked(true),
                PromptItem::new("rustfmt", "rustfmt").checked(true),
                PromptItem::new("miri", "miri"),
            ],
            Some("go") => vec![
                PromptItem::new("vet", "go vet").checked(true),
                PromptItem::new("lint", "golangci-lint"),
            ],
            _ => vec![
                PromptItem::new("ruff", "ruff").checked(true),
                PromptItem::new("mypy", "mypy"),
            ],
        };
        return Some(vec![Prompt::checkbox("tooling", "Tooling", items)]);
    }
    if !answers.contains_key("ci") {
        return Some(vec![Prompt::confirm("ci", "Generate CI config", true)]);
    }
    None
}

fn print_answers(map: &AnswerMap) {
    if map.is_empty() {
        println!("no answers collected");
        return;
    }
    for (name, answer) in map {
        match answer {
            Answer::Input(v) => println!("{name} = {v:?}"),
            Answer::List(id) | Answer::Choice(id) => {
                println!("{name} = {}", id.as_deref().unwrap_or("<none>"))
            }
            Answer::Checkbox(ids) => {
                let joined: Vec<&str> = ids.iter().map(String::as_str).collect();
                println!("{name} = [{}]", joined.join(", "));
            }
            Answer::Confirm(v) => println!("{name} = {v}"),
            Answer::Text => {}
        }
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    let args = Args::parse();
    info!(target: "runtime", demo = ?args.demo, "startup");

    let mut config = PrompterConfig::load();
    if args.cancellable {
        config = config.cancellable_first_prompt(true);
    }
    let mut prompter = Prompter::stdio(config);
    let header = vec![StyledLine::raw("prompter demo")];

    let answers = match args.demo {
        Demo::Signup => prompter.run(header, &signup_prompts())?,
        Demo::Dynamic => prompter.run_dynamic(header, dynamic_provider)?,
    };
    print_answers(&answers);
    Ok(())
}
