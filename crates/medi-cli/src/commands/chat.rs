//! `medi chat`: a line-oriented conversation loop.
//!
//! Plain lines are prompts. Lines starting with `?` preview suggestions for the
//! text without submitting, and `:` lines drive the dropdown and the session
//! (`:down`, `:up`, `:enter`, `:esc`, `:2`, `:view age-chart`, `:history`, ...).
//! An empty line presses Enter on the current input.

use std::io::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use medi_client::HttpQueryClient;
use medi_config::MediConfig;
use medi_core::{GenerationId, GenerationStatus, SubmitPolicy, ViewKind};
use medi_session::{Completion, FocusSink, InputOutcome, SessionController};
use medi_suggest::corpus::QUICK_PROMPTS;
use medi_suggest::{Key, SuggestionKeyOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ChatArgs;
use crate::commands::shared::{format_generation, session_options};
use crate::output::table_options;
use crate::output::views::{render_history, render_suggestions};

const HELP: &str = "\
Type a question and press Enter to ask it.
  ?text            preview suggestions for text without sending it
  :down :up        move through the suggestions
  :enter           accept the selected suggestion, or send the input
  :esc             close the suggestions
  :newline         add a line break to the input
  :N               accept suggestion N
  :view VIEW [ID]  show a response as table, statistics, gender-chart, age-chart or all
  :history         list every question so far
  :quick N         send starter prompt N
  :help            show this help
  :quit            leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Submit(String),
    Preview(String),
    Key(Key),
    /// 1-based suggestion number.
    Pick(usize),
    View {
        views: Vec<ViewKind>,
        id: Option<GenerationId>,
    },
    History,
    /// 1-based starter prompt number.
    Quick(usize),
    Help,
    Quit,
    Invalid(String),
}

#[must_use]
pub fn parse_chat_line(line: &str) -> ChatCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ChatCommand::Key(Key::Enter);
    }
    if let Some(text) = trimmed.strip_prefix('?') {
        return ChatCommand::Preview(text.trim_start().to_string());
    }
    let Some(command) = trimmed.strip_prefix(':') else {
        return ChatCommand::Submit(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let mut words = command.split_whitespace();
    let head = words.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = words.collect();

    match (head.as_str(), rest.as_slice()) {
        ("down", []) => ChatCommand::Key(Key::Down),
        ("up", []) => ChatCommand::Key(Key::Up),
        ("enter", []) => ChatCommand::Key(Key::Enter),
        ("esc" | "escape", []) => ChatCommand::Key(Key::Escape),
        ("newline", []) => ChatCommand::Key(Key::ShiftEnter),
        ("history", []) => ChatCommand::History,
        ("help", []) => ChatCommand::Help,
        ("quit" | "q" | "exit", []) => ChatCommand::Quit,
        ("quick", [n]) => parse_position(n).map_or_else(
            || ChatCommand::Invalid(format!("not a starter prompt number: {n}")),
            ChatCommand::Quick,
        ),
        ("view", [view, id @ ..]) if id.len() <= 1 => parse_view(view, id.first().copied()),
        (number, []) => parse_position(number).map_or_else(
            || ChatCommand::Invalid(format!("unknown command :{command}")),
            ChatCommand::Pick,
        ),
        _ => ChatCommand::Invalid(format!("unknown command :{command}")),
    }
}

fn parse_position(text: &str) -> Option<usize> {
    text.parse::<usize>().ok().filter(|n| *n > 0)
}

fn parse_view(view: &str, id: Option<&str>) -> ChatCommand {
    let views = if view.eq_ignore_ascii_case("all") {
        ViewKind::ALL.to_vec()
    } else {
        match view.parse::<ViewKind>() {
            Ok(kind) => vec![kind],
            Err(error) => return ChatCommand::Invalid(error.to_string()),
        }
    };

    let id = match id {
        None => None,
        Some(raw) => match raw.strip_prefix("gen-").unwrap_or(raw).parse::<u64>() {
            Ok(n) => Some(GenerationId::new(n)),
            Err(_) => return ChatCommand::Invalid(format!("not a generation id: {raw}")),
        },
    };

    ChatCommand::View { views, id }
}

/// Remembers that the input should be re-presented after a suggestion commit.
#[derive(Debug, Default)]
struct PromptFocus(AtomicBool);

impl PromptFocus {
    fn take(&self) -> bool {
        self.0.swap(false, Ordering::Relaxed)
    }
}

impl FocusSink for PromptFocus {
    fn restore_focus(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

enum Event {
    Line(Option<String>),
    Completion(Option<Completion>),
}

enum Flow {
    Continue,
    Quit,
}

struct Chat<'a> {
    session: SessionController,
    focus: Arc<PromptFocus>,
    views: Vec<ViewKind>,
    flags: &'a GlobalFlags,
}

/// Handle `medi chat`.
pub async fn handle(args: &ChatArgs, config: &MediConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut options = session_options(config);
    if args.concurrent {
        options.policy = SubmitPolicy::Concurrent;
    }

    let client = Arc::new(HttpQueryClient::new(&config.backend));
    tracing::info!(endpoint = client.endpoint(), policy = ?options.policy, "chat session started");

    let focus = Arc::new(PromptFocus::default());
    let mut chat = Chat {
        session: SessionController::new(client, options)
            .with_focus_sink(Arc::clone(&focus) as Arc<dyn FocusSink>),
        focus,
        views: vec![config.general.default_view],
        flags,
    };

    if !flags.quiet {
        println!("MediFire chat. Type :help for commands.");
        chat.print_quick_prompts();
    }
    chat.prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            completion = chat.session.next_completion() => Event::Completion(completion),
        };

        match event {
            Event::Line(Some(line)) => {
                if matches!(chat.handle_line(&line), Flow::Quit) {
                    break;
                }
                chat.prompt();
            }
            Event::Line(None) => {
                chat.drain().await;
                break;
            }
            Event::Completion(Some(completion)) => {
                chat.complete(completion);
                chat.prompt();
            }
            Event::Completion(None) => break,
        }
    }

    Ok(())
}

impl Chat<'_> {
    fn handle_line(&mut self, line: &str) -> Flow {
        match parse_chat_line(line) {
            ChatCommand::Submit(text) => {
                self.session.set_input(&text);
                let outcome = self.session.on_key(Key::Enter);
                self.show_outcome(outcome);
            }
            ChatCommand::Preview(text) => {
                self.session.set_input(&text);
                self.show_suggestions();
            }
            ChatCommand::Key(key) => {
                let outcome = self.session.on_key(key);
                self.show_outcome(outcome);
            }
            ChatCommand::Pick(n) => {
                let outcome = self.session.select_suggestion(n - 1);
                self.show_outcome(InputOutcome::Suggestion(outcome));
            }
            ChatCommand::View { views, id } => {
                self.views = views;
                self.show_view(id);
            }
            ChatCommand::History => {
                println!("{}", render_history(self.session.generations(), table_options()));
            }
            ChatCommand::Quick(n) => match self.session.submit_quick(n - 1) {
                Some(id) => self.show_generation(id),
                None if n > QUICK_PROMPTS.len() => println!("There is no starter prompt {n}."),
                None => self.explain_rejection(),
            },
            ChatCommand::Help => println!("{HELP}"),
            ChatCommand::Quit => return Flow::Quit,
            ChatCommand::Invalid(message) => println!("{message}"),
        }
        Flow::Continue
    }

    fn show_outcome(&self, outcome: InputOutcome) {
        match outcome {
            InputOutcome::Submitted(id) => self.show_generation(id),
            InputOutcome::Rejected => self.explain_rejection(),
            InputOutcome::NewLine => println!("(line break added)"),
            InputOutcome::Suggestion(SuggestionKeyOutcome::Moved(_)) => self.show_suggestions(),
            InputOutcome::Suggestion(SuggestionKeyOutcome::Committed(phrase)) => {
                tracing::debug!(%phrase, "suggestion accepted");
            }
            InputOutcome::Suggestion(SuggestionKeyOutcome::Closed) => println!("(suggestions closed)"),
            InputOutcome::Suggestion(SuggestionKeyOutcome::Ignored) => {
                println!("(no suggestion at that position)");
            }
            InputOutcome::Ignored => {}
        }
    }

    fn explain_rejection(&self) {
        if self.session.is_generating() && self.session.options().policy == SubmitPolicy::SingleFlight {
            println!("Still generating the previous response; wait for it or restart with --concurrent.");
        }
    }

    fn show_suggestions(&self) {
        let state = self.session.suggestions().state();
        if state.visible {
            println!("{}", render_suggestions(state));
        } else if state.open {
            println!("(1 hidden match; :down then :enter accepts it)");
        } else {
            println!("(no suggestions)");
        }
    }

    fn show_generation(&self, id: GenerationId) {
        let Some(generation) = self.session.generation(id) else {
            println!("No generation {id}.");
            return;
        };
        match format_generation(generation, &self.views, self.flags) {
            Ok(text) => println!("{text}"),
            Err(error) => tracing::warn!(%id, %error, "failed to render generation"),
        }
    }

    fn show_view(&self, id: Option<GenerationId>) {
        let target = id.or_else(|| {
            self.session
                .generations()
                .iter()
                .rev()
                .find(|generation| generation.status() == GenerationStatus::Success)
                .map(|generation| generation.id)
        });
        match target {
            Some(id) => self.show_generation(id),
            None => println!("No response to show yet."),
        }
    }

    fn complete(&mut self, completion: Completion) {
        match self.session.apply_completion(completion) {
            Ok(id) => {
                println!();
                self.show_generation(id);
            }
            Err(error) => println!("medi error: {error}"),
        }
    }

    /// Wait for outstanding queries after stdin closes.
    async fn drain(&mut self) {
        while self.session.is_generating() {
            let Some(completion) = self.session.next_completion().await else {
                break;
            };
            self.complete(completion);
        }
    }

    fn print_quick_prompts(&self) {
        if !self.session.generations().is_empty() {
            return;
        }
        println!("Try one of these with :quick N");
        for (index, (title, prompt)) in QUICK_PROMPTS.iter().enumerate() {
            println!("  {}. {title}: {prompt}", index + 1);
        }
    }

    fn prompt(&self) {
        if self.focus.take() {
            print!("> {}", self.session.input());
        } else {
            print!("> ");
        }
        let _ = std::io::stdout().flush();
    }
}
