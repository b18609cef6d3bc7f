//! Session orchestration: prompt input, submit gating, query dispatch, resolution.

use std::sync::Arc;

use medi_core::{
    CoreError, Generation, GenerationId, QueryError, QueryResult, ResponseBody, SubmitPolicy,
};
use medi_suggest::corpus::QUICK_PROMPTS;
use medi_suggest::{FilterOptions, Key, SuggestionController, SuggestionIndex, SuggestionKeyOutcome};
use tokio::sync::mpsc;

use crate::collaborators::{FocusSink, QueryClient};
use crate::store::GenerationStore;

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub policy: SubmitPolicy,
    /// Input is truncated to this many characters.
    pub max_prompt_chars: usize,
    pub filter: FilterOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            policy: SubmitPolicy::SingleFlight,
            max_prompt_chars: 1000,
            filter: FilterOptions::default(),
        }
    }
}

/// Outcome of one query call, tagged with the generation it belongs to.
#[derive(Debug)]
pub struct Completion {
    pub id: GenerationId,
    pub outcome: Result<QueryResult, QueryError>,
}

/// What a key press did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Handled by the suggestion dropdown.
    Suggestion(SuggestionKeyOutcome),
    /// Enter submitted the input.
    Submitted(GenerationId),
    /// Enter was pressed but the submission was rejected (blank input or in flight).
    Rejected,
    /// Shift+Enter inserted a line break.
    NewLine,
    Ignored,
}

/// Single owner of the generation store, the prompt input and the suggestion state.
pub struct SessionController {
    client: Arc<dyn QueryClient>,
    focus: Option<Arc<dyn FocusSink>>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    store: GenerationStore,
    input: String,
    suggestions: SuggestionController,
    options: SessionOptions,
}

impl SessionController {
    #[must_use]
    pub fn new(client: Arc<dyn QueryClient>, options: SessionOptions) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            client,
            focus: None,
            completions_tx,
            completions_rx,
            store: GenerationStore::new(),
            input: String::new(),
            suggestions: SuggestionController::new(SuggestionIndex::builtin(), options.filter),
            options,
        }
    }

    /// Attach the presentation layer's focus handler.
    #[must_use]
    pub fn with_focus_sink(mut self, focus: Arc<dyn FocusSink>) -> Self {
        self.focus = Some(focus);
        self
    }

    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub const fn suggestions(&self) -> &SuggestionController {
        &self.suggestions
    }

    #[must_use]
    pub fn generations(&self) -> &[Generation] {
        self.store.generations()
    }

    #[must_use]
    pub fn generation(&self, id: GenerationId) -> Option<&Generation> {
        self.store.get(id)
    }

    /// Owned copy of the conversation, for rendering outside the controller.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Generation> {
        self.store.snapshot()
    }

    /// Whether any generation is still pending.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.store.in_flight() > 0
    }

    /// Replace the input text and refresh suggestions.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.chars().take(self.options.max_prompt_chars).collect();
        self.suggestions.update(&self.input);
    }

    /// Handle a key press on the prompt input.
    ///
    /// Open suggestions see the key first. Enter that is not a suggestion commit
    /// submits; Shift+Enter inserts a newline.
    pub fn on_key(&mut self, key: Key) -> InputOutcome {
        match self.suggestions.on_key(key) {
            SuggestionKeyOutcome::Ignored => {}
            SuggestionKeyOutcome::Committed(phrase) => {
                self.commit_suggestion(&phrase);
                return InputOutcome::Suggestion(SuggestionKeyOutcome::Committed(phrase));
            }
            other => return InputOutcome::Suggestion(other),
        }

        match key {
            Key::Enter => self.submit().map_or(InputOutcome::Rejected, InputOutcome::Submitted),
            Key::ShiftEnter => {
                if self.input.chars().count() < self.options.max_prompt_chars {
                    let text = format!("{}\n", self.input);
                    self.set_input(&text);
                }
                InputOutcome::NewLine
            }
            Key::Up | Key::Down | Key::Escape => InputOutcome::Ignored,
        }
    }

    /// Commit the suggestion at `index` (a click on a dropdown row).
    pub fn select_suggestion(&mut self, index: usize) -> SuggestionKeyOutcome {
        let outcome = self.suggestions.commit(index);
        if let SuggestionKeyOutcome::Committed(phrase) = &outcome {
            self.commit_suggestion(phrase);
        }
        outcome
    }

    fn commit_suggestion(&mut self, phrase: &str) {
        phrase.clone_into(&mut self.input);
        if let Some(focus) = &self.focus {
            focus.restore_focus();
        }
    }

    /// Submit the current input. Clears the input when accepted.
    ///
    /// Returns `None` when the trimmed input is empty or, under the single-flight
    /// policy, when a generation is still pending.
    pub fn submit(&mut self) -> Option<GenerationId> {
        let prompt = self.input.trim().to_string();
        let id = self.dispatch(prompt)?;
        self.input.clear();
        self.suggestions.update("");
        Some(id)
    }

    /// Submit explicit text, leaving the input untouched.
    pub fn submit_prompt(&mut self, text: &str) -> Option<GenerationId> {
        let prompt: String = text.trim().chars().take(self.options.max_prompt_chars).collect();
        self.dispatch(prompt)
    }

    /// Submit one of the starter prompts by position.
    pub fn submit_quick(&mut self, index: usize) -> Option<GenerationId> {
        let Some((_, prompt)) = QUICK_PROMPTS.get(index) else {
            tracing::debug!(index, "no quick prompt at index");
            return None;
        };
        let id = self.dispatch((*prompt).to_string())?;
        self.input.clear();
        self.suggestions.update("");
        Some(id)
    }

    fn dispatch(&mut self, prompt: String) -> Option<GenerationId> {
        if prompt.is_empty() {
            tracing::debug!("ignoring blank prompt");
            return None;
        }
        if self.options.policy == SubmitPolicy::SingleFlight && self.is_generating() {
            tracing::debug!("ignoring prompt while a generation is in flight");
            return None;
        }

        let id = self.store.push(prompt.clone());
        let client = Arc::clone(&self.client);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            // A panicking client still resolves its generation.
            let query = tokio::spawn(async move { client.perform_query(&prompt).await });
            let outcome = match query.await {
                Ok(outcome) => outcome,
                Err(error) => {
                    tracing::error!(%id, %error, "query task failed");
                    Err(QueryError::Transport(format!("query task failed: {error}")))
                }
            };
            if completions.send(Completion { id, outcome }).is_err() {
                tracing::debug!(%id, "session closed before query completed");
            }
        });
        Some(id)
    }

    /// Wait for the next query completion.
    ///
    /// Returns `None` only if the channel is closed, which cannot happen while the
    /// controller holds its own sender.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Resolve the generation a completion belongs to.
    ///
    /// A failed call or a non-empty `error` field resolves to `Error`; anything else
    /// resolves to `Success`, with an undecodable response kept as a malformed body.
    ///
    /// # Errors
    ///
    /// Returns the store's invariant violation if the generation is unknown or
    /// already terminal.
    pub fn apply_completion(&mut self, completion: Completion) -> Result<GenerationId, CoreError> {
        let Completion { id, outcome } = completion;
        let applied = match outcome {
            Ok(result) => match result.error_message() {
                Some(message) => self.store.resolve_error(id, message),
                None => self
                    .store
                    .resolve_success(id, ResponseBody::from_response(result.response.as_deref())),
            },
            Err(error) => {
                tracing::warn!(%id, %error, "query failed");
                self.store.resolve_error(id, error.to_string())
            }
        };

        if let Err(error) = &applied {
            tracing::error!(%id, %error, "completion violated generation invariants");
        }
        applied.map(|()| id)
    }

    /// Apply completions until no generation is pending.
    ///
    /// # Errors
    ///
    /// Stops at the first invariant violation.
    pub async fn run_until_idle(&mut self) -> Result<(), CoreError> {
        while self.is_generating() {
            let Some(completion) = self.next_completion().await else {
                break;
            };
            self.apply_completion(completion)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medi_core::GenerationStatus;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo;

    #[async_trait]
    impl QueryClient for Echo {
        async fn perform_query(&self, prompt: &str) -> Result<QueryResult, QueryError> {
            Ok(QueryResult::success(format!(r#"{{"query": {{"text": "{prompt}"}}}}"#)))
        }
    }

    #[derive(Default)]
    struct CountingFocus(AtomicUsize);

    impl FocusSink for CountingFocus {
        fn restore_focus(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn session() -> SessionController {
        SessionController::new(Arc::new(Echo), SessionOptions::default())
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let mut session = session();
        session.set_input("   \n ");
        assert_eq!(session.submit(), None);
        assert_eq!(session.on_key(Key::Enter), InputOutcome::Rejected);
        assert!(session.generations().is_empty());
    }

    #[tokio::test]
    async fn submit_clears_input_and_records_trimmed_prompt() {
        let mut session = session();
        session.set_input("  Show me patients over 60  ");
        let id = session.submit().unwrap();
        assert_eq!(session.input(), "");
        assert_eq!(session.generation(id).unwrap().prompt, "Show me patients over 60");
        assert!(session.is_generating());

        session.run_until_idle().await.unwrap();
        assert_eq!(session.generation(id).unwrap().status(), GenerationStatus::Success);
    }

    #[tokio::test]
    async fn single_flight_rejects_while_pending() {
        let mut session = session();
        let first = session.submit_prompt("first").unwrap();
        assert_eq!(session.submit_prompt("second"), None);
        session.run_until_idle().await.unwrap();
        let second = session.submit_prompt("second").unwrap();
        assert!(first < second);
        session.run_until_idle().await.unwrap();
        assert_eq!(session.generations().len(), 2);
    }

    #[tokio::test]
    async fn input_is_capped() {
        let options = SessionOptions {
            max_prompt_chars: 5,
            ..SessionOptions::default()
        };
        let mut session = SessionController::new(Arc::new(Echo), options);
        session.set_input("abcdefgh");
        assert_eq!(session.input(), "abcde");
        assert_eq!(session.on_key(Key::ShiftEnter), InputOutcome::NewLine);
        assert_eq!(session.input(), "abcde");
    }

    #[tokio::test]
    async fn shift_enter_inserts_newline() {
        let mut session = session();
        session.set_input("zz");
        assert_eq!(session.on_key(Key::ShiftEnter), InputOutcome::NewLine);
        assert_eq!(session.input(), "zz\n");
        assert!(session.generations().is_empty());
    }

    #[tokio::test]
    async fn committed_suggestion_replaces_input_and_restores_focus() {
        let focus = Arc::new(CountingFocus::default());
        let mut session = session().with_focus_sink(focus.clone());
        session.set_input("diabet");
        assert_eq!(
            session.on_key(Key::Down),
            InputOutcome::Suggestion(SuggestionKeyOutcome::Moved(0))
        );
        assert_eq!(
            session.on_key(Key::Enter),
            InputOutcome::Suggestion(SuggestionKeyOutcome::Committed(
                "Find patients with diabetes".into()
            ))
        );
        assert_eq!(session.input(), "Find patients with diabetes");
        assert_eq!(focus.0.load(Ordering::SeqCst), 1);
        assert!(session.generations().is_empty());

        // The dropdown is closed, so the next Enter submits.
        let outcome = session.on_key(Key::Enter);
        assert!(matches!(outcome, InputOutcome::Submitted(_)));
    }

    #[tokio::test]
    async fn click_selection_commits() {
        let mut session = session();
        session.set_input("all patients");
        assert_eq!(
            session.select_suggestion(2),
            SuggestionKeyOutcome::Committed("List all patients in the system".into())
        );
        assert_eq!(session.input(), "List all patients in the system");
    }

    #[tokio::test]
    async fn quick_prompt_submits_starter_text() {
        let mut session = session();
        let id = session.submit_quick(2).unwrap();
        assert_eq!(
            session.generation(id).unwrap().prompt,
            "Show me patients over 60 with hypertension"
        );
        assert_eq!(session.submit_quick(9), None);
    }

    struct Recording(Mutex<Vec<String>>);

    #[async_trait]
    impl QueryClient for Recording {
        async fn perform_query(&self, prompt: &str) -> Result<QueryResult, QueryError> {
            self.0.lock().unwrap().push(prompt.to_string());
            Ok(QueryResult::failure("backend said no"))
        }
    }

    #[tokio::test]
    async fn error_field_resolves_to_error() {
        let client = Arc::new(Recording(Mutex::new(Vec::new())));
        let mut session = SessionController::new(client.clone(), SessionOptions::default());
        let id = session.submit_prompt("Find all patients").unwrap();
        session.run_until_idle().await.unwrap();

        let generation = session.generation(id).unwrap();
        assert_eq!(generation.status(), GenerationStatus::Error);
        assert_eq!(generation.error_message(), Some("backend said no"));
        assert_eq!(*client.0.lock().unwrap(), vec!["Find all patients".to_string()]);
    }

    #[tokio::test]
    async fn quick_prompt_clears_stale_suggestions() {
        let mut session = session();
        session.set_input("all patients");
        assert!(session.suggestions().is_visible());

        session.submit_quick(0).unwrap();
        assert_eq!(session.input(), "");
        assert!(session.suggestions().matches().is_empty());
        assert!(!session.suggestions().is_open());
        assert_eq!(session.on_key(Key::Down), InputOutcome::Ignored);

        session.run_until_idle().await.unwrap();
        assert_eq!(session.on_key(Key::Enter), InputOutcome::Rejected);
        assert_eq!(session.input(), "");
    }

    #[tokio::test]
    async fn newline_refreshes_suggestion_query() {
        let mut session = session();
        session.set_input("all patients");
        assert_eq!(
            session.on_key(Key::Down),
            InputOutcome::Suggestion(SuggestionKeyOutcome::Moved(0))
        );
        assert_eq!(session.on_key(Key::ShiftEnter), InputOutcome::NewLine);

        let state = session.suggestions().state();
        assert_eq!(state.query, "all patients\n");
        assert_eq!(state.selected, None);
    }

    struct Panicking;

    #[async_trait]
    impl QueryClient for Panicking {
        async fn perform_query(&self, _prompt: &str) -> Result<QueryResult, QueryError> {
            panic!("client bug");
        }
    }

    #[tokio::test]
    async fn panicking_client_resolves_to_error() {
        let mut session = SessionController::new(Arc::new(Panicking), SessionOptions::default());
        let id = session.submit_prompt("Find all patients").unwrap();
        session.run_until_idle().await.unwrap();

        let generation = session.generation(id).unwrap();
        assert_eq!(generation.status(), GenerationStatus::Error);
        assert!(generation.error_message().unwrap().starts_with("query task failed"));
        assert!(!session.is_generating());
    }

    #[tokio::test]
    async fn duplicate_completion_is_an_invariant_violation() {
        let mut session = session();
        let id = session.submit_prompt("one").unwrap();
        session.run_until_idle().await.unwrap();

        let err = session
            .apply_completion(Completion {
                id,
                outcome: Ok(QueryResult::success("{}")),
            })
            .unwrap_err();
        assert!(err.is_invariant_violation());
    }
}
