//! Incremental suggestion state driven by live input and navigation keys.
//!
//! The state is recomputed synchronously on every input change, so a stale
//! filter result can never overwrite a newer one.

use serde::{Deserialize, Serialize};

use crate::index::{FilterOptions, SuggestionIndex};

/// Keys the prompt input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Enter,
    ShiftEnter,
    Escape,
}

/// What the suggestion dropdown did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionKeyOutcome {
    /// The dropdown did not handle the key; the input should.
    Ignored,
    /// The selection moved to this index.
    Moved(usize),
    /// A phrase was committed; it replaces the input and the dropdown is closed.
    Committed(String),
    /// The dropdown was closed without touching the input.
    Closed,
}

/// Read-only view of the suggestion state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionState {
    pub query: String,
    pub matches: Vec<String>,
    pub selected: Option<usize>,
    /// Navigation is active; cleared by Escape or a commit.
    pub open: bool,
    /// The dropdown is drawn. Requires `open` and enough matches to disambiguate.
    pub visible: bool,
}

/// Filter plus keyboard navigation over a [`SuggestionIndex`].
#[derive(Debug, Clone)]
pub struct SuggestionController {
    index: SuggestionIndex,
    options: FilterOptions,
    state: SuggestionState,
}

impl SuggestionController {
    #[must_use]
    pub fn new(index: SuggestionIndex, options: FilterOptions) -> Self {
        Self {
            index,
            options,
            state: SuggestionState::default(),
        }
    }

    #[must_use]
    pub const fn index(&self) -> &SuggestionIndex {
        &self.index
    }

    #[must_use]
    pub const fn state(&self) -> &SuggestionState {
        &self.state
    }

    #[must_use]
    pub fn matches(&self) -> &[String] {
        &self.state.matches
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.state.selected
    }

    /// Whether the dropdown is shown. A single match is never shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Whether navigation keys are handled (any match, even a hidden single one).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.open
    }

    /// Re-filter for new input. Clears the selection.
    pub fn update(&mut self, query: &str) {
        let matches: Vec<String> = self
            .index
            .filter(query, self.options)
            .into_iter()
            .map(str::to_string)
            .collect();

        self.state.open = !matches.is_empty();
        self.state.visible = matches.len() >= self.options.min_display_matches.max(1);
        self.state.query = query.to_string();
        self.state.matches = matches;
        self.state.selected = None;

        tracing::debug!(
            query,
            matches = self.state.matches.len(),
            visible = self.state.visible,
            "suggestions refreshed"
        );
    }

    /// Handle a navigation key. Keys are only consumed while matches are open.
    pub fn on_key(&mut self, key: Key) -> SuggestionKeyOutcome {
        if !self.state.open || self.state.matches.is_empty() {
            return SuggestionKeyOutcome::Ignored;
        }

        let len = self.state.matches.len();
        match key {
            Key::Down => {
                let next = match self.state.selected {
                    Some(current) if current + 1 < len => current + 1,
                    _ => 0,
                };
                self.state.selected = Some(next);
                SuggestionKeyOutcome::Moved(next)
            }
            Key::Up => {
                let next = match self.state.selected {
                    Some(current) if current > 0 => current - 1,
                    _ => len - 1,
                };
                self.state.selected = Some(next);
                SuggestionKeyOutcome::Moved(next)
            }
            Key::Enter => match self.state.selected {
                Some(selected) => self.commit(selected),
                None => SuggestionKeyOutcome::Ignored,
            },
            Key::Escape => {
                self.close();
                SuggestionKeyOutcome::Closed
            }
            Key::ShiftEnter => SuggestionKeyOutcome::Ignored,
        }
    }

    /// Commit the match at `index` directly (a click on a dropdown row).
    pub fn commit(&mut self, index: usize) -> SuggestionKeyOutcome {
        let Some(phrase) = self.state.matches.get(index).cloned() else {
            return SuggestionKeyOutcome::Ignored;
        };
        self.close();
        self.state.matches.clear();
        self.state.query.clone_from(&phrase);
        SuggestionKeyOutcome::Committed(phrase)
    }

    /// Hide the dropdown and drop the selection until the next input change.
    pub const fn close(&mut self) {
        self.state.open = false;
        self.state.visible = false;
        self.state.selected = None;
    }
}
