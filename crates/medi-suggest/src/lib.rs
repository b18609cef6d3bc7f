//! # medi-suggest
//!
//! Prompt autocomplete for MediFire.
//!
//! - [`corpus`]: the built-in phrase corpus and quick prompts
//! - [`SuggestionIndex`]: pure, stateless substring filter
//! - [`SuggestionController`]: live filtering plus circular keyboard navigation

pub mod corpus;

mod controller;
mod index;

pub use controller::{Key, SuggestionController, SuggestionKeyOutcome, SuggestionState};
pub use index::{FilterOptions, SuggestionIndex};
