//! # medi-session
//!
//! The conversation state machine for MediFire.
//!
//! - [`GenerationStore`]: append-only, id-keyed sequence of [`Generation`](medi_core::Generation)s
//! - [`SessionController`]: the single owner of the store, the prompt input and the
//!   suggestion state; dispatches prompts to a [`QueryClient`] and applies completions
//!   as they arrive, in any order
//!
//! Query calls run on spawned tokio tasks and report back over an unbounded channel
//! tagged with the generation id. Only the controller mutates the store, so no lock
//! guards it.

mod collaborators;
mod controller;
mod store;

pub use collaborators::{FocusSink, QueryClient};
pub use controller::{Completion, InputOutcome, SessionController, SessionOptions};
pub use store::GenerationStore;
