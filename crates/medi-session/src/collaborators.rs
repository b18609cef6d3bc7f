//! Seams to the presentation layer and the query backend.

use async_trait::async_trait;
use medi_core::{QueryError, QueryResult};

/// Performs one natural-language query against the backend.
///
/// A returned `Err`, or an `Ok` whose `error` field is non-empty, resolves the
/// generation to `Error`. Anything else resolves it to `Success`.
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn perform_query(&self, prompt: &str) -> Result<QueryResult, QueryError>;
}

/// Receives the "restore input focus" signal after a suggestion is committed.
pub trait FocusSink: Send + Sync {
    fn restore_focus(&self);
}
