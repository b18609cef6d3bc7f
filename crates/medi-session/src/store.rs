use chrono::Utc;
use medi_core::{CoreError, Generation, GenerationId, IdAllocator, ResponseBody};

/// Ordered, append-only collection of generations.
///
/// Entries are never removed or reordered. Resolution looks entries up by id, so
/// completions may be applied in any order.
#[derive(Debug, Default)]
pub struct GenerationStore {
    generations: Vec<Generation>,
    ids: IdAllocator,
}

impl GenerationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new pending generation and return its id.
    pub fn push(&mut self, prompt: impl Into<String>) -> GenerationId {
        let id = self.ids.next_id();
        self.generations.push(Generation::pending(id, prompt, Utc::now()));
        tracing::debug!(%id, "generation pending");
        id
    }

    #[must_use]
    pub fn get(&self, id: GenerationId) -> Option<&Generation> {
        self.position(id).map(|index| &self.generations[index])
    }

    /// Transition `Pending → Success`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an unknown id and
    /// [`CoreError::InvalidTransition`] if the generation is already terminal.
    pub fn resolve_success(&mut self, id: GenerationId, body: ResponseBody) -> Result<(), CoreError> {
        self.entry_mut(id)?.resolve_success(body)?;
        tracing::debug!(%id, "generation succeeded");
        Ok(())
    }

    /// Transition `Pending → Error`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an unknown id and
    /// [`CoreError::InvalidTransition`] if the generation is already terminal.
    pub fn resolve_error(
        &mut self,
        id: GenerationId,
        message: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.entry_mut(id)?.resolve_error(message)?;
        tracing::debug!(%id, "generation failed");
        Ok(())
    }

    /// All generations in submission order.
    #[must_use]
    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    /// An owned copy of the full sequence, for readers outside the controller.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Generation> {
        self.generations.clone()
    }

    /// Number of generations still pending.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.generations.iter().filter(|g| g.is_pending()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    // Ids are allocated in increasing order and entries are only appended,
    // so the sequence stays sorted by id.
    fn position(&self, id: GenerationId) -> Option<usize> {
        self.generations.binary_search_by_key(&id, |g| g.id).ok()
    }

    fn entry_mut(&mut self, id: GenerationId) -> Result<&mut Generation, CoreError> {
        let index = self.position(id).ok_or_else(|| CoreError::NotFound { id: id.to_string() })?;
        Ok(&mut self.generations[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medi_core::GenerationStatus;
    use pretty_assertions::assert_eq;

    fn body() -> ResponseBody {
        ResponseBody::from_response(Some(r#"{"patients": []}"#))
    }

    #[test]
    fn push_appends_pending_in_order() {
        let mut store = GenerationStore::new();
        let first = store.push("one");
        let second = store.push("two");
        assert!(first < second);
        let prompts: Vec<&str> = store.generations().iter().map(|g| g.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["one", "two"]);
        assert_eq!(store.in_flight(), 2);
    }

    #[test]
    fn resolves_by_id_in_reverse_order() {
        let mut store = GenerationStore::new();
        let ids: Vec<GenerationId> = (0..4).map(|i| store.push(format!("prompt {i}"))).collect();

        for (i, id) in ids.iter().enumerate().rev() {
            if i % 2 == 0 {
                store.resolve_success(*id, body()).unwrap();
            } else {
                store.resolve_error(*id, format!("failed {i}")).unwrap();
            }
        }

        for (i, generation) in store.generations().iter().enumerate() {
            assert_eq!(generation.id, ids[i]);
            assert_eq!(generation.prompt, format!("prompt {i}"));
            if i % 2 == 0 {
                assert_eq!(generation.status(), GenerationStatus::Success);
            } else {
                assert_eq!(generation.error_message(), Some(format!("failed {i}").as_str()));
            }
        }
        assert_eq!(store.in_flight(), 0);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = GenerationStore::new();
        store.push("one");
        let err = store.resolve_error(GenerationId::new(99), "x").unwrap_err();
        assert_eq!(err, CoreError::NotFound { id: "gen-99".into() });
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn double_resolution_is_rejected() {
        let mut store = GenerationStore::new();
        let id = store.push("one");
        store.resolve_success(id, body()).unwrap();
        let err = store.resolve_error(id, "late").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(store.get(id).map(Generation::status), Some(GenerationStatus::Success));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut store = GenerationStore::new();
        let id = store.push("one");
        let before = store.snapshot();
        store.resolve_error(id, "boom").unwrap();
        assert!(before[0].is_pending());
        assert!(!store.generations()[0].is_pending());
    }
}
