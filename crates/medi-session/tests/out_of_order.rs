//! Completions arriving in a different order than submissions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use medi_core::{GenerationId, GenerationStatus, QueryError, QueryResult, ResponseBody, SubmitPolicy};
use medi_session::{QueryClient, SessionController, SessionOptions};
use pretty_assertions::assert_eq;
use tokio::sync::oneshot;

type Reply = Result<QueryResult, QueryError>;

/// Holds each query until the test sends its reply through the prompt's gate.
struct Gated {
    gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
}

impl Gated {
    fn new(prompts: &[&str]) -> (Arc<Self>, HashMap<String, oneshot::Sender<Reply>>) {
        let mut receivers = HashMap::new();
        let mut senders = HashMap::new();
        for prompt in prompts {
            let (tx, rx) = oneshot::channel();
            receivers.insert((*prompt).to_string(), rx);
            senders.insert((*prompt).to_string(), tx);
        }
        (
            Arc::new(Self {
                gates: Mutex::new(receivers),
            }),
            senders,
        )
    }
}

#[async_trait]
impl QueryClient for Gated {
    async fn perform_query(&self, prompt: &str) -> Reply {
        let gate = self.gates.lock().unwrap().remove(prompt).expect("no gate for prompt");
        gate.await.expect("gate dropped")
    }
}

fn payload_for(prompt: &str) -> String {
    serde_json::json!({
        "results": {
            "query": {"prompt": prompt},
            "patients": [{"prompt": prompt}]
        }
    })
    .to_string()
}

fn concurrent() -> SessionOptions {
    SessionOptions {
        policy: SubmitPolicy::Concurrent,
        ..SessionOptions::default()
    }
}

#[tokio::test]
async fn reverse_completion_updates_the_right_entries() {
    let prompts = ["first", "second", "third", "fourth"];
    let (client, mut gates) = Gated::new(&prompts);
    let mut session = SessionController::new(client, concurrent());

    let ids: Vec<GenerationId> = prompts
        .iter()
        .map(|prompt| session.submit_prompt(prompt).unwrap())
        .collect();
    assert_eq!(session.generations().len(), 4);
    assert!(session.generations().iter().all(|g| g.is_pending()));

    for (index, prompt) in prompts.iter().enumerate().rev() {
        let reply = if index == 1 {
            Err(QueryError::Status {
                status: 502,
                message: "Bad Gateway".into(),
            })
        } else {
            Ok(QueryResult::success(payload_for(prompt)))
        };
        gates.remove(*prompt).unwrap().send(reply).unwrap();

        let completion = session.next_completion().await.unwrap();
        assert_eq!(completion.id, ids[index]);
        session.apply_completion(completion).unwrap();
    }

    assert!(!session.is_generating());
    for (index, generation) in session.generations().iter().enumerate() {
        assert_eq!(generation.id, ids[index]);
        assert_eq!(generation.prompt, prompts[index]);
        if index == 1 {
            assert_eq!(generation.status(), GenerationStatus::Error);
            assert_eq!(generation.error_message(), Some("API Error: 502 Bad Gateway"));
        } else {
            assert_eq!(generation.status(), GenerationStatus::Success);
            let payload = generation.response().and_then(ResponseBody::payload).unwrap();
            assert_eq!(payload.patients()[0]["prompt"], prompts[index]);
        }
    }
}

#[tokio::test]
async fn later_submission_can_finish_first() {
    let (client, mut gates) = Gated::new(&["slow", "fast"]);
    let mut session = SessionController::new(client, concurrent());
    let slow = session.submit_prompt("slow").unwrap();
    let fast = session.submit_prompt("fast").unwrap();

    gates.remove("fast").unwrap().send(Ok(QueryResult::success("{}"))).unwrap();
    let completion = session.next_completion().await.unwrap();
    session.apply_completion(completion).unwrap();

    assert_eq!(session.generation(fast).unwrap().status(), GenerationStatus::Success);
    assert!(session.generation(slow).unwrap().is_pending());
    assert!(session.is_generating());

    gates.remove("slow").unwrap().send(Ok(QueryResult::failure("timeout"))).unwrap();
    session.run_until_idle().await.unwrap();
    assert_eq!(session.generation(slow).unwrap().error_message(), Some("timeout"));
}

#[tokio::test]
async fn sequential_submissions_keep_submission_order() {
    let prompts = ["a1", "b2", "c3", "d4", "e5"];
    let (client, mut gates) = Gated::new(&prompts);
    let mut session = SessionController::new(client, SessionOptions::default());

    for prompt in prompts {
        session.set_input(prompt);
        let id = session.submit().unwrap();
        // Single flight: nothing else is accepted until this one resolves.
        session.set_input("blocked");
        assert_eq!(session.submit(), None);
        assert_eq!(session.input(), "blocked");

        gates.remove(prompt).unwrap().send(Ok(QueryResult::success("{}"))).unwrap();
        session.run_until_idle().await.unwrap();
        assert_eq!(session.generation(id).unwrap().status(), GenerationStatus::Success);
    }

    let recorded: Vec<&str> = session.generations().iter().map(|g| g.prompt.as_str()).collect();
    assert_eq!(recorded, prompts);
}

#[tokio::test]
async fn undecodable_response_is_still_success() {
    let (client, mut gates) = Gated::new(&["q"]);
    let mut session = SessionController::new(client, SessionOptions::default());
    let id = session.submit_prompt("q").unwrap();
    gates.remove("q").unwrap().send(Ok(QueryResult::success("not json"))).unwrap();
    session.run_until_idle().await.unwrap();

    let generation = session.generation(id).unwrap();
    assert_eq!(generation.status(), GenerationStatus::Success);
    assert!(matches!(
        generation.response(),
        Some(ResponseBody::Malformed { .. })
    ));
}
