//! Test fixtures shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use data_loader::{Catalog, MovieRecord};
use llm_client::{GenerationError, TextGenerator};

/// Deterministic text generator.
///
/// Replies are consumed in order; the last one repeats forever.
pub(crate) struct StubGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<(String, String)>>,
}

impl StubGenerator {
    pub(crate) fn sequence(replies: Vec<Result<String, GenerationError>>) -> Self {
        assert!(!replies.is_empty());
        Self {
            replies: Mutex::new(replies.into()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub(crate) fn replying(text: &str) -> Self {
        Self::sequence(vec![Ok(text.to_string())])
    }

    pub(crate) fn failing(error: GenerationError) -> Self {
        Self::sequence(vec![Err(error)])
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_prompt(&self) -> Option<(String, String)> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &str {
        "StubGenerator"
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some((system_prompt.to_string(), user_text.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        }
    }
}

/// Small catalog: 3 horror films, 12 comedies
pub(crate) fn test_catalog() -> Arc<Catalog> {
    let mut records = vec![
        MovieRecord::new("A", "horror"),
        MovieRecord::new("B", "horror"),
        MovieRecord::new("C", "horror"),
    ];
    for i in 0..12 {
        records.push(MovieRecord::new(format!("Comedy {}", i), "Comedy"));
    }
    Arc::new(Catalog::from_records(records).unwrap())
}
