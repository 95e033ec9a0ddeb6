use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{
    credentials::Credentials,
    error::MetaError,
    model::BookMetadata,
    providers::SearchOutcome,
    traits::Provider,
};

/// Provider returning a fixed answer, counting how often it was asked.
pub struct FakeProvider {
    pub id_str: String,
    pub matches: Option<Vec<BookMetadata>>,
    calls: AtomicUsize,
}

impl FakeProvider {
    /// `None` makes every search fail as if the site were down.
    pub fn new(id: &str, matches: Option<Vec<BookMetadata>>) -> Self {
        Self {
            id_str: id.to_string(),
            matches,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn id(&self) -> &str {
        &self.id_str
    }

    async fn search(
        &self,
        _query: &str,
        _credentials: &Credentials,
    ) -> Result<SearchOutcome, MetaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.matches {
            Some(matches) => Ok(SearchOutcome {
                matches: matches.clone(),
                skipped: 0,
            }),
            None => Err(MetaError::SearchUnavailable("not found".to_string())),
        }
    }
}
