pub mod fake;
pub mod ranobes;

pub use fake::FakeProvider;
pub use ranobes::Ranobes;

use serde::Deserialize;

use crate::model::BookMetadata;

/// What to do when a single result page cannot be fetched or parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Drop the result and keep going.
    #[default]
    BestEffort,
    /// Abort the whole search with the item's error.
    FailFast,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub matches: Vec<BookMetadata>,
    /// Results dropped under [`FailurePolicy::BestEffort`].
    pub skipped: usize,
}
