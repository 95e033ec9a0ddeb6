use async_trait::async_trait;

use crate::{credentials::Credentials, error::MetaError, providers::SearchOutcome};

/// A site that can be searched for book metadata.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short stable id for the provider, e.g. "ranobes"
    fn id(&self) -> &str;

    /// Search the site and return metadata for every result that could be
    /// fetched, in the order the site listed them.
    async fn search(
        &self,
        query: &str,
        credentials: &Credentials,
    ) -> Result<SearchOutcome, MetaError>;
}
