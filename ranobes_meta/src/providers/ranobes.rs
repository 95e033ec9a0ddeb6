use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    credentials::Credentials,
    error::MetaError,
    extract::extract,
    http::{HttpClient, ReqwestClient},
    model::BookMetadata,
    providers::{FailurePolicy, SearchOutcome},
    traits::Provider,
};

pub const DEFAULT_BASE_URL: &str = "https://ranobes.com";
const SEARCH_PATH: &str = "/index.php";

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

static RESULT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#dle-content article.block.story.shortstory.mod-poster").unwrap()
});
static RESULT_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h2.title a").unwrap());

pub struct Ranobes {
    client: Arc<dyn HttpClient>,
    base_url: Url,
    policy: FailurePolicy,
}

impl Ranobes {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = ReqwestClient::new(timeout).context("build http client")?;
        Self::with_client(base_url, Arc::new(client))
    }

    pub fn with_client(base_url: &str, client: Arc<dyn HttpClient>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).context("invalid ranobes base url")?;
        Ok(Self {
            client,
            base_url,
            policy: FailurePolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs the listing search, then fetches every result page one at a time.
    ///
    /// A failed listing request fails the whole search. Failed result pages
    /// are handled according to the [`FailurePolicy`].
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search(
        &self,
        query: &str,
        credentials: &Credentials,
    ) -> Result<SearchOutcome, MetaError> {
        let cookies = credentials.cookie_header();
        let listing = self.fetch_listing(query, &cookies).await?;
        let links = self.harvest_links(&listing);
        debug!(count = links.len(), "ranobes search results");

        let mut outcome = SearchOutcome::default();
        for link in links {
            match self.fetch_book(&link, &cookies).await {
                Ok(book) => outcome.matches.push(book),
                Err(err) => match self.policy {
                    FailurePolicy::BestEffort => {
                        warn!(url = %link, "skipping book: {err}");
                        outcome.skipped += 1;
                    }
                    FailurePolicy::FailFast => return Err(err),
                },
            }
        }
        debug!(
            matches = outcome.matches.len(),
            skipped = outcome.skipped,
            "ranobes search done"
        );
        Ok(outcome)
    }

    /// Links to the book pages on a listing page, in page order. Results
    /// without a title link are skipped.
    pub fn harvest_links(&self, html: &str) -> Vec<Url> {
        let doc = Html::parse_document(html);
        doc.select(&RESULT_SELECTOR)
            .filter_map(|article| article.select(&RESULT_LINK_SELECTOR).next())
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| match self.base_url.join(href.trim()) {
                Ok(url) => Some(url),
                Err(err) => {
                    debug!(href, "ignoring unparsable result link: {err}");
                    None
                }
            })
            .collect()
    }

    async fn fetch_listing(&self, query: &str, cookies: &str) -> Result<String, MetaError> {
        let url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|err| MetaError::SearchUnavailable(err.to_string()))?;
        let origin = self.base_url.origin().ascii_serialization();
        let referer = format!("{origin}/");
        let headers = [
            ("content-type", "application/x-www-form-urlencoded"),
            ("accept", ACCEPT),
            ("origin", origin.as_str()),
            ("referer", referer.as_str()),
            ("user-agent", USER_AGENT),
        ];
        let form = [("story", query), ("do", "search"), ("subaction", "search")];

        debug!(url = %url, "posting ranobes search");
        let response = self
            .client
            .post_form(url.as_str(), &form, &headers, cookies)
            .await
            .map_err(|err| MetaError::SearchUnavailable(format!("{err:#}")))?;
        if !response.is_success() {
            return Err(MetaError::SearchUnavailable(format!(
                "search returned status {}",
                response.status
            )));
        }
        Ok(response.body)
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn fetch_book(&self, url: &Url, cookies: &str) -> Result<BookMetadata, MetaError> {
        debug!("fetching ranobes book page");
        let unavailable = |reason: String| MetaError::DetailUnavailable {
            url: url.to_string(),
            reason,
        };
        let response = self
            .client
            .get(url.as_str(), cookies)
            .await
            .map_err(|err| unavailable(format!("{err:#}")))?;
        if !response.is_success() {
            return Err(unavailable(format!("status {}", response.status)));
        }

        let mut book = extract(&response.body)?;
        book.cover = book.cover.map(|cover| resolve_cover(url, cover));
        Ok(book)
    }
}

/// Cover tokens are often site relative; make them absolute against the page
/// they were found on.
fn resolve_cover(page: &Url, cover: String) -> String {
    match page.join(&cover) {
        Ok(url) => url.to_string(),
        Err(_) => cover,
    }
}

#[async_trait]
impl Provider for Ranobes {
    fn id(&self) -> &str {
        "ranobes"
    }

    async fn search(
        &self,
        query: &str,
        credentials: &Credentials,
    ) -> Result<SearchOutcome, MetaError> {
        Ranobes::search(self, query, credentials).await
    }
}
