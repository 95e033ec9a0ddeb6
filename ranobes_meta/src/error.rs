#[derive(thiserror::Error, Debug)]
pub enum MetaError {
    #[error("Missing required authentication environment variables")]
    Unauthenticated,

    #[error("Failed to search ranobes.com: {0}")]
    SearchUnavailable(String),

    #[error("Malformed book page: {0}")]
    MalformedPage(&'static str),

    #[error("Failed to fetch book page {url}: {reason}")]
    DetailUnavailable { url: String, reason: String },
}

