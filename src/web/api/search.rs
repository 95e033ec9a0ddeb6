use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use ranobes_meta::SearchResult;
use serde::Deserialize;
use tracing::info;

use crate::web::{AppError, AppState};

pub async fn search_api(
    State(state): State<AppState>,
    query: Result<Query<SearchApiQuery>, QueryRejection>,
) -> Result<Json<SearchResult>, AppError> {
    let Query(query) = query.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let Some(query) = query.query else {
        return Err(AppError::BadRequest(
            "Missing required query parameter: query".to_owned(),
        ));
    };
    let credentials = state.config.credentials()?;
    let outcome = state.provider.search(&query, &credentials).await?;
    info!(
        query = %query,
        matches = outcome.matches.len(),
        skipped = outcome.skipped,
        "search"
    );

    Ok::<_, AppError>(Json(SearchResult {
        matches: outcome.matches,
    }))
}

#[derive(Deserialize)]
pub struct SearchApiQuery {
    query: Option<String>,
}
