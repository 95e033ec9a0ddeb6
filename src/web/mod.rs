pub mod api;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use ranobes_meta::{MetaError, Provider};
use serde::Serialize;
use tracing::{error, info};

use crate::{config::Config, web::api::search::search_api};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn Provider>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search_api))
        .with_state(state)
}

pub async fn start_webserver(state: AppState) -> Result<()> {
    let listener =
        tokio::net::TcpListener::bind((state.config.web_host.clone(), state.config.web_port))
            .await?;
    info!(
        "Listening on {}, searching with {}",
        listener.local_addr()?,
        state.provider.id()
    );
    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Meta(#[from] MetaError),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Meta(MetaError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            AppError::Meta(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("AppError: {self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
