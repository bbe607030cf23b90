use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::error::ImportError;
use crate::extractors::SelectionOrder;
use crate::fetchers::RequestFetcher;
use crate::model::{ParseRecipeRequest, ParseRecipeResponse};
use crate::pipelines;

/// Message returned to clients for every fetch failure; details go to the log.
pub const FETCH_FAILED: &str = "Failed to fetch recipe page";

#[derive(Clone)]
struct AppState {
    fetcher: Arc<RequestFetcher>,
    order: SelectionOrder,
}

/// Build the HTTP routes.
///
/// - `POST /api/parse-recipe` with `{"url": "..."}`
/// - `GET /health`
pub fn router(config: &AppConfig) -> Result<Router, ImportError> {
    let state = AppState {
        fetcher: Arc::new(RequestFetcher::new(&config.fetch)?),
        order: config.extractors.selection_order,
    };

    Ok(Router::new()
        .route("/api/parse-recipe", post(parse_recipe))
        .route("/health", get(health))
        .with_state(state))
}

/// Bind `config.server.bind` and serve until the process stops.
pub async fn serve(config: AppConfig) -> Result<(), ImportError> {
    let listener = TcpListener::bind(config.server.bind.as_str()).await?;
    serve_on(listener, config).await
}

/// Serve on an already bound listener.
pub async fn serve_on(listener: TcpListener, config: AppConfig) -> Result<(), ImportError> {
    let app = router(&config)?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn parse_recipe(
    State(state): State<AppState>,
    Json(request): Json<ParseRecipeRequest>,
) -> (StatusCode, Json<ParseRecipeResponse>) {
    info!("Parsing recipe from {}", request.url);

    match pipelines::url::process(&request.url, &state.fetcher, state.order).await {
        Ok(recipe) => (StatusCode::OK, Json(ParseRecipeResponse::Recipe(recipe))),
        Err(e) => {
            error!("Failed to fetch {}: {}", request.url, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ParseRecipeResponse::Error(FETCH_FAILED.to_string())),
            )
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
