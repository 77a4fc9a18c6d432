use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cinematch_core::{Catalog, MovieRecord, RecommendError, Recommender, RecommenderConfig, Weights};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct RecommendParams {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_weight")]
    pub cast: i64,
    #[serde(default = "default_weight")]
    pub genre: i64,
    #[serde(default = "default_weight")]
    pub director: i64,
    pub k: Option<usize>,
}
fn default_weight() -> i64 { 1 }

#[derive(Serialize)]
pub struct RecommendResponse {
    pub selected: String,
    pub selected_index: usize,
    pub weights: Weights,
    pub took_s: f64,
    pub results: Vec<RecommendHit>,
}

#[derive(Serialize)]
pub struct RecommendHit {
    pub rank: usize,
    pub index: usize,
    pub title: String,
    pub score: f64,
}

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

/// Failure of a request handler; rendered as a status code and an `{"error": ...}` body.
pub enum ApiError {
    Recommend(RecommendError),
    Internal(String),
}

impl From<RecommendError> for ApiError {
    fn from(e: RecommendError) -> Self { ApiError::Recommend(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Recommend(err) => {
                let status = match &err {
                    RecommendError::TitleNotFound(_) | RecommendError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
                    RecommendError::EmptyTitle | RecommendError::InvalidWeight { .. } => StatusCode::BAD_REQUEST,
                    RecommendError::Vectorization(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.user_message())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %message, "request failed");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Load the catalog and build the router around it.
pub fn build_app(catalog_path: &str, config: RecommenderConfig) -> Result<Router> {
    let catalog = Catalog::load(catalog_path)?;
    let recommender = Recommender::new(Arc::new(catalog), config)?;
    Ok(build_router(Arc::new(recommender)))
}

pub fn build_router(recommender: Arc<Recommender>) -> Router {
    let app_state = AppState { recommender };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", get(recommend_handler))
        .route("/movie/:index", get(movie_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let start = std::time::Instant::now();
    let weights = Weights::new(params.cast, params.genre, params.director)?;
    let k = params
        .k
        .unwrap_or(state.recommender.config().top_n)
        .clamp(1, MAX_K);

    // ranking is CPU-bound over the whole catalog
    let recommender = state.recommender.clone();
    let title = params.title;
    let recs = tokio::task::spawn_blocking(move || recommender.run_query_top(&title, weights, k))
        .await
        .map_err(|e| ApiError::Internal(format!("ranking task failed: {e}")))??;

    let results = recs
        .results
        .into_iter()
        .map(|r| RecommendHit { rank: r.rank, index: r.index, title: r.title, score: r.score })
        .collect();
    Ok(Json(RecommendResponse {
        selected: recs.selected,
        selected_index: recs.selected_index,
        weights: recs.weights,
        took_s: start.elapsed().as_secs_f64(),
        results,
    }))
}

pub async fn movie_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<MovieRecord>, ApiError> {
    let catalog = state.recommender.catalog();
    let record = catalog
        .get(index)
        .ok_or(RecommendError::IndexOutOfRange { index, len: catalog.len() })?;
    Ok(Json(record.clone()))
}
