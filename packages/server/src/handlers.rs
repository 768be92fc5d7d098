//! HTTP handler functions for the wildfire API.
//!
//! Each data handler runs its store query on the blocking thread pool and
//! converts any failure into a `500` [`ApiError`] envelope itself.

use actix_web::{HttpResponse, web};
use wildfire_api_database::QueryError;
use wildfire_api_server_models::{
    ApiError, ApiHealth, ApiWildfires, ApiYears, WildfireQueryParams,
};

use crate::AppState;

/// Failure of a single data request.
#[derive(Debug, thiserror::Error)]
enum HandlerError {
    /// The store could not be read.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The blocking task panicked or was cancelled.
    #[error("Query task failed")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs a store query off the async executor.
async fn blocking<T, F>(query: F) -> Result<T, HandlerError>
where
    F: FnOnce() -> Result<T, QueryError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(query).await??)
}

fn error_response(context: &str, e: &HandlerError) -> HttpResponse {
    log::error!("Failed to {context}: {e}");
    HttpResponse::InternalServerError().json(ApiError::new(e.to_string()))
}

/// `GET /api/wildfires`
///
/// Returns a random sample of located fires. `limit` defaults to 3000.
///
/// The query is extracted as raw pairs so that no query string, including
/// one repeating `limit`, is rejected before reaching the handler.
pub async fn wildfires(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> HttpResponse {
    let limit = WildfireQueryParams::from_pairs(query.into_inner()).limit();
    let store = state.store.clone();

    match blocking(move || store.sample_fires(limit)).await {
        Ok(records) => HttpResponse::Ok().json(ApiWildfires::from(records)),
        Err(e) => error_response("sample wildfires", &e),
    }
}

/// `GET /api/years`
///
/// Returns every distinct discovery year, ascending.
pub async fn years(state: web::Data<AppState>) -> HttpResponse {
    let store = state.store.clone();

    match blocking(move || store.distinct_years()).await {
        Ok(years) => HttpResponse::Ok().json(ApiYears::from(years)),
        Err(e) => error_response("query years", &e),
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth::healthy(state.store.exists()))
}
