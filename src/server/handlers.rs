//! Request handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{PointYield, YieldSeries};
use crate::error::CurveError;
use crate::query::{PointRequest, QueryEngine, RangeRequest};

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// A query failure rendered as an HTTP response.
pub struct ApiError(CurveError);

impl From<CurveError> for ApiError {
    fn from(err: CurveError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CurveError::Validation { .. } => StatusCode::BAD_REQUEST,
            CurveError::NoData { .. } | CurveError::InsufficientData { .. } => StatusCode::NOT_FOUND,
            CurveError::Interpolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.0.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Query parameters for `/latest`.
#[derive(Debug, Default, Deserialize)]
pub struct LatestParams {
    pub country: Option<String>,
    pub maturity: Option<String>,
    /// Optional ISO date; defaults to the latest stored date.
    pub date: Option<String>,
}

/// Yield at one maturity on one date (the latest, unless `date` is given).
pub async fn latest(
    State(engine): State<Arc<QueryEngine>>,
    Query(params): Query<LatestParams>,
) -> Result<Json<PointYield>, ApiError> {
    let request = PointRequest::parse(
        params.country.as_deref(),
        params.maturity.as_deref(),
        params.date.as_deref(),
    )?;
    Ok(Json(engine.point_query(&request)?))
}

/// Query parameters for `/timeseries`.
#[derive(Debug, Default, Deserialize)]
pub struct TimeseriesParams {
    pub country: Option<String>,
    pub maturity: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Yield at one maturity on every stored date in a range.
pub async fn timeseries(
    State(engine): State<Arc<QueryEngine>>,
    Query(params): Query<TimeseriesParams>,
) -> Response {
    let request = match RangeRequest::parse(
        params.country.as_deref(),
        params.maturity.as_deref(),
        params.start.as_deref(),
        params.end.as_deref(),
    ) {
        Ok(r) => r,
        Err(e) => return ApiError(e).into_response(),
    };

    // One curve per date: keep the work off the async workers.
    let series = tokio::task::spawn_blocking(move || engine.range_query(&request)).await;
    match series {
        Ok(series) => Json::<YieldSeries>(series).into_response(),
        Err(e) => {
            error!(error = %e, "timeseries task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal error while building the time series.".to_string(),
                }),
            )
                .into_response()
        }
    }
}
