//! The `/forecast` HTTP endpoint.

use axum::{
    Json, Router,
    extract::{
        Form, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use forecast_core::{Coordinates, ForecastFetcher};
use std::{num::ParseFloatError, sync::Arc};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

const FIELD_LATITUDE: &str = "latitude";
const FIELD_LONGITUDE: &str = "longitude";

/// Shared state for handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<dyn ForecastFetcher>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn ForecastFetcher>) -> Self {
        Self { fetcher }
    }
}

/// Validation failure for an inbound request field.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field {0} not found")]
    Missing(&'static str),

    #[error(transparent)]
    Invalid(#[from] ParseFloatError),
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Plain text bodies end with a newline.
        match self {
            ApiError::BadRequest(msg) => {
                debug!(%msg, "rejecting forecast request");
                (StatusCode::BAD_REQUEST, format!("{msg}\n")).into_response()
            }
            ApiError::Internal(err) => {
                error!(error = %format!("{err:#}"), "forecast lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}\n")).into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/forecast", get(handle_forecast).post(handle_forecast))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /forecast?latitude=..&longitude=..`.
///
/// POST is accepted too: urlencoded body fields come first, then the query
/// string. A body with any other content type is ignored.
async fn handle_forecast(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let mut fields = post_form_fields(&method, form)?;
    fields.extend(query);

    let latitude = float_field(FIELD_LATITUDE, &fields)?;
    let longitude = float_field(FIELD_LONGITUDE, &fields)?;

    let forecast = state
        .fetcher
        .forecast(Coordinates::new(latitude, longitude))
        .await
        .map_err(ApiError::Internal)?;

    Ok((StatusCode::OK, Json(forecast)).into_response())
}

/// Body fields of a POST. For GET, `Form` reads the query string, which is
/// already covered by `Query`.
fn post_form_fields(
    method: &Method,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Vec<(String, String)>, ApiError> {
    if *method != Method::POST {
        return Ok(Vec::new());
    }

    match form {
        Ok(Form(fields)) => Ok(fields),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(Vec::new()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

/// First value of `name`, parsed as `f64`.
fn float_field(name: &'static str, fields: &[(String, String)]) -> Result<f64, FieldError> {
    let (_, value) = fields
        .iter()
        .find(|(key, _)| key == name)
        .ok_or(FieldError::Missing(name))?;

    Ok(value.parse()?)
}
