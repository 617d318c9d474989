use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Which upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Point,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Point => "point",
            Endpoint::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures reported by api.weather.gov itself, as opposed to transport or
/// decoding failures.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("unexpected status code from {endpoint} endpoint: {}, resp_body: {body}", .status.as_u16())]
    UnexpectedStatus {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    #[error("no forecast periods found")]
    NoForecastPeriods,
}

impl UpstreamError {
    /// Upstream HTTP status, if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::UnexpectedStatus { status, .. } => Some(*status),
            UpstreamError::NoForecastPeriods => None,
        }
    }
}
