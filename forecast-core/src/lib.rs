//! Core library for the short-term forecast service.
//!
//! This crate defines:
//! - Configuration handling
//! - The `ForecastFetcher` abstraction and its api.weather.gov implementation
//! - Shared domain models (coordinates, forecast periods, forecasts)
//!
//! It is used by `forecast-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, ServerConfig, UpstreamConfig};
pub use error::{Endpoint, UpstreamError};
pub use model::{Coordinates, Forecast, ForecastPeriod, PointResource, TemperatureFeel};
pub use provider::{ForecastFetcher, fetcher_from_config, nws::NwsFetcher};
