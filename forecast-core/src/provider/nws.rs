//! api.weather.gov forecast fetcher.
//!
//! Getting the short-term forecast takes two calls: the `points` endpoint maps
//! coordinates to a forecast office grid and returns the hourly forecast URL
//! in `properties.forecastHourly`, which is then fetched for
//! `properties.periods`. Only the fields used here are modelled; anything else
//! in the payloads is ignored.
//!
//! e.g. `curl -G https://api.weather.gov/points/39.7456,-97.0892`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::UpstreamConfig,
    error::{Endpoint, UpstreamError},
    model::{Coordinates, Forecast, ForecastPeriod, PointResource},
};

use super::ForecastFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

#[derive(Debug, Clone)]
pub struct NwsFetcher {
    base_url: String,
    http: Client,
}

impl NwsFetcher {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    /// Build a fetcher with a client carrying the configured User-Agent and
    /// optional timeout. api.weather.gov rejects requests without a User-Agent.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client for api.weather.gov")?;

        Ok(Self::new(config.base_url.as_str(), http))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn point_url(&self, coordinates: Coordinates) -> String {
        format!("{}/points/{}", self.base_url, coordinates)
    }

    /// Look up the point resource for `coordinates`.
    pub async fn resolve(&self, coordinates: Coordinates) -> Result<PointResource> {
        let url = self.point_url(coordinates);
        let point: PointResponse = self.get_json(Endpoint::Point, &url).await?;

        Ok(PointResource {
            forecast_hourly_url: point.properties.forecast_hourly,
        })
    }

    /// Fetch `forecast_url` and reduce its first period to a [`Forecast`].
    pub async fn normalize(&self, forecast_url: &str) -> Result<Forecast> {
        let response: ForecastResponse = self.get_json(Endpoint::Forecast, forecast_url).await?;
        let forecast = Forecast::from_periods(&response.properties.periods)?;
        Ok(forecast)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint, url: &str) -> Result<T> {
        debug!(%endpoint, url, "requesting api.weather.gov");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("while fetching data from {endpoint} endpoint"))?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.with_context(|| {
                format!(
                    "while reading error response from {endpoint} endpoint, status_code: {}",
                    status.as_u16()
                )
            })?;
            warn!(%endpoint, status = status.as_u16(), "unexpected upstream status");
            return Err(UpstreamError::UnexpectedStatus { endpoint, status, body }.into());
        }

        let body = res
            .text()
            .await
            .with_context(|| format!("while reading response from {endpoint} endpoint"))?;

        serde_json::from_str(&body)
            .with_context(|| format!("while decoding response from {endpoint} endpoint"))
    }
}

#[async_trait]
impl ForecastFetcher for NwsFetcher {
    async fn forecast(&self, coordinates: Coordinates) -> Result<Forecast> {
        let point = self.resolve(coordinates).await?;
        self.normalize(&point.forecast_hourly_url).await
    }
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
struct PointProperties {
    #[serde(rename = "forecastHourly")]
    forecast_hourly: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<ForecastPeriod>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_url_interpolates_coordinates() {
        let fetcher = NwsFetcher::new(DEFAULT_BASE_URL, Client::new());
        let url = fetcher.point_url(Coordinates::new(39.7456, -97.0892));
        assert_eq!(url, "https://api.weather.gov/points/39.7456,-97.0892");
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let fetcher = NwsFetcher::new("http://localhost:1234/", Client::new());
        assert_eq!(fetcher.base_url(), "http://localhost:1234");
        assert_eq!(
            fetcher.point_url(Coordinates::new(1.5, 2.0)),
            "http://localhost:1234/points/1.5,2"
        );
    }

    #[test]
    fn point_response_ignores_unknown_fields() {
        let json = r#"{
            "id": "https://api.weather.gov/points/39.7456,-97.0892",
            "properties": {
                "gridId": "TOP",
                "forecast": "https://api.weather.gov/gridpoints/TOP/32,81/forecast",
                "forecastHourly": "https://api.weather.gov/gridpoints/TOP/32,81/forecast/hourly"
            }
        }"#;

        let parsed: PointResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.properties.forecast_hourly,
            "https://api.weather.gov/gridpoints/TOP/32,81/forecast/hourly"
        );
    }

    #[test]
    fn forecast_response_parses_periods() {
        let json = r#"{
            "properties": {
                "updated": "2024-05-01T12:00:00+00:00",
                "periods": [
                    {"number": 1, "temperature": 61, "temperatureUnit": "F", "shortForecast": "Mostly Clear"},
                    {"number": 2, "temperature": 59, "temperatureUnit": "F", "shortForecast": "Clear"}
                ]
            }
        }"#;

        let parsed: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.properties.periods.len(), 2);
        assert_eq!(parsed.properties.periods[0].temperature, 61);
        assert_eq!(parsed.properties.periods[0].short_forecast, "Mostly Clear");
    }
}
