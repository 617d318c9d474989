use crate::{Config, Coordinates, Forecast, provider::nws::NwsFetcher};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod nws;

/// Anything that can turn coordinates into a [`Forecast`].
///
/// The HTTP handler only depends on this trait, so tests can swap in a double.
#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    async fn forecast(&self, coordinates: Coordinates) -> anyhow::Result<Forecast>;
}

/// Construct the api.weather.gov fetcher from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastFetcher>> {
    config.validate()?;
    let fetcher = NwsFetcher::from_config(&config.upstream)?;
    Ok(Box::new(fetcher))
}
