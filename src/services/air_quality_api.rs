//! Trait for fetching a station's air-pollution history.

use crate::types::{ParseResult, Station};

/// Abstraction over an air-quality history provider (e.g., OpenWeatherMap).
///
/// Implementations never fail outright: transport and payload problems are
/// reported through the returned [`ParseResult`].
#[async_trait::async_trait]
pub trait AirQualityApi: Send + Sync {
    /// Returns hourly readings for `station` between `start` and `end`
    /// (unix seconds, inclusive as the provider defines it).
    async fn station_history(&self, station: &Station, start: i64, end: i64) -> ParseResult;
}
