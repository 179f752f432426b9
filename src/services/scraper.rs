//! Scrape workflow: one upstream call per station, in input order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::services::air_quality_api::AirQualityApi;
use crate::types::{ParseResult, Station};

/// Lookback window used when the caller does not give a usable one.
pub const DEFAULT_LOOKBACK_HOURS: i64 = 5;

const SECONDS_PER_HOUR: i64 = 3600;

pub const EMPTY_STATIONS_MESSAGE: &str = "EMPTY stations payload";

/// The `stations_payload` object of a scrape request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StationsPayload {
    #[serde(rename = "Stations", default)]
    pub stations: Option<Vec<Station>>,
    #[serde(rename = "NumberOfHours", default)]
    pub number_of_hours: Option<i64>,
}

impl StationsPayload {
    pub fn lookback_hours(&self) -> i64 {
        self.number_of_hours
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_LOOKBACK_HOURS)
    }

    /// `(start, end)` in unix seconds for the lookback window ending at `end`.
    ///
    /// A lookback that overflows or reaches before the epoch falls back to
    /// the default window.
    pub fn window(&self, end: i64) -> (i64, i64) {
        let hours = self.lookback_hours();
        let start = hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|secs| end.checked_sub(secs))
            .filter(|start| *start >= 0);
        match start {
            Some(start) => (start, end),
            None => {
                warn!(hours, "Lookback window out of range, using the default");
                (end - DEFAULT_LOOKBACK_HOURS * SECONDS_PER_HOUR, end)
            }
        }
    }
}

/// Scrape response body. `Error` and `Message` only appear when the request
/// was rejected before any station was fetched.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScrapeResponse {
    #[serde(rename = "Result")]
    pub result: Vec<ParseResult>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScrapeResponse {
    pub fn rejected(message: &str) -> Self {
        Self {
            result: Vec::new(),
            error: Some(true),
            message: Some(message.to_string()),
        }
    }
}

/// Fetches every station sequentially for the window ending at `now`.
///
/// A missing or empty station list is rejected without any upstream call.
/// Per-station failures are kept as error records in their slot.
#[tracing::instrument(skip_all)]
pub async fn scrape<A: AirQualityApi + ?Sized>(
    api: &A,
    payload: Option<StationsPayload>,
    now: DateTime<Utc>,
) -> ScrapeResponse {
    let Some(payload) = payload else {
        warn!("Scrape request without stations payload");
        return ScrapeResponse::rejected(EMPTY_STATIONS_MESSAGE);
    };
    let (start, end) = payload.window(now.timestamp());
    let stations = match payload.stations {
        Some(stations) if !stations.is_empty() => stations,
        _ => {
            warn!("Scrape request with no stations");
            return ScrapeResponse::rejected(EMPTY_STATIONS_MESSAGE);
        }
    };

    info!(stations = stations.len(), start, end, "Scraping stations");

    let mut results = Vec::with_capacity(stations.len());
    for station in &stations {
        let result = api.station_history(station, start, end).await;
        if result.error {
            warn!(station_id = station.id, message = %result.message, "Station scrape failed");
        } else {
            info!(
                station_id = station.id,
                readings = result.readings().len(),
                "Station scraped"
            );
        }
        results.push(result);
    }

    ScrapeResponse {
        result: results,
        error: None,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Reading;
    use std::sync::Mutex;

    /// Answers from a script and records each call.
    #[derive(Default)]
    struct ScriptedApi {
        calls: Mutex<Vec<(i64, i64, i64)>>,
        failing: Vec<i64>,
    }

    #[async_trait::async_trait]
    impl AirQualityApi for ScriptedApi {
        async fn station_history(&self, station: &Station, start: i64, end: i64) -> ParseResult {
            self.calls.lock().unwrap().push((station.id, start, end));
            if self.failing.contains(&station.id) {
                return ParseResult::request_failed("down");
            }
            ParseResult::success(vec![Reading {
                station_id: station.id,
                measurement_time: end,
                ..Default::default()
            }])
        }
    }

    fn station(id: i64) -> Station {
        Station {
            id,
            latitude: 1.0,
            longitude: 2.0,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_missing_payload_is_rejected() {
        let api = ScriptedApi::default();
        let response = scrape(&api, None, now()).await;

        assert_eq!(response, ScrapeResponse::rejected(EMPTY_STATIONS_MESSAGE));
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_null_and_empty_station_lists_are_rejected() {
        let api = ScriptedApi::default();
        for stations in [None, Some(vec![])] {
            let payload = StationsPayload {
                stations,
                number_of_hours: Some(3),
            };
            let response = scrape(&api, Some(payload), now()).await;
            assert_eq!(response.error, Some(true));
            assert!(response.result.is_empty());
        }
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_result_per_station_in_order() {
        let api = ScriptedApi {
            failing: vec![2],
            ..Default::default()
        };
        let payload = StationsPayload {
            stations: Some(vec![station(3), station(2), station(1)]),
            number_of_hours: Some(2),
        };

        let response = scrape(&api, Some(payload), now()).await;

        assert_eq!(response.error, None);
        assert_eq!(response.result.len(), 3);
        assert_eq!(response.result[0].readings()[0].station_id, 3);
        assert!(response.result[1].error);
        assert_eq!(response.result[2].readings()[0].station_id, 1);

        let calls = api.calls.lock().unwrap();
        let ids: Vec<i64> = calls.iter().map(|c| c.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(calls.iter().all(|c| c.2 - c.1 == 2 * 3600));
        assert_eq!(calls[0].2, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_window_defaults_when_absent_or_invalid() {
        for hours in [None, Some(0), Some(-4)] {
            let api = ScriptedApi::default();
            let payload = StationsPayload {
                stations: Some(vec![station(1)]),
                number_of_hours: hours,
            };
            scrape(&api, Some(payload), now()).await;

            let calls = api.calls.lock().unwrap();
            assert_eq!(calls[0].2 - calls[0].1, DEFAULT_LOOKBACK_HOURS * 3600);
        }
    }

    #[tokio::test]
    async fn test_out_of_range_window_uses_default() {
        for hours in [9_000_000_000_000_000, i64::MAX, 1_000_000] {
            let api = ScriptedApi::default();
            let payload = StationsPayload {
                stations: Some(vec![station(1)]),
                number_of_hours: Some(hours),
            };
            let response = scrape(&api, Some(payload), now()).await;

            assert_eq!(response.result.len(), 1);
            let calls = api.calls.lock().unwrap();
            assert_eq!(calls[0].2 - calls[0].1, DEFAULT_LOOKBACK_HOURS * 3600);
        }
    }

    #[test]
    fn test_window_reaching_the_epoch_is_kept() {
        let payload = StationsPayload {
            stations: None,
            number_of_hours: Some(10),
        };
        assert_eq!(payload.window(36_000), (0, 36_000));
        assert_eq!(payload.window(35_999), (35_999 - 5 * 3600, 35_999));
    }

    #[test]
    fn test_completed_response_omits_error_fields() {
        let response = ScrapeResponse {
            result: vec![],
            error: None,
            message: None,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({ "Result": [] })
        );
    }
}
