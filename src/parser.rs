//! Parser for OpenWeatherMap air-pollution history responses.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::types::{ParseResult, Reading};

#[derive(Deserialize)]
struct HistoryResponse {
    list: Option<Vec<HistoryEntry>>,
}

#[derive(Deserialize)]
struct HistoryEntry {
    dt: i64,
    main: Option<MainIndex>,
    components: Option<Components>,
}

#[derive(Deserialize)]
struct MainIndex {
    aqi: Option<i64>,
}

#[derive(Deserialize)]
struct Components {
    co: Option<f64>,
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    so2: Option<f64>,
}

/// Turns one upstream response into a [`ParseResult`] for `station_id`.
///
/// An entry without `components` fails the whole station: readings parsed
/// from earlier entries of the same response are discarded.
pub fn parse_readings(status: StatusCode, body: &[u8], station_id: i64) -> ParseResult {
    if !status.is_success() {
        return ParseResult::request_failed(format!(
            "Problem with response from OpenweatherAPI {}",
            String::from_utf8_lossy(body)
        ));
    }

    let response: HistoryResponse = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            return ParseResult::payload_failed(format!(
                "Malformed response from OpenWeatherApi: {e}"
            ));
        }
    };

    let entries = match response.list {
        Some(list) if !list.is_empty() => list,
        _ => return ParseResult::payload_failed("Empty Response from OpenWeatherApi"),
    };

    let mut readings = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(components) = entry.components else {
            return ParseResult::payload_failed(
                "There is no details data for the rest of the parameters",
            );
        };

        readings.push(Reading {
            station_id,
            measurement_time: entry.dt,
            co: components.co,
            pm2_5: components.pm2_5,
            pm10: components.pm10,
            so2: components.so2,
            aqi: entry.main.and_then(|m| m.aqi),
        });
    }

    ParseResult::success(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(dt: i64) -> serde_json::Value {
        json!({
            "dt": dt,
            "main": { "aqi": 2 },
            "components": { "co": 201.94, "no": 0.02, "pm2_5": 3.1, "pm10": 5.4, "so2": 0.6 }
        })
    }

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_non_success_status_keeps_raw_body() {
        let result = parse_readings(StatusCode::UNAUTHORIZED, b"{\"cod\":401}", 1);

        assert!(result.error);
        assert_eq!(result.result, Some(vec![]));
        assert_eq!(
            result.message,
            "Problem with response from OpenweatherAPI {\"cod\":401}"
        );
    }

    #[test]
    fn test_missing_list_is_empty_response() {
        let result = parse_readings(StatusCode::OK, &body(json!({ "coord": {} })), 1);

        assert!(result.error);
        assert_eq!(result.result, None);
        assert_eq!(result.message, "Empty Response from OpenWeatherApi");
    }

    #[test]
    fn test_empty_list_is_empty_response() {
        let result = parse_readings(StatusCode::OK, &body(json!({ "list": [] })), 1);

        assert!(result.error);
        assert_eq!(result.result, None);
    }

    #[test]
    fn test_every_entry_becomes_a_reading() {
        let payload = json!({ "list": [entry(100), entry(200), entry(300)] });
        let result = parse_readings(StatusCode::OK, &body(payload), 7);

        assert!(!result.error);
        assert_eq!(result.message, "Success");
        let readings = result.readings();
        assert_eq!(readings.len(), 3);
        assert!(readings.iter().all(|r| r.station_id == 7));
        assert_eq!(readings[1].measurement_time, 200);
        assert_eq!(readings[0].co, Some(201.94));
        assert_eq!(readings[0].aqi, Some(2));
    }

    #[test]
    fn test_missing_main_leaves_aqi_empty() {
        let payload = json!({ "list": [{ "dt": 5, "components": { "pm10": 1.0 } }] });
        let result = parse_readings(StatusCode::OK, &body(payload), 1);

        assert!(!result.error);
        assert_eq!(result.readings()[0].aqi, None);
        assert_eq!(result.readings()[0].pm2_5, None);
    }

    #[test]
    fn test_missing_components_discards_whole_station() {
        let broken = json!({ "dt": 200, "main": { "aqi": 1 } });
        let payload = json!({ "list": [entry(100), broken, entry(300)] });
        let result = parse_readings(StatusCode::OK, &body(payload), 1);

        assert!(result.error);
        assert_eq!(result.result, None);
        assert_eq!(
            result.message,
            "There is no details data for the rest of the parameters"
        );
    }

    #[test]
    fn test_garbage_body_is_malformed() {
        let result = parse_readings(StatusCode::OK, b"<html>", 1);

        assert!(result.error);
        assert_eq!(result.result, None);
        assert!(result.message.starts_with("Malformed response"));
    }
}
