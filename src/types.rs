//! Records exchanged with the upstream API, the HTTP callers and the models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed sensor location supplied by the caller.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Station {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// One timestamped pollutant sample for a station, as returned to callers.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Reading {
    #[serde(rename = "stationId")]
    pub station_id: i64,
    #[serde(rename = "measurementTime")]
    pub measurement_time: i64,
    pub co: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub so2: Option<f64>,
    pub aqi: Option<i64>,
}

/// Outcome of parsing one station's upstream response.
///
/// `result` is `Some(vec![])` for transport/status failures and `None` for
/// payload failures; callers rely on that distinction.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ParseResult {
    #[serde(rename = "Result")]
    pub result: Option<Vec<Reading>>,
    #[serde(rename = "Error")]
    pub error: bool,
    #[serde(rename = "Message")]
    pub message: String,
}

impl ParseResult {
    pub fn success(readings: Vec<Reading>) -> Self {
        Self {
            result: Some(readings),
            error: false,
            message: "Success".to_string(),
        }
    }

    /// Failure before any payload was available (bad status, unreachable host).
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self {
            result: Some(Vec::new()),
            error: true,
            message: message.into(),
        }
    }

    /// Failure caused by the payload itself.
    pub fn payload_failed(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: true,
            message: message.into(),
        }
    }

    pub fn readings(&self) -> &[Reading] {
        self.result.as_deref().unwrap_or_default()
    }
}

/// Historical measurement supplied for training or prediction.
///
/// Rows are expected oldest first; nothing downstream re-sorts them.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MeasurementRow {
    #[serde(rename = "StationId", alias = "stationId", default)]
    pub station_id: Option<i64>,
    #[serde(rename = "MeasurementTime", alias = "measurementTime", default)]
    pub measurement_time: Option<i64>,
    #[serde(alias = "CO", default)]
    pub co: Option<f64>,
    #[serde(alias = "PM2_5", default)]
    pub pm2_5: Option<f64>,
    #[serde(alias = "PM10", default)]
    pub pm10: Option<f64>,
    #[serde(alias = "SO2", default)]
    pub so2: Option<f64>,
    /// Carried through, never used as a feature.
    #[serde(alias = "AQI", default)]
    pub aqi: Option<f64>,
}

impl MeasurementRow {
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm10 => self.pm10,
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Co => self.co,
            Pollutant::So2 => self.so2,
        }
    }
}

/// Pollutants that get their own model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Pollutant {
    #[serde(rename = "pm10")]
    Pm10,
    #[serde(rename = "pm2_5")]
    Pm2_5,
    #[serde(rename = "co")]
    Co,
    #[serde(rename = "so2")]
    So2,
}

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [
        Pollutant::Pm10,
        Pollutant::Pm2_5,
        Pollutant::Co,
        Pollutant::So2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::Co => "co",
            Pollutant::So2 => "so2",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_result_serializes_with_caller_casing() {
        let value = serde_json::to_value(ParseResult::payload_failed("nope")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "Result": null, "Error": true, "Message": "nope" })
        );
    }

    #[test]
    fn test_request_failed_keeps_empty_list() {
        let value = serde_json::to_value(ParseResult::request_failed("down")).unwrap();
        assert_eq!(value["Result"], serde_json::json!([]));
    }

    #[test]
    fn test_measurement_row_accepts_both_casings() {
        let upper: MeasurementRow = serde_json::from_str(
            r#"{"StationId": 3, "MeasurementTime": 100, "PM10": 1.5, "CO": 2.0}"#,
        )
        .unwrap();
        let lower: MeasurementRow = serde_json::from_str(
            r#"{"stationId": 3, "measurementTime": 100, "pm10": 1.5, "co": 2.0}"#,
        )
        .unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper.aqi, None);
        assert_eq!(upper.value(Pollutant::Pm10), Some(1.5));
        assert_eq!(upper.value(Pollutant::So2), None);
    }

    #[test]
    fn test_measurement_row_accepts_fractional_aqi() {
        let row: MeasurementRow = serde_json::from_str(r#"{"pm10": 1.5, "aqi": 2.0}"#).unwrap();
        assert_eq!(row.aqi, Some(2.0));

        let row: MeasurementRow = serde_json::from_str(r#"{"AQI": 3}"#).unwrap();
        assert_eq!(row.aqi, Some(3.0));
    }
}
