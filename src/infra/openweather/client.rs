use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::parser::parse_readings;
use crate::services::air_quality_api::AirQualityApi;
use crate::types::{ParseResult, Station};

/// Client for the OpenWeatherMap air-pollution history endpoint.
pub struct OpenWeatherClient<C> {
    base_url: Url,
    client: C,
}

impl OpenWeatherClient<UrlParam<BasicClient>> {
    /// Builds a client that signs every request with `appid=<api_key>`.
    pub fn new(base_url: Url, api_key: String, client: BasicClient) -> Self {
        Self::with_client(base_url, UrlParam::appid(client, api_key))
    }
}

impl<C: HttpClient> OpenWeatherClient<C> {
    pub fn with_client(base_url: Url, client: C) -> Self {
        Self { base_url, client }
    }

    fn history_url(&self, station: &Station, start: i64, end: i64) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &station.latitude.to_string())
            .append_pair("lon", &station.longitude.to_string())
            .append_pair("start", &start.to_string())
            .append_pair("end", &end.to_string())
            .append_pair("type", "hour");
        url
    }
}

#[async_trait]
impl<C: HttpClient> AirQualityApi for OpenWeatherClient<C> {
    #[tracing::instrument(skip(self, station), fields(station_id = station.id))]
    async fn station_history(&self, station: &Station, start: i64, end: i64) -> ParseResult {
        let url = self.history_url(station, start, end);

        match fetch_bytes(&self.client, url).await {
            Ok((status, body)) => {
                debug!(%status, bytes = body.len(), "Upstream response received");
                parse_readings(status, &body, station.id)
            }
            Err(e) => {
                warn!(error = %e, "Upstream request failed");
                ParseResult::request_failed(format!(
                    "Problem with request to OpenWeatherApi: {e}"
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every request and answers with a fixed status and body.
    struct Recorder {
        urls: Mutex<Vec<Url>>,
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClient for Recorder {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            self.urls.lock().unwrap().push(req.url().clone());
            let resp = axum::http::Response::builder()
                .status(self.status)
                .body(self.body)
                .unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }

    fn station() -> Station {
        Station {
            id: 4,
            latitude: 10.5,
            longitude: 20.25,
        }
    }

    #[tokio::test]
    async fn test_query_carries_window_and_key() {
        let recorder = Recorder {
            urls: Mutex::new(Vec::new()),
            status: 200,
            body: r#"{"list": []}"#,
        };
        let client = OpenWeatherClient::with_client(
            Url::parse("http://upstream.test/data/2.5/air_pollution/history").unwrap(),
            UrlParam::appid(recorder, "secret".to_string()),
        );

        client.station_history(&station(), 100, 200).await;

        let urls = client.client.inner.urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(
            urls[0].query(),
            Some("lat=10.5&lon=20.25&start=100&end=200&type=hour&appid=secret")
        );
    }

    #[tokio::test]
    async fn test_status_error_becomes_record() {
        let recorder = Recorder {
            urls: Mutex::new(Vec::new()),
            status: 500,
            body: "boom",
        };
        let client = OpenWeatherClient::with_client(
            Url::parse("http://upstream.test/history").unwrap(),
            recorder,
        );

        let result = client.station_history(&station(), 0, 1).await;

        assert!(result.error);
        assert_eq!(result.result, Some(vec![]));
        assert!(result.message.ends_with("boom"));
    }

    struct Unreachable;

    #[async_trait]
    impl HttpClient for Unreachable {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            // A URL without a host fails inside reqwest before any I/O.
            reqwest::Client::new().get("http://").send().await
        }
    }

    #[tokio::test]
    async fn test_transport_error_becomes_record() {
        let client = OpenWeatherClient::with_client(
            Url::parse("http://upstream.test/history").unwrap(),
            Unreachable,
        );

        let result = client.station_history(&station(), 0, 1).await;

        assert!(result.error);
        assert_eq!(result.result, Some(vec![]));
        assert!(result.message.starts_with("Problem with request"));
    }
}
