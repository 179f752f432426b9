mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use reqwest::StatusCode;

/// Issues a GET for `url` and returns the status with the raw body.
///
/// Non-2xx statuses are not errors here; callers decide what they mean.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: reqwest::Url,
) -> Result<(StatusCode, Vec<u8>)> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    Ok((status, resp.bytes().await?.to_vec()))
}
