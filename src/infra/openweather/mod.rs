//! OpenWeatherMap air-pollution history client.

mod client;

pub use client::OpenWeatherClient;
