//! Upstream-facing abstractions and the scrape workflow built on them.

pub mod air_quality_api;
pub mod scraper;
