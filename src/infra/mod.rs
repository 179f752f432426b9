//! Adapters for the outside world: the upstream API and model persistence.

pub mod openweather;
pub mod store;
