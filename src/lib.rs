pub mod config;
pub mod fetch;
pub mod forecast;
pub mod infra;
pub mod output;
pub mod parser;
pub mod services;
pub mod types;
pub mod web;
