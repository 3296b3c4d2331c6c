//! Core translation engine module

pub mod aggregator;
pub mod backend;
pub mod client;
pub mod config;
pub mod errors;
pub mod languages;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod retry;
pub mod scheduler;
