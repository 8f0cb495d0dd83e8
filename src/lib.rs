//! streams-relay: authenticated HTTP relay for Chainlink Data Streams
//!
//! This library provides the core components for:
//! - Fetching price reports from the Data Streams REST API
//! - Bounded, sequential retries of failed fetches
//! - Normalizing big-integer report fields to decimal strings
//! - A shared-secret gated HTTP endpoint serving the benchmark price
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod report;
pub mod retry;
pub mod server;
pub mod streams;
pub mod telemetry;
