//! # PM2.5 Scenario Simulator
//!
//! Backend for a small educational air-quality simulator. A user enters four
//! inputs (traffic, industry, open burning, wind speed); the service estimates
//! a synthetic PM2.5 concentration with a fixed linear model, classifies it,
//! stores the run in a history file and returns narrative analysis plus
//! chart data for the frontend. "What if" scenarios re-run the last
//! calculated baseline with a fixed perturbation.
//!
//! ## Architecture
//!
//! - [`algorithms`]: the estimator and scenario perturbations (pure functions)
//! - [`models`]: input, result and history record types
//! - [`db`]: history repository trait, JSON file and in-memory backends
//! - [`services`]: simulation orchestration, narrator, chart data, sessions
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod algorithms;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
