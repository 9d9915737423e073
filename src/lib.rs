pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod playlist;

#[cfg(test)]
mod integration_tests;

pub use error::*;
pub use models::*;
