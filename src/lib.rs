pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod middleware;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
