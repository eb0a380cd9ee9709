// ABOUTME: Library root for rapidctl - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod acquire;
pub mod catalog;
pub mod client;
pub mod config;
pub mod credentials;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod preferences;
pub mod runtime;
pub mod types;
