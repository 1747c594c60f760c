//! Tracklink Client
//!
//! Async client for the issue tracker's REST API, built on the issue model in
//! `tracklink-core`.

pub mod auth;
pub mod client;
pub mod error;
pub mod jira;
pub mod services;
pub mod transport;

pub use client::RestClient;
pub use error::{Error, Result};
pub use jira::Jira;
pub use transport::{Method, Transport};
