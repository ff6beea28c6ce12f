//! REST API client module for the Learn Narish content server.
//!
//! This module provides the `ApiClient` for reading collection items
//! changed since a given time, one page at a time. The server is public;
//! no authentication is performed.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;
