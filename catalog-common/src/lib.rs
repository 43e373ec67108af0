//! # Catalog Common Library
//!
//! Shared code for the catalog services:
//! - Error type used across crates
//! - Configuration loading and root folder resolution
//! - Catalog database initialization
//! - Event types and the broadcast EventBus
//! - SSE helpers and time utilities

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod events;
pub mod sse;
pub mod time;

pub use error::{Error, Result};
