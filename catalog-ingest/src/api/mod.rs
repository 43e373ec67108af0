//! HTTP API handlers for catalog-ingest
//!
//! JSON endpoints for the presentation layer plus SSE progress streams.

pub mod health;
pub mod import;
pub mod parse;
pub mod review;
pub mod sse;
pub mod studios;

pub use health::health_routes;
pub use import::import_routes;
pub use parse::parse_routes;
pub use review::review_routes;
pub use sse::{event_stream, import_event_stream};
pub use studios::studio_routes;
