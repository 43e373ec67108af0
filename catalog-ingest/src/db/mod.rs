//! Catalog database access for catalog-ingest
//!
//! The schema itself is owned by `catalog_common::db`; this module holds the
//! queries the ingest service runs against it.

pub mod albums;
pub mod models;
pub mod settings;
pub mod studios;

pub use albums::NewAlbum;
