//! Catalog database models and schema initialization

pub mod init;
pub mod models;

pub use init::*;
pub use models::*;
