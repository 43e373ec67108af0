//! Operator reconciliation of parsed folder names

pub mod session;

pub use session::{
    ItemAction, ReviewError, ReviewItem, ReviewSession, ReviewSnapshot, ReviewStatus,
    StatusCounts, TierAction, TierCounts,
};
