//! Recommendation backend client and wire types

pub mod api;
pub mod types;

pub use api::{BackendClient, BackendError};
pub use types::{FeedbackEvent, ItemId, Recommendation, SearchItem};
