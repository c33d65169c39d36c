//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`NewLink`] - Input for creating a short link
//! - [`LinkStats`] - Everything known about a live short link
//! - [`TopLink`] - An entry of the popularity ranking

pub mod link;

pub use link::{LinkStats, MAX_TTL_SECONDS, NewLink, TopLink};
