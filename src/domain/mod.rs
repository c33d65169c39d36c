//! Domain layer containing business entities and the storage key layout.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`keys`] - Where each piece of state lives in the key-value store
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Business logic is encapsulated in services (see [`crate::application::services`])

pub mod entities;
pub mod keys;
