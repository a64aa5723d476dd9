//! # Post Infrastructure
//!
//! Concrete implementations of the `PostStore` port defined in `post-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `mongodb` - MongoDB document store via the official driver

pub mod store;

pub use store::{InMemoryPostStore, MongoConfig};

#[cfg(feature = "mongodb")]
pub use store::MongoPostStore;
