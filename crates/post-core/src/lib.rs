//! # Post Core
//!
//! The domain and service layer of the post service.
//! This crate holds the `Post` entity, the `PostStore` port that document
//! stores implement, and `PostService`, which maps each remote operation onto
//! store calls. It depends on no store driver and no transport; tokio is
//! used only to race store calls against cancellation.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{Operation, ServiceError, StoreError};
pub use service::PostService;
