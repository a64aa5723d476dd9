//! # Post Shared
//!
//! Wire types shared between the post server and its clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
