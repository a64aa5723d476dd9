//! Post store implementations - MongoDB and in-memory fallback.

mod config;
mod memory;

pub use config::MongoConfig;
pub use memory::InMemoryPostStore;

#[cfg(feature = "mongodb")]
mod mongo;
#[cfg(feature = "mongodb")]
pub use mongo::MongoPostStore;
