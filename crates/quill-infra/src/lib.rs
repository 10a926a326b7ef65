//! # Quill Infrastructure
//!
//! Concrete implementations of the [`PostRepository`](quill_core::PostRepository)
//! port defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL backend via SeaORM
//! - `mongo` - MongoDB document backend

pub mod database;
pub mod memory;

#[cfg(feature = "mongo")]
pub mod document;

// Re-exports - In-Memory
pub use memory::{AuthorNameResolver, InMemoryPostRepository};

// Re-exports - PostgreSQL
pub use database::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;

// Re-exports - MongoDB
#[cfg(feature = "mongo")]
pub use document::{MongoConfig, MongoPostRepository};
