//! Document backend - MongoDB.
//!
//! MongoDB offers neither a join nor an auto-increment key here, so this
//! backend joins authors to posts in two scans and allocates post ids
//! itself under a lock.

mod documents;
mod mongo_repo;

pub use mongo_repo::{MongoConfig, MongoPostRepository};
