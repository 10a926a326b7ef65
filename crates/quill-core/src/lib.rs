//! # Quill Core
//!
//! The domain layer of Quill: posts, authors and the storage contract every
//! backend implements. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;

pub use domain::{Author, AuthorId, Post, PostId};
pub use error::RepoError;
pub use ports::PostRepository;
