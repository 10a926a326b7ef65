//! Request-level plumbing shared by handlers.

pub mod error;
