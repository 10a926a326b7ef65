//! SeaORM entities for the relational layout.

pub mod author;
pub mod post;
