//! Domain entities - the core business objects.

mod author;
mod post;

pub use author::{Author, AuthorId};
pub use post::{Post, PostId, unix_now};
