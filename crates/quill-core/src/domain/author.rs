use serde::{Deserialize, Serialize};

/// Author identifier.
pub type AuthorId = i64;

/// Author entity. Read-only from the storage layer's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

impl Author {
    pub fn new(id: AuthorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
