//! Stored document shapes and the pure logic applied to them.

use std::collections::HashMap;

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use quill_core::{AuthorId, Post, PostId};

/// A document in the `posts` collection.
///
/// `id` is an ordinary integer field; the engine's `_id` is never used for
/// addressing and is ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostDocument {
    pub id: PostId,
    pub author_id: AuthorId,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub published_at: i64,
}

impl PostDocument {
    fn into_post(self, author_name: String) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            author_name,
            created_at: self.created_at,
            published_at: self.published_at,
        }
    }
}

/// Integer value of a BSON number, accepting doubles with no fractional part.
///
/// Shell clients store `{id: 1}` as a double.
fn whole_number(value: &Bson) -> Option<i64> {
    match *value {
        Bson::Int32(n) => Some(i64::from(n)),
        Bson::Int64(n) => Some(n),
        Bson::Double(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Some(f as i64)
        }
        _ => None,
    }
}

/// Build the id -> name map from a full scan of the authors collection.
///
/// Authors are read as raw documents. One without a usable `id` or `name`
/// is skipped, so posts pointing at it resolve to "".
pub(crate) fn author_names(authors: impl IntoIterator<Item = Document>) -> HashMap<AuthorId, String> {
    authors
        .into_iter()
        .filter_map(|doc| {
            let id = doc.get("id").and_then(whole_number);
            match (id, doc.get_str("name")) {
                (Some(id), Ok(name)) => Some((id, name.to_owned())),
                _ => {
                    tracing::debug!(author = %doc, "Skipping malformed author document");
                    None
                }
            }
        })
        .collect()
}

/// Second phase of the join: attach names to posts, "" for unknown authors.
pub(crate) fn attach_author_names(
    posts: impl IntoIterator<Item = PostDocument>,
    names: &HashMap<AuthorId, String>,
) -> Vec<Post> {
    posts
        .into_iter()
        .map(|doc| {
            let name = names.get(&doc.author_id).cloned().unwrap_or_default();
            doc.into_post(name)
        })
        .collect()
}

/// Next post id given the highest stored post and the highest id this
/// instance has handed out.
///
/// The high-water mark keeps ids from being reused after the newest post
/// is deleted.
pub(crate) fn next_post_id(last: Option<&PostDocument>, high_water: PostId) -> PostId {
    last.map_or(0, |doc| doc.id).max(high_water) + 1
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::*;

    fn post_doc(id: PostId, author_id: AuthorId) -> PostDocument {
        PostDocument {
            id,
            author_id,
            title: format!("Post {id}"),
            content: "Body".to_string(),
            created_at: 10,
            published_at: 20,
        }
    }

    #[test]
    fn test_next_id_starts_at_one() {
        assert_eq!(next_post_id(None, 0), 1);
    }

    #[test]
    fn test_next_id_follows_stored_max() {
        assert_eq!(next_post_id(Some(&post_doc(41, 1)), 0), 42);
    }

    #[test]
    fn test_next_id_never_reuses_handed_out_ids() {
        // Post 7 was created and then deleted; the collection max is now 5.
        assert_eq!(next_post_id(Some(&post_doc(5, 1)), 7), 8);
        assert_eq!(next_post_id(None, 7), 8);
    }

    #[test]
    fn test_join_attaches_names() {
        let names = author_names([doc! { "id": 1_i64, "name": "Ann" }, doc! { "id": 2_i64, "name": "Bo" }]);

        let posts = attach_author_names([post_doc(1, 2), post_doc(2, 1), post_doc(3, 3)], &names);

        let names: Vec<_> = posts.iter().map(|p| p.author_name.as_str()).collect();
        assert_eq!(names, ["Bo", "Ann", ""]);
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[0].created_at, 10);
        assert_eq!(posts[0].published_at, 20);
    }

    #[test]
    fn test_author_ids_accept_any_whole_number() {
        let names = author_names([
            doc! { "id": 1.0, "name": "Ann" },
            doc! { "id": 2_i32, "name": "Bo" },
            doc! { "id": 3_i64, "name": "Cy" },
        ]);

        assert_eq!(names.len(), 3);
        assert_eq!(names[&1], "Ann");
        assert_eq!(names[&2], "Bo");
        assert_eq!(names[&3], "Cy");
    }

    #[test]
    fn test_malformed_authors_resolve_to_empty_name() {
        let names = author_names([
            doc! { "id": 1_i32 },
            doc! { "id": 2.5, "name": "Half" },
            doc! { "id": "3", "name": "Text" },
            doc! { "name": "No id" },
            doc! { "id": 4_i32, "name": "Dee" },
        ]);
        assert_eq!(names.len(), 1);
        assert_eq!(names[&4], "Dee");

        let posts = attach_author_names([post_doc(1, 1), post_doc(2, 4)], &names);
        assert_eq!(posts[0].author_name, "");
        assert_eq!(posts[1].author_name, "Dee");
    }

    #[test]
    fn test_join_tolerates_empty_authors() {
        let posts = attach_author_names([post_doc(1, 1)], &HashMap::new());
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author_name, "");
    }
}
