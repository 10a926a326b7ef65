//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::{Post, PostId};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, CreatedPostResponse, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 200;

fn validate_fields(author_id: i64, title: &str, content: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if author_id <= 0 {
        errors.push("author_id must be positive".to_string());
    }
    if title.trim().is_empty() {
        errors.push("title must not be empty".to_string());
    } else if title.chars().count() > MAX_TITLE_CHARS {
        errors.push(format!("title must be at most {MAX_TITLE_CHARS} characters"));
    }
    if content.trim().is_empty() {
        errors.push("content must not be empty".to_string());
    }
    errors
}

fn post_id(raw: i64) -> AppResult<PostId> {
    if raw <= 0 {
        return Err(AppError::BadRequest(format!("Invalid post id: {raw}")));
    }
    Ok(raw)
}

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author_id: post.author_id,
        author_name: post.author_name,
        created_at: post.created_at,
        published_at: post.published_at,
    }
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = validate_fields(req.author_id, &req.title, &req.content);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let id = state
        .posts
        .add_post(Post::draft(req.author_id, req.title, req.content))
        .await?;
    tracing::info!(post_id = id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        CreatedPostResponse { id },
        "Post created",
    )))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = post_id(path.into_inner())?;
    let req = body.into_inner();

    let mut errors = validate_fields(req.author_id, &req.title, &req.content);
    if req.created_at < 0 || req.published_at < 0 {
        errors.push("timestamps must not be negative".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    state
        .posts
        .update_post(Post {
            id,
            title: req.title,
            content: req.content,
            author_id: req.author_id,
            author_name: String::new(),
            created_at: req.created_at,
            published_at: req.published_at,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = post_id(path.into_inner())?;

    state
        .posts
        .delete_post(&Post {
            id,
            ..Post::default()
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use quill_core::{Author, PostRepository, RepoError};
    use quill_infra::InMemoryPostRepository;
    use quill_shared::ErrorResponse;

    use super::*;
    use crate::handlers::configure_routes;

    fn state_with(repo: Arc<dyn PostRepository>) -> web::Data<AppState> {
        web::Data::new(AppState::new(repo, "memory"))
    }

    fn memory_state() -> web::Data<AppState> {
        state_with(Arc::new(InMemoryPostRepository::with_authors([
            Author::new(1, "Ann"),
            Author::new(2, "Bo"),
        ])))
    }

    struct FailingRepository;

    #[async_trait]
    impl PostRepository for FailingRepository {
        async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
            Err(RepoError::Query("relation \"posts\" does not exist".to_string()))
        }

        async fn add_post(&self, _post: Post) -> Result<PostId, RepoError> {
            Err(RepoError::Query("insert failed".to_string()))
        }

        async fn update_post(&self, _post: Post) -> Result<(), RepoError> {
            Ok(())
        }

        async fn delete_post(&self, _post: &Post) -> Result<(), RepoError> {
            Ok(())
        }
    }

    fn create_request(author_id: i64, title: &str, content: &str) -> CreatePostRequest {
        CreatePostRequest {
            author_id,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_create_then_list() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(configure_routes),
        )
        .await;

        for (author, title) in [(1, "Hello"), (2, "Second")] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .set_json(create_request(author, title, "World"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: ApiResponse<Vec<PostResponse>> = test::call_and_read_body_json(&app, req).await;
        let posts = body.data.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Hello");
        assert_eq!(posts[0].author_name, "Ann");
        assert_eq!(posts[1].author_name, "Bo");
        assert!(posts[0].id < posts[1].id);
    }

    #[actix_web::test]
    async fn test_create_returns_id() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(create_request(1, "Hello", "World"))
            .to_request();
        let body: ApiResponse<CreatedPostResponse> = test::call_and_read_body_json(&app, req).await;

        assert!(body.success);
        assert_eq!(body.data.unwrap().id, 1);
        assert_eq!(body.message.as_deref(), Some("Post created"));
    }

    #[actix_web::test]
    async fn test_create_rejects_invalid_fields() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(create_request(0, "  ", "body"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let problem: ErrorResponse = test::read_body_json(resp).await;
        let detail = problem.detail.unwrap();
        assert!(detail.contains("author_id"));
        assert!(detail.contains("title"));
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"title\": 3}")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_update_changes_only_given_fields() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(create_request(1, "Old", "Body"))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: ApiResponse<Vec<PostResponse>> = test::call_and_read_body_json(&app, req).await;
        let created = body.data.unwrap().remove(0);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .set_json(UpdatePostRequest {
                author_id: created.author_id,
                title: "New".to_string(),
                content: created.content.clone(),
                created_at: created.created_at,
                published_at: created.published_at,
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: ApiResponse<Vec<PostResponse>> = test::call_and_read_body_json(&app, req).await;
        let updated = body.data.unwrap().remove(0);
        assert_eq!(
            updated,
            PostResponse {
                title: "New".to_string(),
                ..created
            }
        );
    }

    #[actix_web::test]
    async fn test_delete_is_idempotent() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(create_request(1, "Hello", "World"))
            .to_request();
        test::call_service(&app, req).await;

        for _ in 0..2 {
            let req = test::TestRequest::delete().uri("/api/posts/1").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        }

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: ApiResponse<Vec<PostResponse>> = test::call_and_read_body_json(&app, req).await;
        assert!(body.data.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_non_positive_id_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::delete().uri("/api/posts/0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_storage_error_is_opaque_500() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(Arc::new(FailingRepository)))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let problem: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(problem.status, 500);
        assert!(problem.detail.is_none());
    }

    #[actix_web::test]
    async fn test_health_reports_storage() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
    }
}
