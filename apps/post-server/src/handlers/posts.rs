//! Post handlers - one per service operation.

use actix_web::{HttpResponse, web};

use post_core::domain::Post;
use post_shared::dto::{
    CreatePostRequest, DeletePostResponse, PostDto, PostListResponse, PostResponse,
    UpdatePostRequest,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_dto(post: Post) -> PostDto {
    PostDto {
        id: post.id,
        title: post.title,
        content: post.content,
        author_id: post.author_id,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn to_list(posts: Vec<Post>) -> PostListResponse {
    PostListResponse {
        posts: posts.into_iter().map(to_dto).collect(),
    }
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let scope = state.request_scope();

    let post = state
        .posts
        .create(req.title, req.content, req.author_id, scope.token())
        .await?;

    tracing::info!(post_id = %post.id, "Post created");
    Ok(HttpResponse::Created().json(PostResponse { post: to_dto(post) }))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let scope = state.request_scope();

    let post = state.posts.get(&id, scope.token()).await?;

    Ok(HttpResponse::Ok().json(PostResponse { post: to_dto(post) }))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    let scope = state.request_scope();

    let post = state
        .posts
        .update(&id, req.title, req.content, req.author_id, scope.token())
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse { post: to_dto(post) }))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let scope = state.request_scope();

    let deleted = state.posts.delete(&id, scope.token()).await?;

    Ok(HttpResponse::Ok().json(DeletePostResponse {
        id: deleted.id,
        success: deleted.success,
    }))
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let scope = state.request_scope();

    let posts = state.posts.list(scope.token()).await?;

    Ok(HttpResponse::Ok().json(to_list(posts)))
}

/// GET /api/authors/{author_id}/posts
pub async fn list_posts_by_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author_id = path.into_inner();
    let scope = state.request_scope();

    let posts = state.posts.list_by_author(&author_id, scope.token()).await?;

    Ok(HttpResponse::Ok().json(to_list(posts)))
}
