//! Post handlers.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use folio_core::PostFilter;
use folio_core::validation::{PostDraft, PostPatch};
use folio_shared::dto::{CreatePostRequest, UpdatePostRequest};

use super::paginated;
use crate::middleware::error::{AppResult, json_body};
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter::from_params(&query)?;
    let page = state.posts.list(&filter).await?;

    Ok(HttpResponse::Ok().json(paginated(page)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req: CreatePostRequest = json_body(&body)?;
    let draft = PostDraft {
        title: req.title,
        body: req.body,
        summary: req.summary,
        author_ids: req.author_ids,
    };
    let post = state.posts.create(draft).await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(&path).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PATCH /api/posts/{id}
///
/// The id and the post's existence are checked before the body is read.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    state.posts.get(&path).await?;

    let req: UpdatePostRequest = json_body(&body)?;
    let patch = PostPatch {
        title: req.title,
        summary: req.summary,
        body: req.body,
    };
    let post = state.posts.update(&path, patch).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(&path).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/posts/{id}/authors
pub async fn post_authors(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let authors = state.posts.authors(&path).await?;
    Ok(HttpResponse::Ok().json(authors))
}

/// GET /api/posts/{id}/tags
pub async fn post_tags(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let tags = state.tags.tags_of_post(&path).await?;
    Ok(HttpResponse::Ok().json(tags))
}
