//! Author handlers.

use actix_web::{HttpResponse, web};
use folio_core::validation::AuthorDraft;
use folio_shared::dto::CreateAuthorRequest;

use crate::middleware::error::{AppResult, json_body};
use crate::state::AppState;

/// GET /api/authors
pub async fn list_authors(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let authors = state.authors.list().await?;
    Ok(HttpResponse::Ok().json(authors))
}

/// POST /api/authors
pub async fn create_author(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req: CreateAuthorRequest = json_body(&body)?;
    let author = state
        .authors
        .create(AuthorDraft {
            name: req.name,
            email: req.email,
            password_hash: req.password_hash,
            bio: req.bio,
        })
        .await?;

    Ok(HttpResponse::Created().json(author))
}

/// GET /api/authors/{id}
pub async fn get_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = state.authors.get(&path).await?;
    Ok(HttpResponse::Ok().json(author))
}

/// GET /api/authors/{id}/posts
pub async fn author_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let posts = state.authors.posts(&path).await?;
    Ok(HttpResponse::Ok().json(posts))
}
