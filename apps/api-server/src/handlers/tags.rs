//! Tag handlers.

use actix_web::{HttpResponse, web};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/tags
pub async fn list_tags(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// GET /api/tags/{id}/posts
pub async fn tag_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let posts = state.tags.posts_with_tag(&path).await?;
    Ok(HttpResponse::Ok().json(posts))
}
