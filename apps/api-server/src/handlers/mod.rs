//! HTTP handlers and route configuration.

mod authors;
mod health;
mod posts;
mod tags;


use actix_web::error::QueryPayloadError;
use actix_web::{HttpRequest, HttpResponse, web};
use folio_core::domain::Page;
use folio_shared::{ErrorResponse, PaginatedResponse, PaginationMeta};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/", web::get().to(health::index))
        .route("/health", web::get().to(health::liveness))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}", web::patch().to(posts::update_post))
                        .route("/{id}", web::delete().to(posts::delete_post))
                        .route("/{id}/authors", web::get().to(posts::post_authors))
                        .route("/{id}/tags", web::get().to(posts::post_tags)),
                )
                .service(
                    web::scope("/authors")
                        .route("", web::get().to(authors::list_authors))
                        .route("", web::post().to(authors::create_author))
                        .route("/{id}", web::get().to(authors::get_author))
                        .route("/{id}/posts", web::get().to(authors::author_posts)),
                )
                .service(
                    web::scope("/tags")
                        .route("", web::get().to(tags::list_tags))
                        .route("/{id}/posts", web::get().to(tags::tag_posts)),
                ),
        )
        .default_service(web::to(route_not_found));
}

async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found("Route not found."))
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Malformed query string: {}", err)).into()
}

/// Wrap a domain page in the listing envelope.
pub(crate) fn paginated<T>(page: Page<T>) -> PaginatedResponse<T> {
    let p = page.pagination;
    PaginatedResponse {
        data: page.data,
        pagination: PaginationMeta {
            page: p.page,
            per_page: p.per_page,
            total: p.total,
            total_pages: p.total_pages,
        },
    }
}
