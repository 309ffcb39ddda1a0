//! Health check and service index.

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

/// Bare liveness probe.
///
/// GET /health
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "ok": true }))
}

/// GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "service": "folio",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "posts": "/api/posts",
            "authors": "/api/authors",
            "tags": "/api/tags",
            "health": "/api/health",
            "liveness": "/health",
        },
    }))
}
