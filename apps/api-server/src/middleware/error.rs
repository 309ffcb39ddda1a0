//! Error handling middleware - RFC 7807 compliant responses.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use folio_core::error::DomainError;
use folio_shared::ErrorResponse;
use serde::de::DeserializeOwned;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Validation(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Validation(detail) => ErrorResponse::unprocessable(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                if cfg!(debug_assertions) {
                    ErrorResponse::internal_error().with_detail(detail)
                } else {
                    ErrorResponse::internal_error()
                }
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidParameter(msg) => AppError::BadRequest(msg),
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found.", entity_type, id))
            }
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Decode a JSON request body. An empty body reads as `{}`; unparseable JSON
/// is a 400, JSON of the wrong shape is a 422.
pub fn json_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> AppResult<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(bytes).map_err(|err| {
        if err.is_data() {
            AppError::Validation(format!("Invalid request body: {}", err))
        } else {
            AppError::BadRequest(format!("Malformed JSON body: {}", err))
        }
    })
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::InvalidParameter("x".into()), 400),
            (DomainError::Validation("x".into()), 422),
            (DomainError::not_found("Post", 7), 404),
            (DomainError::Conflict("x".into()), 409),
            (DomainError::Internal("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code().as_u16(), status);
        }
    }

    #[derive(Debug, Default, serde::Deserialize)]
    struct Body {
        title: Option<String>,
    }

    #[test]
    fn empty_body_reads_as_empty_object() {
        let body: Body = json_body(b"").unwrap();
        assert_eq!(body.title, None);
        let body: Body = json_body(b"  \n").unwrap();
        assert_eq!(body.title, None);
    }

    #[test]
    fn body_errors_split_syntax_from_shape() {
        let err = json_body::<Body>(b"{\"title\": ").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = json_body::<Body>(br#"{"title": 5}"#).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
