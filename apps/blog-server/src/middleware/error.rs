//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, http::header};
use std::fmt;

use blogicum_core::domain::Id;
use blogicum_core::error::{DomainError, RepoError, ValidationErrors};
use blogicum_core::services::WriteOutcome;
use blogicum_shared::{ErrorResponse, FieldErrorBody};

use crate::observability::RequestId;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    Internal(String),
    Validation(ValidationErrors),
    /// Write refused to a non-owner: send them back to the post page.
    Redirect(String),
}

impl AppError {
    pub fn to_post(post_id: Id) -> Self {
        AppError::Redirect(format!("/posts/{post_id}/"))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", errors),
            AppError::Redirect(location) => write!(f, "Redirect to {}", location),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Redirect(_) => StatusCode::SEE_OTHER,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Redirect(location) => {
                return HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, location.as_str()))
                    .finish();
            }
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::validation(
                errors
                    .fields()
                    .iter()
                    .map(|e| FieldErrorBody {
                        field: e.field.to_string(),
                        message: e.message.clone(),
                    })
                    .collect(),
            ),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::from(DomainError::from(err))
    }
}

/// Unwrap an owner-gated write, turning a refusal into a redirect.
pub fn allowed<T>(outcome: WriteOutcome<T>) -> AppResult<T> {
    match outcome {
        WriteOutcome::Done(value) => Ok(value),
        WriteOutcome::Redirect { post_id } => Err(AppError::to_post(post_id)),
    }
}

/// JSON body, query string and path extractor failures.
pub fn extractor_error(err: impl fmt::Display, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(path = %req.path(), "Rejected request: {}", err);
    AppError::BadRequest(err.to_string()).into()
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found("No page at this address")
            .with_instance(req.path())
            .with_request_id(request_id.as_str()),
    )
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
