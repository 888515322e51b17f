use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum AppError {
    #[error("Error: Data must be sent as JSON")]
    UnsupportedContentType,

    #[error("Error: Data must be valid JSON")]
    MalformedBody(#[from] serde_json::Error),

    /// A required key was absent (or null) in the request body.
    #[error("Error: Data must have a '{0}' key")]
    Validation(&'static str),

    #[error("Error: You must use another name. That one is taken")]
    DuplicateUsername,

    #[error("Error: There is no user with id {0}")]
    UnknownOwner(i32),

    #[error("Error: There is no user with id {0}")]
    UserNotFound(i32),

    #[error("Error: Unable to store the password")]
    PasswordHash(String),

    #[error("Error: Database failure")]
    Database(#[from] diesel::result::Error),

    #[error("Error: Database unavailable")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Error: Request could not be completed")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::MalformedBody(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateUsername => StatusCode::CONFLICT,
            AppError::UnknownOwner(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PasswordHash(_)
            | AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::PasswordHash(detail) => log::error!("password hashing failed: {}", detail),
            AppError::Database(e) => log::error!("database error: {}", e),
            AppError::Pool(e) => log::error!("connection pool error: {}", e),
            AppError::Blocking(e) => log::error!("blocking task failed: {}", e),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(self.to_string())
    }
}
