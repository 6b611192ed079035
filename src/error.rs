use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Every failure a handler can report. The variant picks the status code,
/// the message becomes the JSON body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized("Invalid credentials".into())
    }

    pub fn recipe_not_found() -> Self {
        AppError::NotFound("Recipe not found".into())
    }
}

/// Postgres `string_data_right_truncation`: a value longer than its column.
const VALUE_TOO_LONG: &str = "22001";

/// Client-caused database failures, keyed by SQLSTATE.
fn client_error_for(sqlstate: &str) -> Option<AppError> {
    match sqlstate {
        VALUE_TOO_LONG => Some(AppError::Validation("Value too long".into())),
        _ => None,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if let Some(err) = db.code().as_deref().and_then(client_error_for) {
                tracing::warn!(error = %db, "rejected value");
                return err;
            }
        }
        AppError::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            AppError::Validation(m)
            | AppError::Unauthorized(m)
            | AppError::NotFound(m)
            | AppError::Conflict(m) => m,
        };
        (status, MessageBody::new(message)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
