use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use mixology_session::identity::NotAuthenticated;

use crate::domain::normalize::{InvalidDraftError, MalformedRecordError};

/// Mixology service error variants.
#[derive(Debug, thiserror::Error)]
pub enum MixologyError {
    #[error("malformed catalog record: {0}")]
    MalformedRecord(#[from] MalformedRecordError),
    #[error("invalid drink: {0}")]
    InvalidDrink(#[from] InvalidDraftError),
    #[error("username already taken")]
    DuplicateUsername,
    #[error("username must be 2-20 characters of letters, digits, '-' or '_'")]
    InvalidUsername,
    #[error("password must be at least 6 characters")]
    InvalidPassword,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("bookmark was changed concurrently")]
    BookmarkConflict,
    #[error("you must be logged in to do this")]
    NotAuthenticated,
    #[error("user not found")]
    UserNotFound,
    #[error("drink not found")]
    DrinkNotFound,
    #[error("only the author may change this drink")]
    NotDrinkAuthor,
    #[error("language not found")]
    LanguageNotFound,
    #[error("missing data")]
    MissingData,
    #[error("catalog data temporarily unavailable")]
    CatalogUnavailable,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MixologyError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRecord(_) => "MALFORMED_RECORD",
            Self::InvalidDrink(_) => "INVALID_DRINK",
            Self::DuplicateUsername => "DUPLICATE_USERNAME",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::BookmarkConflict => "BOOKMARK_CONFLICT",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::DrinkNotFound => "DRINK_NOT_FOUND",
            Self::NotDrinkAuthor => "NOT_DRINK_AUTHOR",
            Self::LanguageNotFound => "LANGUAGE_NOT_FOUND",
            Self::MissingData => "MISSING_DATA",
            Self::CatalogUnavailable => "CATALOG_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<NotAuthenticated> for MixologyError {
    fn from(_: NotAuthenticated) -> Self {
        Self::NotAuthenticated
    }
}

impl IntoResponse for MixologyError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MalformedRecord(_)
            | Self::InvalidDrink(_)
            | Self::InvalidUsername
            | Self::InvalidPassword
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::NotDrinkAuthor => StatusCode::FORBIDDEN,
            Self::DuplicateUsername | Self::BookmarkConflict => StatusCode::CONFLICT,
            Self::UserNotFound | Self::DrinkNotFound | Self::LanguageNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::CatalogUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
