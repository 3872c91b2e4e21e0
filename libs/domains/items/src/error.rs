use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

use crate::validation;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(i32),

    #[error("Invalid page")]
    InvalidPage,

    /// Raised by the store when the unique constraint on `name` fires
    #[error("Item with name '{0}' already exists")]
    DuplicateName(String),

    /// Raised by the store when `last_modified_by` has no matching user
    #[error("User {0} does not exist")]
    UnknownUser(i32),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

impl From<DbErr> for ItemError {
    fn from(err: DbErr) -> Self {
        ItemError::Internal(format!("Database error: {}", err))
    }
}

fn field_error(field: &'static str, error: validator::ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// Store-level constraint failures render exactly like the service's own
/// validation errors.
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(_) => {
                AppError::NotFound("No Item matches the given query.".to_string())
            }
            ItemError::InvalidPage => AppError::NotFound("Invalid page.".to_string()),
            ItemError::DuplicateName(name) => {
                AppError::ValidationError(field_error("name", validation::name_taken(&name)))
            }
            ItemError::UnknownUser(id) => AppError::ValidationError(field_error(
                "last_modified_by",
                validation::unknown_user(id),
            )),
            ItemError::Validation(errors) => AppError::ValidationError(errors),
            ItemError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
