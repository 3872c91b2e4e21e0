use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Integer primary key taken from the single path parameter.
///
/// Anything that does not parse as an `i32` can never match a stored row,
/// so it is rejected as 404 rather than 400.
///
/// ```ignore
/// async fn get_item(IdPath(id): IdPath) -> String {
///     format!("item {}", id)
/// }
///
/// let app = Router::new().route("/{id}", get(get_item));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;

        raw.parse::<i32>()
            .map(IdPath)
            .map_err(|_| AppError::NotFound(format!("No resource with id '{}'", raw)))
    }
}
