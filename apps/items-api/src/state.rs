//! Application state management.

use sea_orm::DatabaseConnection;

/// Shared application state.
///
/// Cloned per handler; the connection shares one pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
}
