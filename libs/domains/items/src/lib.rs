//! Items Domain
//!
//! CRUD over the `items` table: paginated and searchable listing, partial
//! updates, and a nullable `last_modified_by` reference to `users`.
//!
//! ```text
//! handlers   axum routes, pagination links, audit events
//!    │
//! service    field validation, page resolution, not-found handling
//!    │
//! repository ItemRepository: InMemoryItemRepository | PgItemRepository
//!    │
//! entity     sea-orm models for `items` and `users`
//! ```
//!
//! ```rust,no_run
//! use domain_items::{handlers, InMemoryItemRepository, ItemService};
//!
//! let repository = InMemoryItemRepository::with_users([1, 2]);
//! let router = handlers::router(ItemService::new(repository));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod user;
pub mod validation;

pub use error::{ItemError, ItemResult};
pub use models::{
    CreateItem, Item, ItemChanges, ItemQuery, ItemResponse, ListParams, NewItem, PaginatedItems,
    UpdateItem,
};
pub use pagination::{PAGE_SIZE, Page};
pub use postgres::PgItemRepository;
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::ItemService;
