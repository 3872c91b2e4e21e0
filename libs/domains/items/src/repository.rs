use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, ItemChanges, ItemQuery, NewItem};

/// Repository trait for Item persistence
///
/// Implementations enforce name uniqueness and the `last_modified_by`
/// reference themselves, so a write that passed service validation can
/// still fail with [`ItemError::DuplicateName`] or [`ItemError::UnknownUser`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item
    async fn create(&self, input: NewItem) -> ItemResult<Item>;

    /// Get an item by ID
    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>>;

    /// One page of items ordered by id
    async fn list(&self, query: ItemQuery) -> ItemResult<Vec<Item>>;

    /// Count items matching the search term
    async fn count(&self, search: Option<String>) -> ItemResult<u64>;

    /// Apply a partial update, refreshing `updated_at`
    async fn update(&self, id: i32, changes: ItemChanges) -> ItemResult<Item>;

    /// Delete an item; `false` when there was nothing to delete
    async fn delete(&self, id: i32) -> ItemResult<bool>;

    /// Whether another item already uses `name`
    async fn exists_by_name(&self, name: &str, exclude_id: Option<i32>) -> ItemResult<bool>;

    async fn user_exists(&self, id: i32) -> ItemResult<bool>;
}

/// Case-insensitive substring match on name or description.
pub(crate) fn matches_search(item: &Item, term: &str) -> bool {
    let term = term.to_lowercase();
    item.name.to_lowercase().contains(&term)
        || item
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&term))
}

#[derive(Debug, Default)]
struct State {
    items: BTreeMap<i32, Item>,
    users: BTreeSet<i32>,
    last_id: i32,
}

impl State {
    fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> bool {
        self.items
            .values()
            .any(|item| item.name == name && Some(item.id) != exclude_id)
    }

    fn matching<'a>(&'a self, search: Option<&'a str>) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .values()
            .filter(move |item| search.is_none_or(|term| matches_search(item, term)))
    }
}

/// Process-local store for development and tests.
///
/// Known user ids are tracked here as well, so the `last_modified_by`
/// reference behaves like the PostgreSQL foreign key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryItemRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store that already knows the given user ids.
    pub fn with_users(ids: impl IntoIterator<Item = i32>) -> Self {
        let state = State {
            users: ids.into_iter().collect(),
            ..State::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn add_user(&self, id: i32) {
        self.state.write().await.users.insert(id);
    }

    /// Remove a user and clear `last_modified_by` on the items it touched.
    pub async fn remove_user(&self, id: i32) {
        let mut state = self.state.write().await;
        state.users.remove(&id);
        for item in state.items.values_mut() {
            if item.last_modified_by == Some(id) {
                item.last_modified_by = None;
            }
        }
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, input: NewItem) -> ItemResult<Item> {
        let mut state = self.state.write().await;

        if state.name_taken(&input.name, None) {
            return Err(ItemError::DuplicateName(input.name));
        }
        if !state.users.contains(&input.last_modified_by) {
            return Err(ItemError::UnknownUser(input.last_modified_by));
        }

        state.last_id += 1;
        let now = Utc::now();
        let item = Item {
            id: state.last_id,
            name: input.name,
            description: input.description,
            last_modified_by: Some(input.last_modified_by),
            created_at: now,
            updated_at: now,
        };
        state.items.insert(item.id, item.clone());

        tracing::info!(item_id = item.id, "Created item");
        Ok(item)
    }

    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn list(&self, query: ItemQuery) -> ItemResult<Vec<Item>> {
        let state = self.state.read().await;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        Ok(state
            .matching(query.search.as_deref())
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, search: Option<String>) -> ItemResult<u64> {
        let state = self.state.read().await;
        Ok(state.matching(search.as_deref()).count() as u64)
    }

    async fn update(&self, id: i32, changes: ItemChanges) -> ItemResult<Item> {
        let mut state = self.state.write().await;

        if !state.items.contains_key(&id) {
            return Err(ItemError::NotFound(id));
        }
        if let Some(name) = &changes.name {
            if state.name_taken(name, Some(id)) {
                return Err(ItemError::DuplicateName(name.clone()));
            }
        }
        if let Some(user_id) = changes.last_modified_by {
            if !state.users.contains(&user_id) {
                return Err(ItemError::UnknownUser(user_id));
            }
        }

        let item = state.items.get_mut(&id).ok_or(ItemError::NotFound(id))?;
        item.apply_changes(&changes);

        tracing::info!(item_id = id, "Updated item");
        Ok(item.clone())
    }

    async fn delete(&self, id: i32) -> ItemResult<bool> {
        let deleted = self.state.write().await.items.remove(&id).is_some();
        if deleted {
            tracing::info!(item_id = id, "Deleted item");
        }
        Ok(deleted)
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<i32>) -> ItemResult<bool> {
        Ok(self.state.read().await.name_taken(name, exclude_id))
    }

    async fn user_exists(&self, id: i32) -> ItemResult<bool> {
        Ok(self.state.read().await.users.contains(&id))
    }
}
