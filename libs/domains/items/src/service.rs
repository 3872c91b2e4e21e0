//! Item Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::ValidationErrors;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, Item, ItemChanges, ItemQuery, ListParams, NewItem, UpdateItem};
use crate::pagination::{self, PAGE_SIZE, Page};
use crate::repository::ItemRepository;
use crate::validation;

/// Item service providing business logic operations
///
/// Validates request bodies field by field, resolves pages and turns
/// missing rows into [`ItemError::NotFound`].
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

fn into_result(errors: ValidationErrors) -> ItemResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ItemError::Validation(errors))
    }
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Name after trimming, or the error to report for it. Uniqueness is
    /// only checked for names that are otherwise valid.
    async fn check_name(
        &self,
        raw: &str,
        exclude_id: Option<i32>,
        errors: &mut ValidationErrors,
    ) -> ItemResult<Option<String>> {
        let name = match validation::clean_name(raw) {
            Ok(name) => name,
            Err(err) => {
                errors.add("name", err);
                return Ok(None);
            }
        };

        if self.repository.exists_by_name(&name, exclude_id).await? {
            errors.add("name", validation::name_taken(&name));
            return Ok(None);
        }
        Ok(Some(name))
    }

    async fn check_user(&self, user_id: i32, errors: &mut ValidationErrors) -> ItemResult<()> {
        if !self.repository.user_exists(user_id).await? {
            errors.add("last_modified_by", validation::unknown_user(user_id));
        }
        Ok(())
    }

    /// Create a new item, reporting every invalid field at once
    #[instrument(skip(self, input))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        let mut errors = ValidationErrors::new();

        let name = match input.name.as_deref() {
            Some(raw) => self.check_name(raw, None, &mut errors).await?,
            None => {
                errors.add("name", validation::required());
                None
            }
        };

        match input.last_modified_by {
            Some(user_id) => self.check_user(user_id, &mut errors).await?,
            None => errors.add("last_modified_by", validation::required()),
        }

        into_result(errors)?;

        let (Some(name), Some(last_modified_by)) = (name, input.last_modified_by) else {
            return Err(ItemError::Internal("validated create is incomplete".to_string()));
        };

        self.repository
            .create(NewItem {
                name,
                description: validation::clean_description(input.description),
                last_modified_by,
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: i32) -> ItemResult<Item> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    /// One page of items, optionally filtered by a search term
    #[instrument(skip(self))]
    pub async fn list_items(&self, params: ListParams) -> ItemResult<Page<Item>> {
        let search = params
            .search
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());

        let count = self.repository.count(search.clone()).await?;
        let num_pages = pagination::num_pages(count, PAGE_SIZE);
        let number = pagination::resolve_page(params.page.as_deref(), num_pages)?;

        let results = self
            .repository
            .list(ItemQuery {
                offset: pagination::offset(number, PAGE_SIZE),
                limit: PAGE_SIZE,
                search,
            })
            .await?;

        Ok(Page {
            results,
            count,
            number,
            num_pages,
        })
    }

    /// Partially update an item; omitted fields keep their value
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: i32, input: UpdateItem) -> ItemResult<Item> {
        self.get_item(id).await?;

        let mut errors = ValidationErrors::new();
        let mut changes = ItemChanges::default();

        match input.name {
            Some(Some(raw)) => changes.name = self.check_name(&raw, Some(id), &mut errors).await?,
            Some(None) => errors.add("name", validation::not_null()),
            None => {}
        }

        match input.last_modified_by {
            Some(Some(user_id)) => {
                self.check_user(user_id, &mut errors).await?;
                changes.last_modified_by = Some(user_id);
            }
            Some(None) => errors.add("last_modified_by", validation::not_null()),
            None => {}
        }

        changes.description = input.description.map(validation::clean_description);

        into_result(errors)?;
        self.repository.update(id, changes).await
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i32) -> ItemResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(ItemError::NotFound(id))
        }
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
