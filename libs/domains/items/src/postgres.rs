use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
};

use crate::{
    entity,
    error::{ItemError, ItemResult},
    models::{Item, ItemChanges, ItemQuery, NewItem},
    repository::ItemRepository,
    user,
};

pub struct PgItemRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn search(search: Option<&str>) -> Select<entity::Entity> {
        let query = entity::Entity::find();
        match search {
            Some(term) => {
                let pattern = search_pattern(term);
                query.filter(Expr::cust_with_values(
                    r#"("items"."name" ILIKE $1 OR "items"."description" ILIKE $2)"#,
                    [pattern.clone(), pattern],
                ))
            }
            None => query,
        }
    }
}

/// `%term%` with LIKE metacharacters escaped, so the term matches literally.
fn search_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Constraint violations raised by a write become domain errors; anything
/// else is internal.
fn write_error(err: DbErr, name: Option<&str>, user_id: Option<i32>) -> ItemError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ItemError::DuplicateName(name.unwrap_or_default().to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ItemError::UnknownUser(user_id.unwrap_or_default())
        }
        _ => err.into(),
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, input: NewItem) -> ItemResult<Item> {
        let NewItem {
            name,
            description,
            last_modified_by,
        } = input;

        let active_model = entity::ActiveModel {
            name: Set(name.clone()),
            description: Set(description),
            last_modified_by: Set(Some(last_modified_by)),
            ..Default::default()
        };

        let txn = self.base.begin().await?;
        let model = active_model
            .insert(&txn)
            .await
            .map_err(|e| write_error(e, Some(&name), Some(last_modified_by)))?;
        txn.commit()
            .await
            .map_err(|e| write_error(e, Some(&name), Some(last_modified_by)))?;

        tracing::info!(item_id = model.id, "Created item");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> ItemResult<Option<Item>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, query: ItemQuery) -> ItemResult<Vec<Item>> {
        let models = Self::search(query.search.as_deref())
            .order_by_asc(entity::Column::Id)
            .offset(query.offset)
            .limit(query.limit)
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self, search: Option<String>) -> ItemResult<u64> {
        let count = Self::search(search.as_deref())
            .count(self.base.db())
            .await?;
        Ok(count)
    }

    async fn update(&self, id: i32, changes: ItemChanges) -> ItemResult<Item> {
        let txn = self.base.begin().await?;

        let model = entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        let mut active_model: entity::ActiveModel = model.into();
        if let Some(name) = &changes.name {
            active_model.name = Set(name.clone());
        }
        if let Some(description) = &changes.description {
            active_model.description = Set(description.clone());
        }
        if let Some(user_id) = changes.last_modified_by {
            active_model.last_modified_by = Set(Some(user_id));
        }
        active_model.updated_at = Set(Utc::now().into());

        let name = changes.name.as_deref();
        let model = active_model
            .update(&txn)
            .await
            .map_err(|e| write_error(e, name, changes.last_modified_by))?;
        txn.commit()
            .await
            .map_err(|e| write_error(e, name, changes.last_modified_by))?;

        tracing::info!(item_id = id, "Updated item");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> ItemResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(item_id = id, "Deleted item");
        }
        Ok(rows_affected > 0)
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<i32>) -> ItemResult<bool> {
        let mut query = entity::Entity::find().filter(entity::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(entity::Column::Id.ne(id));
        }

        let count = query.count(self.base.db()).await?;
        Ok(count > 0)
    }

    async fn user_exists(&self, id: i32) -> ItemResult<bool> {
        let found = user::Entity::find_by_id(id).one(self.base.db()).await?;
        Ok(found.is_some())
    }
}
