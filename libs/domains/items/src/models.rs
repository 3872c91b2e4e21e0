use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Stored item, including the timestamps the wire format leaves out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// `None` once the referenced user has been removed
    pub last_modified_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Apply a partial update and move `updated_at` strictly forward.
    pub fn apply_changes(&mut self, changes: &ItemChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(user_id) = changes.last_modified_by {
            self.last_modified_by = Some(user_id);
        }
        self.updated_at = Utc::now().max(self.updated_at + TimeDelta::microseconds(1));
    }
}

/// Item as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Item 1")]
    pub name: String,
    #[schema(example = "First item")]
    pub description: Option<String>,
    #[schema(example = 1)]
    pub last_modified_by: Option<i32>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            last_modified_by: item.last_modified_by,
        }
    }
}

/// Request body for creating an item.
///
/// Fields are optional here so that missing values are reported as field
/// errors instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateItem {
    #[schema(example = "Item 1", max_length = 255)]
    pub name: Option<String>,
    #[schema(example = "First item")]
    pub description: Option<String>,
    #[schema(example = 1)]
    pub last_modified_by: Option<i32>,
}

/// Request body for `PUT`/`PATCH`; every field may be omitted.
///
/// An omitted field is left untouched, which is different from an explicit
/// `null` (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateItem {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, max_length = 255)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub last_modified_by: Option<Option<i32>>,
}

/// Marks a field as present, keeping an explicit `null` as `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validated insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub last_modified_by: i32,
}

/// Validated partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub last_modified_by: Option<i32>,
}

/// One page worth of rows, already filtered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub offset: u64,
    pub limit: u64,
    pub search: Option<String>,
}

/// Query string of `GET /items`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number, or `last`
    pub page: Option<String>,
    /// Case-insensitive substring matched against name and description
    pub search: Option<String>,
}

/// Paginated list body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginatedItems {
    /// Total number of matching items across all pages
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<ItemResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> Item {
        let now = Utc::now();
        Item {
            id: 1,
            name: "Item 1".to_string(),
            description: Some("First".to_string()),
            last_modified_by: Some(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_update_item_distinguishes_missing_from_null() {
        let body: UpdateItem = serde_json::from_value(json!({
            "name": "Renamed",
            "description": null
        }))
        .unwrap();

        assert_eq!(body.name, Some(Some("Renamed".to_string())));
        assert_eq!(body.description, Some(None));
        assert_eq!(body.last_modified_by, None);
    }

    #[test]
    fn test_create_item_tolerates_missing_fields() {
        let body: CreateItem = serde_json::from_value(json!({})).unwrap();
        assert!(body.name.is_none());
        assert!(body.last_modified_by.is_none());
    }

    #[test]
    fn test_apply_changes_only_touches_given_fields() {
        let mut item = item();
        let before = item.updated_at;

        item.apply_changes(&ItemChanges {
            name: Some("Renamed".to_string()),
            ..Default::default()
        });

        assert_eq!(item.name, "Renamed");
        assert_eq!(item.description.as_deref(), Some("First"));
        assert_eq!(item.last_modified_by, Some(1));
        assert!(item.updated_at > before);
    }

    #[test]
    fn test_apply_changes_can_clear_description() {
        let mut item = item();
        item.apply_changes(&ItemChanges {
            description: Some(None),
            ..Default::default()
        });
        assert!(item.description.is_none());
    }

    #[test]
    fn test_response_has_exactly_wire_fields() {
        let value = serde_json::to_value(ItemResponse::from(item())).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["description", "id", "last_modified_by", "name"]);
    }
}
