use axum::{
    Json, Router,
    extract::{OriginalUri, Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, IdPath, JsonBody, extract_ip_from_headers,
    extract_user_agent,
    errors::responses::{
        InternalServerErrorResponse, MalformedBodyResponse, NotFoundResponse,
        ValidationFailedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ItemResult;
use crate::models::{CreateItem, ItemResponse, ListParams, PaginatedItems, UpdateItem};
use crate::pagination;
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, get_item, update_item, delete_item),
    components(
        schemas(ItemResponse, CreateItem, UpdateItem, PaginatedItems),
        responses(
            ValidationFailedResponse,
            MalformedBodyResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Item management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the items router with all HTTP endpoints
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_items).post(create_item))
        .route(
            "/{id}",
            get(get_item)
                .put(update_item)
                .patch(update_item)
                .delete(delete_item),
        )
        .with_state(shared_service)
}

fn audit<T>(
    action: &str,
    id: Option<i32>,
    actor: Option<i32>,
    headers: &HeaderMap,
    result: &ItemResult<T>,
) {
    let outcome = match result {
        Ok(_) => AuditOutcome::Success,
        Err(_) => AuditOutcome::Failure,
    };

    AuditEvent::new(action, id.map(|id| format!("item:{}", id)), outcome)
        .with_actor(actor)
        .with_ip(extract_ip_from_headers(headers))
        .with_user_agent(extract_user_agent(headers))
        .log();
}

/// List items, ten per page
#[utoipa::path(
    get,
    path = "",
    tag = "Items",
    params(ListParams),
    responses(
        (status = 200, description = "One page of items", body = PaginatedItems),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PaginatedItems>, AppError> {
    let Query(params) = query?;
    let page = service.list_items(params).await?;
    let origin = pagination::request_origin(&headers, &uri);
    Ok(Json(PaginatedItems::from_page(page, &origin, &uri)))
}

/// Create a new item
#[utoipa::path(
    post,
    path = "",
    tag = "Items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created successfully", body = ItemResponse),
        (status = 400, response = ValidationFailedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    headers: HeaderMap,
    JsonBody(input): JsonBody<CreateItem>,
) -> ItemResult<impl IntoResponse> {
    let actor = input.last_modified_by;
    let result = service.create_item(input).await;
    audit(
        "item.create",
        result.as_ref().ok().map(|item| item.id),
        actor,
        &headers,
        &result,
    );

    let item = result?;
    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// Get an item by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    IdPath(id): IdPath,
) -> ItemResult<Json<ItemResponse>> {
    let item = service.get_item(id).await?;
    Ok(Json(item.into()))
}

/// Update an item; omitted fields are left unchanged
#[utoipa::path(
    method(put, patch),
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated successfully", body = ItemResponse),
        (status = 400, response = ValidationFailedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    IdPath(id): IdPath,
    headers: HeaderMap,
    body: Result<JsonBody<UpdateItem>, AppError>,
) -> Result<Json<ItemResponse>, AppError> {
    // A missing item is reported before anything about the body
    let input = match body {
        Ok(JsonBody(input)) => input,
        Err(rejection) => {
            service.get_item(id).await?;
            return Err(rejection);
        }
    };

    let actor = input.last_modified_by.flatten();
    let result = service.update_item(id, input).await;
    audit("item.update", Some(id), actor, &headers, &result);

    Ok(Json(result?.into()))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item deleted successfully"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    IdPath(id): IdPath,
    headers: HeaderMap,
) -> ItemResult<impl IntoResponse> {
    let result = service.delete_item(id).await;
    audit("item.delete", Some(id), None, &headers, &result);

    result?;
    Ok(StatusCode::NO_CONTENT)
}
