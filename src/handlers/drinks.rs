use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use crate::database::drink::normalize_recipe;
use crate::database::{Drink, StoreError};
use crate::error::ApiError;
use crate::AppContext;

/// GET /drinks - public menu, short views only
pub async fn list(State(ctx): State<AppContext>) -> Result<Json<Value>, ApiError> {
    let drinks = ctx.store.list_all().await?;

    Ok(Json(json!({
        "success": true,
        "drinks": drinks.iter().map(Drink::short).collect::<Vec<_>>(),
    })))
}

/// GET /drinks-detail - full recipes, requires get:drinks-detail
pub async fn list_detail(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    ctx.verifier
        .require_scope(&headers, "get:drinks-detail")
        .await?;

    let drinks = ctx
        .store
        .list_all()
        .await
        .map_err(unexpected_as_unprocessable)?;

    Ok(Json(json!({
        "success": true,
        "drinks": drinks.iter().map(Drink::long).collect::<Vec<_>>(),
    })))
}

/// POST /drinks - create a drink, requires post:drinks
pub async fn create(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    ctx.verifier.require_scope(&headers, "post:drinks").await?;

    let Json(body) = payload.map_err(|_| ApiError::BadRequest)?;
    let title = body
        .get("title")
        .and_then(Value::as_str)
        .ok_or(ApiError::BadRequest)?;
    let recipe_value = body.get("recipe").cloned().ok_or(ApiError::BadRequest)?;

    // A single ingredient object is accepted and normalized into a list
    let recipe = normalize_recipe(recipe_value).map_err(|_| ApiError::BadRequest)?;

    let drink = ctx.store.create(title, &recipe).await.map_err(|e| {
        // Construction failures of any kind surface as 400 on this path
        tracing::debug!("drink creation failed: {}", e);
        ApiError::BadRequest
    })?;

    Ok(Json(json!({
        "success": true,
        "drinks": [drink.long()],
    })))
}

/// PATCH /drinks/:id - retitle a drink, requires patch:drinks
pub async fn update(
    State(ctx): State<AppContext>,
    id: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    // A non-integer id matches no drink
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    ctx.verifier.require_scope(&headers, "patch:drinks").await?;

    // An unknown id is reported as 404 before the body is even looked at
    ctx.store.find(id).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound,
        other => {
            tracing::error!("drink lookup failed: {}", other);
            ApiError::BadRequest
        }
    })?;

    let Json(body) = payload.map_err(|_| ApiError::BadRequest)?;
    let body = body.as_object().ok_or(ApiError::BadRequest)?;

    // Title is the only mutable field; other keys are ignored
    let title = match body.get("title") {
        None => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => return Err(ApiError::BadRequest),
    };

    let drink = ctx.store.update(id, title).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound,
        other => {
            tracing::debug!("drink update failed: {}", other);
            ApiError::BadRequest
        }
    })?;

    Ok(Json(json!({
        "success": true,
        "drinks": [drink.long()],
    })))
}

/// DELETE /drinks/:id - requires delete:drinks
pub async fn remove(
    State(ctx): State<AppContext>,
    id: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    // A non-integer id matches no drink
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    ctx.verifier.require_scope(&headers, "delete:drinks").await?;

    let deleted = ctx.store.delete(id).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound,
        other => unexpected_as_unprocessable(other),
    })?;

    Ok(Json(json!({
        "success": true,
        "delete": deleted,
    })))
}

/// On the detail-read and delete paths, unexpected store failures are
/// reported as 422 rather than 500. The full detail still lands in the log.
fn unexpected_as_unprocessable(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::NotFound,
        other => {
            tracing::error!("unexpected store failure: {}", other);
            ApiError::Unprocessable
        }
    }
}
