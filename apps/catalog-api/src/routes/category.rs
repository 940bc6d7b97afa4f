//! Category handlers.
//!
//! The list endpoint returns every category, each carrying its own
//! recursive `subcategories`, so clients can start rendering from any node.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::validation::{validate_new_category, validate_slug, validate_title};
use catalog_core::{
    build_category_forest, Category, CategoryNode, CategoryUpdate, NewCategory, ValidationError,
};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// `GET /categories/`
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryNode>>> {
    let categories = state.db.categories().list_all().await?;
    Ok(Json(build_category_forest(&categories)))
}

/// `POST /categories/`
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let input = validate_new_category(input)?;

    if let Some(parent) = input.parent {
        ensure_category_exists(&state, parent).await?;
    }

    let category = state.db.categories().insert(&input).await?;
    info!(id = category.id, slug = %category.slug, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /categories/{id}/`
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Category>> {
    state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::missing("Category", id))
}

/// `PATCH /categories/{id}/`
///
/// Moving a category under a new parent is checked against the parent's
/// ancestor chain inside the write's transaction; a move that would nest the
/// category inside itself is refused with 400.
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    let repo = state.db.categories();
    let mut category = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::missing("Category", id))?;

    if let Some(title) = &update.title {
        category.title = validate_title(title)?;
    }
    if let Some(description) = &update.description {
        category.description = description.clone();
    }
    if let Some(slug) = &update.slug {
        category.slug = validate_slug(slug)?;
    }
    if let Some(parent) = update.parent {
        if let Some(parent_id) = parent {
            ensure_category_exists(&state, parent_id).await?;
        }
        category.parent = parent;
    }

    let category = repo.update(&category).await?;
    info!(id = category.id, "Category updated");

    Ok(Json(category))
}

/// `DELETE /categories/{id}/`
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.db.categories().delete(id).await?;
    info!(id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_category_exists(state: &AppState, id: i64) -> ApiResult<()> {
    if state.db.categories().exists(id).await? {
        Ok(())
    } else {
        Err(ValidationError::UnknownReference {
            field: "parent".to_string(),
            id,
        }
        .into())
    }
}
