//! Discount handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::validation::{validate_discount, validate_new_discount};
use catalog_core::{Discount, DiscountUpdate, NewDiscount, ValidationError};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// `POST /discounts/`
///
/// The new discount is linked to its product in the same transaction.
pub async fn create_discount(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewDiscount>,
) -> ApiResult<(StatusCode, Json<Discount>)> {
    validate_new_discount(&input)?;

    if !state.db.products().exists(input.product).await? {
        return Err(ValidationError::UnknownReference {
            field: "product".to_string(),
            id: input.product,
        }
        .into());
    }

    let discount = state.db.discounts().insert(&input).await?;
    info!(
        id = discount.id,
        product = discount.product,
        discount_type = %discount.discount_type,
        "Discount created"
    );

    Ok((StatusCode::CREATED, Json(discount)))
}

/// `GET /discounts/{id}/`
pub async fn get_discount(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Discount>> {
    state
        .db
        .discounts()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::missing("Discount", id))
}

/// `PATCH /discounts/{id}/`
pub async fn update_discount(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<DiscountUpdate>,
) -> ApiResult<Json<Discount>> {
    let repo = state.db.discounts();
    let current = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::missing("Discount", id))?;

    let updated = update.apply_to(&current);
    validate_discount(&updated)?;

    let discount = repo.update(&updated).await?;
    info!(id = discount.id, status = ?discount.status, "Discount updated");

    Ok(Json(discount))
}
