//! Product handlers, including apply-discount.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_core::validation::{validate_new_product, validate_product};
use catalog_core::{NewProduct, Product, ProductUpdate, ValidationError};
use catalog_db::ProductFilter;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::pagination::Pager;
use crate::state::AppState;
use crate::views::{
    product_view, product_views, ApplyDiscountResponse, DiscountEvaluationView, ProductView,
};

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl ProductListQuery {
    /// A blank `category` means no filter.
    fn filter(&self) -> ApiResult<ProductFilter> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
                field: "category".to_string(),
                reason: format!("\"{raw}\" is not a category id"),
            })?),
        };
        Ok(ProductFilter { category })
    }
}

/// `GET /products/`
///
/// Paginated unless pagination is switched off in the config, in which
/// case the whole (filtered) listing comes back as a bare array.
pub async fn list_products(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> ApiResult<Response> {
    let filter = query.filter()?;
    let now = state.clock.now();
    let repo = state.db.products();
    let settings = &state.config.pagination;

    if !settings.enabled {
        let products = repo.list(&filter, None, 0).await?;
        let views = product_views(&state.db, products, now).await?;
        return Ok(Json(views).into_response());
    }

    let count = usize::try_from(repo.count(&filter).await?).unwrap_or_default();
    let pager = Pager::new(
        query.page.as_deref(),
        query.page_size.as_deref(),
        count,
        settings,
    )?;
    debug!(page = pager.page, page_size = pager.page_size, count, "Listing products");

    let products = repo.list(&filter, Some(pager.limit()), pager.offset()).await?;
    let views = product_views(&state.db, products, now).await?;

    Ok(Json(pager.paginate(&uri, views)).into_response())
}

/// `POST /products/`
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<ProductView>)> {
    let input = validate_new_product(input)?;
    ensure_category_exists(&state, input.category).await?;

    let product = state.db.products().insert(&input).await?;
    info!(id = product.id, name = %product.name, "Product created");

    let view = product_view(&state.db, product, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ProductView>> {
    let product = find_product(&state, id).await?;
    let view = product_view(&state.db, product, state.clock.now()).await?;
    Ok(Json(view))
}

/// `PATCH /products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> ApiResult<Json<ProductView>> {
    let current = find_product(&state, id).await?;
    let updated = validate_product(&update.apply_to(&current))?;

    if updated.category != current.category {
        ensure_category_exists(&state, updated.category).await?;
    }

    let product = state.db.products().update(&updated).await?;
    info!(id = product.id, "Product updated");

    let view = product_view(&state.db, product, state.clock.now()).await?;
    Ok(Json(view))
}

/// `GET /products/{id}/discounts/`
pub async fn list_product_discounts(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Vec<DiscountEvaluationView>>> {
    let product = find_product(&state, id).await?;
    let now = state.clock.now();

    let views = state
        .db
        .discounts()
        .for_product(product.id)
        .await?
        .into_iter()
        .map(|discount| DiscountEvaluationView::new(discount, product.price, now))
        .collect();

    Ok(Json(views))
}

/// `POST /products/{id}/{discount_id}/`
///
/// Attaches the discount (idempotently) and reports what that discount
/// alone does to the price. The nested product still shows the best price
/// across everything attached to it.
pub async fn apply_discount(
    State(state): State<AppState>,
    ApiPath((product_id, discount_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<ApplyDiscountResponse>> {
    let product = state
        .db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found."))?;
    let discount = state
        .db
        .discounts()
        .get_by_id(discount_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Discount not found."))?;

    let attached = state.db.discounts().attach(product.id, discount.id).await?;
    info!(product_id, discount_id, newly_attached = attached, "Discount applied");

    let now = state.clock.now();
    let view = product_view(&state.db, product, now).await?;
    Ok(Json(ApplyDiscountResponse::new(view, &discount, now)))
}

async fn find_product(state: &AppState, id: i64) -> ApiResult<Product> {
    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::missing("Product", id))
}

async fn ensure_category_exists(state: &AppState, id: i64) -> ApiResult<()> {
    if state.db.categories().exists(id).await? {
        Ok(())
    } else {
        Err(ValidationError::UnknownReference {
            field: "category".to_string(),
            id,
        }
        .into())
    }
}
