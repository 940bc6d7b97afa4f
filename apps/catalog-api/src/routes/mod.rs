//! # Routes
//!
//! ```text
//! GET    /categories/                      list (recursive subcategories)
//! POST   /categories/                      create
//! GET    /categories/{id}/                 retrieve
//! PATCH  /categories/{id}/                 partial update
//! DELETE /categories/{id}/                 delete
//!
//! GET    /products/                        list (paginated, ?category=)
//! POST   /products/                        create
//! GET    /products/{id}                    retrieve
//! PATCH  /products/{id}                    partial update
//! GET    /products/{id}/discounts/         attached discounts, evaluated
//! POST   /products/{id}/{discount_id}/     apply discount
//!
//! POST   /discounts/                       create
//! GET    /discounts/{id}/                  retrieve
//! PATCH  /discounts/{id}/                  partial update
//! ```
//!
//! All of the above sit under the configured base path. `/health` is
//! mounted by [`crate::build_router`] outside of it.

pub mod category;
pub mod discount;
pub mod health;
pub mod product;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Catalog routes, not yet nested under the base path.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories/",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/categories/{id}/",
            get(category::get_category)
                .patch(category::update_category)
                .delete(category::delete_category),
        )
        .route(
            "/products/",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/{id}",
            get(product::get_product).patch(product::update_product),
        )
        .route(
            "/products/{id}/",
            get(product::get_product).patch(product::update_product),
        )
        .route(
            "/products/{id}/discounts/",
            get(product::list_product_discounts),
        )
        .route(
            "/products/{id}/{discount_id}/",
            post(product::apply_discount),
        )
        .route("/discounts/", post(discount::create_discount))
        .route(
            "/discounts/{id}/",
            get(discount::get_discount).patch(discount::update_discount),
        )
}
