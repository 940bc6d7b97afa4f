//! # Response Views
//!
//! JSON shapes returned by the handlers, and the batched loaders that build
//! them.
//!
//! ## Product listing
//! ```text
//! products (one page)
//!     │
//!     ├──► categories().get_many(ids)     1 query
//!     ├──► discounts().for_products(ids)  1 query
//!     │
//!     ▼
//! best_discount(product, discounts, now) per product  ──► ProductView
//! ```
//!
//! One `now` is read per request so every product on a page is priced at
//! the same instant.

use std::collections::HashMap;

use catalog_core::{
    best_discount, evaluate, Category, Discount, Evaluation, Inapplicable, Money, Product,
    ProductStatus,
};
use catalog_db::Database;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Product
// =============================================================================

/// A product with its category expanded and its best price computed.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub quantity: i64,
    pub status: ProductStatus,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub discounted_price: Money,
}

impl ProductView {
    pub fn new(
        product: Product,
        category: Category,
        discounts: &[Discount],
        now: DateTime<Utc>,
    ) -> Self {
        let discounted_price = match best_discount(&product, discounts, now) {
            Some((winner, price)) => {
                debug!(product = product.id, discount = winner.id, "Best discount selected");
                price
            }
            None => product.price,
        };
        ProductView {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            status: product.status,
            category,
            created_at: product.created_at,
            updated_at: product.updated_at,
            discounted_price,
        }
    }
}

/// Builds the view for one product.
pub async fn product_view(
    db: &Database,
    product: Product,
    now: DateTime<Utc>,
) -> ApiResult<ProductView> {
    let category = db
        .categories()
        .get_by_id(product.category)
        .await?
        .ok_or_else(|| dangling_category(&product))?;
    let discounts = db.discounts().for_product(product.id).await?;

    Ok(ProductView::new(product, category, &discounts, now))
}

/// Builds views for a page of products with two extra queries in total.
pub async fn product_views(
    db: &Database,
    products: Vec<Product>,
    now: DateTime<Utc>,
) -> ApiResult<Vec<ProductView>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let mut category_ids: Vec<i64> = products.iter().map(|p| p.category).collect();
    category_ids.sort_unstable();
    category_ids.dedup();

    let categories: HashMap<i64, Category> = db
        .categories()
        .get_many(&category_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let discounts = db.discounts().for_products(&product_ids).await?;

    products
        .into_iter()
        .map(|product| {
            let category = categories
                .get(&product.category)
                .cloned()
                .ok_or_else(|| dangling_category(&product))?;
            let attached = discounts
                .get(&product.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            Ok(ProductView::new(product, category, attached, now))
        })
        .collect()
}

fn dangling_category(product: &Product) -> ApiError {
    tracing::error!(
        product_id = product.id,
        category_id = product.category,
        "Product references a missing category"
    );
    ApiError::internal("Internal server error")
}

// =============================================================================
// Discount
// =============================================================================

/// A discount together with what it would do to its product's price right
/// now.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountEvaluationView {
    #[serde(flatten)]
    pub discount: Discount,
    pub applicable: bool,
    /// Price after this discount alone; null when it does not apply.
    pub candidate_price: Option<Money>,
    /// `inactive` or `expired` when the discount does not apply.
    pub reason: Option<&'static str>,
}

impl DiscountEvaluationView {
    pub fn new(discount: Discount, base_price: Money, now: DateTime<Utc>) -> Self {
        let evaluation = evaluate(&discount, base_price, now);
        let reason = match evaluation {
            Evaluation::Applicable(_) => None,
            Evaluation::Inapplicable(Inapplicable::Inactive) => Some("inactive"),
            Evaluation::Inapplicable(Inapplicable::Expired) => Some("expired"),
        };

        DiscountEvaluationView {
            applicable: evaluation.is_applicable(),
            candidate_price: evaluation.candidate(),
            reason,
            discount,
        }
    }
}

// =============================================================================
// Apply-Discount
// =============================================================================

/// Result of attaching a discount to a product.
///
/// `product.discounted_price` is the best price across every attached
/// discount; `discounted_price` is the effect of the applied discount alone.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyDiscountResponse {
    pub product: ProductView,
    pub discounted_price: Money,
    pub applicable: bool,
}

impl ApplyDiscountResponse {
    pub fn new(product: ProductView, discount: &Discount, now: DateTime<Utc>) -> Self {
        let evaluation = evaluate(discount, product.price, now);
        ApplyDiscountResponse {
            discounted_price: evaluation.candidate().unwrap_or(product.price),
            applicable: evaluation.is_applicable(),
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{DiscountStatus, DiscountType};
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    fn category() -> Category {
        Category {
            id: 1,
            title: "Laptops".into(),
            description: String::new(),
            parent: None,
            slug: "laptops".into(),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn product() -> Product {
        Product {
            id: 10,
            name: "Workstation".into(),
            description: String::new(),
            price: Money::from_cents(250099),
            quantity: 3,
            status: ProductStatus::Active,
            category: 1,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn discount(id: i64, discount_type: DiscountType, value: rust_decimal::Decimal) -> Discount {
        Discount {
            id,
            product: 10,
            discount_type,
            value,
            status: DiscountStatus::Active,
            expires_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_product_view_json() {
        let discounts = vec![discount(1, DiscountType::Percentage, dec!(20))];
        let view = ProductView::new(product(), category(), &discounts, now());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["price"], "2500.99");
        assert_eq!(json["discounted_price"], "2000.79");
        assert_eq!(json["category"]["title"], "Laptops");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_evaluation_view_flattens_discount() {
        let mut expired = discount(2, DiscountType::Fixed, dec!(200));
        expired.expires_at = Some(now() - Duration::minutes(1));

        let view = DiscountEvaluationView::new(expired, Money::from_cents(250099), now());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], 2);
        assert_eq!(json["discount_type"], "fixed");
        assert_eq!(json["applicable"], false);
        assert!(json["candidate_price"].is_null());
        assert_eq!(json["reason"], "expired");
    }

    #[test]
    fn test_apply_response_for_inapplicable_discount() {
        let view = ProductView::new(product(), category(), &[], now());
        let mut inactive = discount(3, DiscountType::Percentage, dec!(50));
        inactive.status = DiscountStatus::Inactive;

        let response = ApplyDiscountResponse::new(view, &inactive, now());
        assert!(!response.applicable);
        assert_eq!(response.discounted_price, Money::from_cents(250099));
    }

    #[test]
    fn test_apply_response_uses_the_applied_discount_only() {
        let attached = vec![discount(1, DiscountType::Percentage, dec!(50))];
        let view = ProductView::new(product(), category(), &attached, now());
        let applied = discount(2, DiscountType::Fixed, dec!(200));

        let response = ApplyDiscountResponse::new(view, &applied, now());
        assert!(response.applicable);
        assert_eq!(response.discounted_price, Money::from_cents(230099));
        assert_eq!(response.product.discounted_price, Money::from_cents(125050));
    }
}
