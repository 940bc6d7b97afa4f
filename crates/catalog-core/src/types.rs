//! # Domain Types
//!
//! Core domain types used throughout the catalog service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │ 1 │    Product      │ * │    Discount     │       │
//! │  │  ─────────────  │──►│  ─────────────  │◄─►│  ─────────────  │       │
//! │  │  id             │ * │  id             │ * │  id             │       │
//! │  │  title (unique) │   │  name           │   │  product (owner)│       │
//! │  │  parent ──┐     │   │  price (Money)  │   │  discount_type  │       │
//! │  │  slug     │     │   │  quantity       │   │  value          │       │
//! │  └───────────┼─────┘   │  status         │   │  status         │       │
//! │        ▲     │         │  category       │   │  expires_at     │       │
//! │        └─────┘         └─────────────────┘   └─────────────────┘       │
//! │      (tree)                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A discount has one owning product but can be attached to more products;
//! the store keeps that many-to-many association.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A node in the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,

    /// Display title, unique across the catalog.
    pub title: String,

    pub description: String,

    /// Parent category id; `None` for a root.
    pub parent: Option<i64>,

    /// URL-safe identifier derived from the title.
    pub slug: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: Option<i64>,
    /// Derived from `title` when absent.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Partial update of a category. Absent fields are left untouched.
///
/// `parent` distinguishes "not sent" (`None`) from "set to null"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent: Option<Option<i64>>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A category together with its full subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub subcategories: Vec<CategoryNode>,
}

/// Builds one subtree per category (every category is listed, each with its
/// own nested children), ordered by id.
///
/// A parent link that loops back onto the current branch is cut rather than
/// followed.
pub fn build_category_forest(categories: &[Category]) -> Vec<CategoryNode> {
    let mut children: HashMap<i64, Vec<&Category>> = HashMap::new();
    for category in categories {
        if let Some(parent) = category.parent {
            children.entry(parent).or_default().push(category);
        }
    }
    for list in children.values_mut() {
        list.sort_by_key(|c| c.id);
    }

    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by_key(|c| c.id);

    ordered
        .into_iter()
        .map(|category| {
            let mut branch = HashSet::new();
            build_node(category, &children, &mut branch)
        })
        .collect()
}

fn build_node(
    category: &Category,
    children: &HashMap<i64, Vec<&Category>>,
    branch: &mut HashSet<i64>,
) -> CategoryNode {
    branch.insert(category.id);
    let mut subcategories = Vec::new();
    if let Some(kids) = children.get(&category.id) {
        for kid in kids {
            if branch.contains(&kid.id) {
                continue;
            }
            subcategories.push(build_node(kid, children, branch));
        }
    }
    branch.remove(&category.id);

    CategoryNode {
        category: category.clone(),
        subcategories,
    }
}

// =============================================================================
// Product Status
// =============================================================================

/// Availability of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    OutOfStock,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::OutOfStock => "out-of-stock",
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,

    pub name: String,

    pub description: String,

    /// Base price before any discount.
    #[ts(type = "string")]
    pub price: Money,

    /// Units in stock, never negative.
    pub quantity: i64,

    pub status: ProductStatus,

    /// Owning category id.
    pub category: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

fn default_quantity() -> i64 {
    1
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub status: ProductStatus,
    pub category: i64,
}

/// Partial update of a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub category: Option<i64>,
}

impl ProductUpdate {
    /// Applies the present fields onto a copy of `product`.
    pub fn apply_to(&self, product: &Product) -> Product {
        let mut updated = product.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(price) = self.price {
            updated.price = price;
        }
        if let Some(quantity) = self.quantity {
            updated.quantity = quantity;
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(category) = self.category {
            updated.category = category;
        }
        updated
    }
}

// =============================================================================
// Discount Type
// =============================================================================

/// How a discount's `value` is interpreted.
///
/// Rows written by older clients may carry a type this build does not know.
/// Those load as [`DiscountType::Unrecognized`] and price as a no-op instead
/// of failing the whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiscountType {
    /// `value` is a percentage of the price (20 = 20% off).
    Percentage,
    /// `value` is an absolute amount taken off the price.
    Fixed,
    Unrecognized(String),
}

impl DiscountType {
    pub fn as_str(&self) -> &str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
            DiscountType::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DiscountType::Unrecognized(_))
    }
}

impl From<String> for DiscountType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "percentage" => DiscountType::Percentage,
            "fixed" => DiscountType::Fixed,
            _ => DiscountType::Unrecognized(raw),
        }
    }
}

impl From<&str> for DiscountType {
    fn from(raw: &str) -> Self {
        DiscountType::from(raw.to_string())
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DiscountType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DiscountType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(DiscountType::from)
    }
}

// =============================================================================
// Discount Status
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DiscountStatus {
    #[default]
    Active,
    Inactive,
}

// =============================================================================
// Discount
// =============================================================================

/// A price reduction that can apply to one or more products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount {
    pub id: i64,

    /// Product the discount was created for.
    pub product: i64,

    #[ts(type = "string")]
    pub discount_type: DiscountType,

    /// Percentage points or an absolute amount, depending on `discount_type`.
    #[ts(type = "string")]
    pub value: Decimal,

    pub status: DiscountStatus,

    /// The discount stops applying after this instant.
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a discount.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDiscount {
    pub product: i64,
    pub discount_type: DiscountType,
    pub value: Decimal,
    #[serde(default)]
    pub status: DiscountStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update of a discount. The owning product never changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscountUpdate {
    #[serde(default)]
    pub discount_type: Option<DiscountType>,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub status: Option<DiscountStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl DiscountUpdate {
    /// Applies the present fields onto a copy of `discount`.
    pub fn apply_to(&self, discount: &Discount) -> Discount {
        let mut updated = discount.clone();
        if let Some(discount_type) = &self.discount_type {
            updated.discount_type = discount_type.clone();
        }
        if let Some(value) = self.value {
            updated.value = value;
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(expires_at) = self.expires_at {
            updated.expires_at = expires_at;
        }
        updated
    }
}

/// Treats an explicit JSON `null` as `Some(None)`; a missing field stays
/// `None` through `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, parent: Option<i64>) -> Category {
        let now = Utc::now();
        Category {
            id,
            title: format!("Category {}", id),
            description: String::new(),
            parent,
            slug: format!("category-{}", id),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_status_serde() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::OutOfStock).unwrap(),
            "\"out-of-stock\""
        );
        let status: ProductStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(status, ProductStatus::Inactive);
        assert_eq!(ProductStatus::default(), ProductStatus::Active);
    }

    #[test]
    fn test_discount_type_keeps_unknown_values() {
        assert_eq!(DiscountType::from("percentage"), DiscountType::Percentage);
        assert_eq!(DiscountType::from("fixed"), DiscountType::Fixed);

        let odd = DiscountType::from("bogo");
        assert_eq!(odd, DiscountType::Unrecognized("bogo".to_string()));
        assert!(!odd.is_recognized());
        assert_eq!(serde_json::to_string(&odd).unwrap(), "\"bogo\"");
    }

    #[test]
    fn test_new_product_defaults() {
        let input: NewProduct =
            serde_json::from_str(r#"{"name": "Desk", "price": "99.50", "category": 1}"#).unwrap();
        assert_eq!(input.quantity, 1);
        assert_eq!(input.status, ProductStatus::Active);
        assert_eq!(input.description, "");
        assert_eq!(input.price.cents(), 9950);
    }

    #[test]
    fn test_category_update_distinguishes_null_parent() {
        let absent: CategoryUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.parent, None);

        let cleared: CategoryUpdate = serde_json::from_str(r#"{"parent": null}"#).unwrap();
        assert_eq!(cleared.parent, Some(None));

        let moved: CategoryUpdate = serde_json::from_str(r#"{"parent": 4}"#).unwrap();
        assert_eq!(moved.parent, Some(Some(4)));
    }

    #[test]
    fn test_forest_nests_every_category() {
        let categories = vec![
            category(1, None),
            category(2, Some(1)),
            category(3, Some(2)),
            category(4, Some(1)),
        ];

        let forest = build_category_forest(&categories);
        assert_eq!(forest.len(), 4);

        let root = &forest[0];
        assert_eq!(root.category.id, 1);
        assert_eq!(root.subcategories.len(), 2);
        assert_eq!(root.subcategories[0].category.id, 2);
        assert_eq!(root.subcategories[0].subcategories[0].category.id, 3);
        assert_eq!(root.subcategories[1].category.id, 4);

        let leaf = &forest[2];
        assert!(leaf.subcategories.is_empty());
    }

    #[test]
    fn test_forest_cuts_cycles() {
        let categories = vec![category(1, Some(2)), category(2, Some(1))];
        let forest = build_category_forest(&categories);

        assert_eq!(forest[0].subcategories.len(), 1);
        assert!(forest[0].subcategories[0].subcategories.is_empty());
    }

    #[test]
    fn test_node_serializes_flat_with_subcategories() {
        let forest = build_category_forest(&[category(1, None)]);
        let json = serde_json::to_value(&forest[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["slug"], "category-1");
        assert!(json["subcategories"].as_array().unwrap().is_empty());
    }
}
