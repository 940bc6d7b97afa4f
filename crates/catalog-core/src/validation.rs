//! # Validation Module
//!
//! Input validation for catalog writes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum + serde)                               │
//! │  ├── Malformed JSON, wrong field types                                 │
//! │  └── Money with more than two decimals                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required / length / non-negative checks                           │
//! │  ├── Slug derivation                                                   │
//! │  └── Category parent cycles                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (title, slug)                                              │
//! │  ├── CHECK (price, quantity)                                           │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{slugify, validate_quantity};
//!
//! assert_eq!(slugify("Home & Garden"), "home-garden");
//! assert!(validate_quantity(-1).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, MONEY_SCALE};
use crate::types::{
    Discount, DiscountType, NewCategory, NewDiscount, NewProduct, Product,
};
use crate::{MAX_AMOUNT_DIGITS, MAX_CATEGORY_DEPTH, MAX_NAME_LENGTH, MAX_SLUG_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, bounded text field and returns it trimmed.
fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a category title.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_title;
///
/// assert_eq!(validate_title("  Electronics ").unwrap(), "Electronics");
/// assert!(validate_title("").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<String> {
    validate_required_text("title", title, MAX_NAME_LENGTH)
}

/// Validates a product name.
pub fn validate_name(name: &str) -> ValidationResult<String> {
    validate_required_text("name", name, MAX_NAME_LENGTH)
}

/// Derives a URL slug from free text.
///
/// Lowercases, keeps ASCII letters, digits and underscores, joins words with
/// single hyphens and truncates to [`MAX_SLUG_LENGTH`].
///
/// ## Example
/// ```rust
/// use catalog_core::validation::slugify;
///
/// assert_eq!(slugify("  Laptops & Notebooks "), "laptops-notebooks");
/// assert_eq!(slugify("Men's Shoes"), "mens-shoes");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    slug.truncate(MAX_SLUG_LENGTH);
    slug.trim_end_matches('-').to_string()
}

/// Validates an explicitly supplied slug.
pub fn validate_slug(slug: &str) -> ValidationResult<String> {
    let slug = validate_required_text("slug", slug, MAX_SLUG_LENGTH)?;

    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(slug)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - At most 99999999.99
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    check_digits("price", price.to_decimal())
}

/// Largest amount with [`MAX_AMOUNT_DIGITS`] digits, two of them fractional.
fn max_amount() -> Decimal {
    Decimal::new(10i64.pow(MAX_AMOUNT_DIGITS) - 1, MONEY_SCALE)
}

fn check_digits(field: &str, value: Decimal) -> ValidationResult<()> {
    if value > max_amount() {
        return Err(ValidationError::TooManyDigits {
            field: field.to_string(),
            digits: MAX_AMOUNT_DIGITS,
        });
    }

    Ok(())
}

/// Validates a stock quantity. Zero is allowed.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount value.
///
/// ## Rules
/// - Must be non-negative
/// - At most two decimal places and 99999999.99 overall
/// - Percentages above 100 are accepted (pricing clamps at zero)
pub fn validate_discount_value(value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: "value".to_string(),
        });
    }

    check_digits("value", value)?;

    if value.round_dp(MONEY_SCALE) != value {
        return Err(ValidationError::TooPrecise {
            field: "value".to_string(),
            places: MONEY_SCALE,
        });
    }

    Ok(())
}

/// Only known discount types can be written.
pub fn validate_discount_type(discount_type: &DiscountType) -> ValidationResult<()> {
    if !discount_type.is_recognized() {
        return Err(ValidationError::NotAllowed {
            field: "discount_type".to_string(),
            allowed: vec!["percentage".to_string(), "fixed".to_string()],
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a new category and fills in the derived slug.
pub fn validate_new_category(input: NewCategory) -> ValidationResult<NewCategory> {
    let title = validate_title(&input.title)?;
    let slug = match input.slug.as_deref() {
        Some(slug) => validate_slug(slug)?,
        None => derive_slug(&title)?,
    };

    Ok(NewCategory {
        title,
        description: input.description,
        parent: input.parent,
        slug: Some(slug),
    })
}

/// Slug for a title, rejecting titles with nothing sluggable in them.
pub fn derive_slug(title: &str) -> ValidationResult<String> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "title must contain at least one letter or digit".to_string(),
        });
    }
    Ok(slug)
}

/// Rejects a parent assignment that would put `category_id` inside its own
/// subtree.
///
/// `parent_chain` is the proposed parent followed by its ancestors, nearest
/// first. A chain longer than [`MAX_CATEGORY_DEPTH`] was cut short by the
/// walk and is rejected as well.
pub fn check_parent(category_id: i64, parent_id: i64, parent_chain: &[i64]) -> CoreResult<()> {
    if parent_id == category_id || parent_chain.contains(&category_id) {
        return Err(CoreError::CategoryCycle {
            category_id,
            parent_id,
        });
    }
    if parent_chain.len() > MAX_CATEGORY_DEPTH {
        return Err(CoreError::TooDeep {
            max: MAX_CATEGORY_DEPTH,
        });
    }

    Ok(())
}

/// Validates a new product and returns it with trimmed text.
pub fn validate_new_product(input: NewProduct) -> ValidationResult<NewProduct> {
    let name = validate_name(&input.name)?;
    validate_price(input.price)?;
    validate_quantity(input.quantity)?;

    Ok(NewProduct { name, ..input })
}

/// Validates a product after a partial update has been applied.
pub fn validate_product(product: &Product) -> ValidationResult<Product> {
    let name = validate_name(&product.name)?;
    validate_price(product.price)?;
    validate_quantity(product.quantity)?;

    Ok(Product {
        name,
        ..product.clone()
    })
}

pub fn validate_new_discount(input: &NewDiscount) -> ValidationResult<()> {
    validate_discount_type(&input.discount_type)?;
    validate_discount_value(input.value)
}

/// Validates a discount after a partial update has been applied.
pub fn validate_discount(discount: &Discount) -> ValidationResult<()> {
    validate_discount_type(&discount.discount_type)?;
    validate_discount_value(discount.value)
}

// =============================================================================
// Unit Tests
// =============================================================================
