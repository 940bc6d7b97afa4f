//! # catalog-core: Pure Business Logic for the Catalog Service
//!
//! This crate is the **heart** of the catalog service. It contains the
//! pricing rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Service Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    /categories/  /products/  /discounts/  apply-discount        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │ Category  │  │   Money   │  │ evaluate  │  │   rules   │  │   │
//! │  │   │ Product   │  │           │  │ select    │  │  checks   │  │   │
//! │  │   │ Discount  │  │           │  │ _best     │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO SYSTEM CLOCK • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  catalog-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, Discount)
//! - [`money`] - Money type with integer cents (no floating point!)
//! - [`pricing`] - Discount evaluator and best-discount selector
//! - [`clock`] - Injected time source for expiry checks
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::money::Money;
//!
//! let price = Money::from_cents(250099); // $2500.99
//! let half = price.multiply_ratio(rust_decimal::Decimal::new(5, 1));
//!
//! // 1250.495 rounds half-to-even
//! assert_eq!(half.cents(), 125050);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use pricing::{best_discount, evaluate, select_best, Evaluation, Inapplicable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a category title or product name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of a category slug.
pub const MAX_SLUG_LENGTH: usize = 100;

/// Total digits allowed in a price or discount value (99999999.99 at most).
pub const MAX_AMOUNT_DIGITS: u32 = 10;

/// Most ancestors a category may have.
pub const MAX_CATEGORY_DEPTH: usize = 256;
