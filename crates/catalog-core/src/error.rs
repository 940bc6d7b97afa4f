//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - What clients see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → {"error": "..."}       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing itself never fails: an inapplicable discount is filtered out and
//! an unrecognized discount type is a no-op. These errors come from input
//! validation and catalog rules only.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Catalog rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Category would become its own ancestor.
    ///
    /// ## When This Occurs
    /// - `parent = self`
    /// - `parent` is one of the category's own descendants (A → B → A)
    #[error("Category {category_id} cannot be nested under {parent_id}: this would create a cycle")]
    CategoryCycle { category_id: i64, parent_id: i64 },

    /// The new parent's ancestor chain is already at the depth limit.
    #[error("Categories cannot be nested more than {max} levels deep")]
    TooDeep { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when client input doesn't meet requirements.
/// Used for early validation before anything touches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("Ensure {field} is greater than or equal to 0.")]
    Negative { field: String },

    /// Decimal value has too many fractional digits.
    #[error("Ensure that there are no more than {places} decimal places in {field}.")]
    TooPrecise { field: String, places: u32 },

    /// Decimal value has too many digits overall.
    #[error("Ensure that there are no more than {digits} digits in total in {field}.")]
    TooManyDigits { field: String, digits: u32 },

    /// Invalid format (e.g., unparseable number, bad slug).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A referenced record does not exist.
    #[error("Invalid {field} \"{id}\" - object does not exist.")]
    UnknownReference { field: String, id: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CategoryCycle {
            category_id: 3,
            parent_id: 7,
        };
        assert_eq!(
            err.to_string(),
            "Category 3 cannot be nested under 7: this would create a cycle"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "title".to_string(),
        };
        assert_eq!(err.to_string(), "title is required");

        let err = ValidationError::Negative {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "Ensure price is greater than or equal to 0.");

        let err = ValidationError::UnknownReference {
            field: "category".to_string(),
            id: 42,
        };
        assert_eq!(err.to_string(), "Invalid category \"42\" - object does not exist.");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
