//! # Pricing
//!
//! Discount evaluation and best-discount selection.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  product.price ─┐                                                       │
//! │                 ▼                                                       │
//! │  discounts ──► evaluate(d, price, now) ──► Applicable(candidate)        │
//! │                 │                     └──► Inapplicable(reason)  ✗      │
//! │                 ▼                                                       │
//! │            select_best: min by (candidate, id)                          │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            discounted_price (or product.price when nothing applies)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Candidates are computed in exact decimal arithmetic, clamped at zero and
//! rounded once to cents (half-to-even). Only one discount ever applies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

use crate::money::Money;
use crate::types::{Discount, DiscountStatus, DiscountType, Product};

// =============================================================================
// Evaluation
// =============================================================================

/// Why a discount does not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inapplicable {
    /// Status is not `active`.
    Inactive,
    /// `expires_at` lies strictly before the evaluation instant.
    Expired,
}

impl fmt::Display for Inapplicable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inapplicable::Inactive => f.write_str("discount is inactive"),
            Inapplicable::Expired => f.write_str("discount has expired"),
        }
    }
}

/// Outcome of evaluating one discount against one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// The discount applies; the candidate price is never negative.
    Applicable(Money),
    Inapplicable(Inapplicable),
}

impl Evaluation {
    pub fn is_applicable(&self) -> bool {
        matches!(self, Evaluation::Applicable(_))
    }

    /// The candidate price, if the discount applies.
    pub fn candidate(&self) -> Option<Money> {
        match self {
            Evaluation::Applicable(price) => Some(*price),
            Evaluation::Inapplicable(_) => None,
        }
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// Computes the effect of a single discount on `base_price` at instant `now`.
///
/// ## Rules
/// - Inactive discounts never apply.
/// - A discount expiring exactly at `now` still applies.
/// - `fixed`: `max(0, price - value)`
/// - `percentage`: `max(0, price - price * value / 100)`
/// - Unrecognized types apply without changing the price.
///
/// ## Example
/// ```rust
/// use catalog_core::money::Money;
/// use catalog_core::pricing::{evaluate, Evaluation};
/// use catalog_core::types::{Discount, DiscountStatus, DiscountType};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let now = Utc::now();
/// let discount = Discount {
///     id: 1,
///     product: 1,
///     discount_type: DiscountType::Percentage,
///     value: Decimal::from(20),
///     status: DiscountStatus::Active,
///     expires_at: None,
///     created_at: now,
///     updated_at: now,
/// };
///
/// let result = evaluate(&discount, Money::from_cents(250099), now);
/// assert_eq!(result, Evaluation::Applicable(Money::from_cents(200079)));
/// ```
pub fn evaluate(discount: &Discount, base_price: Money, now: DateTime<Utc>) -> Evaluation {
    if discount.status != DiscountStatus::Active {
        return Evaluation::Inapplicable(Inapplicable::Inactive);
    }

    if let Some(expires_at) = discount.expires_at {
        if expires_at < now {
            return Evaluation::Inapplicable(Inapplicable::Expired);
        }
    }

    let price = base_price.to_decimal();
    // A reduction too large to represent takes the whole price.
    let candidate = match &discount.discount_type {
        DiscountType::Fixed => price.checked_sub(discount.value),
        DiscountType::Percentage => price
            .checked_mul(discount.value)
            .and_then(|off| off.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|off| price.checked_sub(off)),
        DiscountType::Unrecognized(_) => Some(price),
    }
    .unwrap_or(Decimal::ZERO);

    Evaluation::Applicable(Money::from_decimal_rounded(candidate.max(Decimal::ZERO)))
}

// =============================================================================
// Selector
// =============================================================================

/// Picks the applicable discount yielding the lowest price.
///
/// Ties on the (rounded) candidate go to the lowest discount id, so the
/// result does not depend on the order of `discounts`.
///
/// Returns `None` when no discount applies.
pub fn best_discount<'a>(
    product: &Product,
    discounts: &'a [Discount],
    now: DateTime<Utc>,
) -> Option<(&'a Discount, Money)> {
    discounts
        .iter()
        .filter_map(|d| evaluate(d, product.price, now).candidate().map(|price| (d, price)))
        .min_by_key(|(d, price)| (*price, d.id))
}

/// The price shown for `product`: the best applicable candidate, or the base
/// price when nothing applies.
pub fn select_best(product: &Product, discounts: &[Discount], now: DateTime<Utc>) -> Money {
    best_discount(product, discounts, now)
        .map(|(_, price)| price)
        .unwrap_or(product.price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    fn product(cents: i64) -> Product {
        Product {
            id: 1,
            name: "Laptop".to_string(),
            description: String::new(),
            price: Money::from_cents(cents),
            quantity: 5,
            status: ProductStatus::Active,
            category: 1,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn discount(id: i64, discount_type: DiscountType, value: Decimal) -> Discount {
        Discount {
            id,
            product: 1,
            discount_type,
            value,
            status: DiscountStatus::Active,
            expires_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_percentage_discount() {
        let d = discount(1, DiscountType::Percentage, dec!(20));
        assert_eq!(
            evaluate(&d, Money::from_cents(250099), now()),
            Evaluation::Applicable(Money::from_cents(200079))
        );
    }

    #[test]
    fn test_fixed_discount() {
        let d = discount(1, DiscountType::Fixed, dec!(200));
        assert_eq!(
            evaluate(&d, Money::from_cents(250099), now()),
            Evaluation::Applicable(Money::from_cents(230099))
        );
    }

    #[test]
    fn test_fixed_discount_clamps_to_zero() {
        let d = discount(1, DiscountType::Fixed, dec!(5000));
        assert_eq!(
            evaluate(&d, Money::from_cents(1999), now()),
            Evaluation::Applicable(Money::zero())
        );
    }

    #[test]
    fn test_percentage_over_hundred_clamps_to_zero() {
        let d = discount(1, DiscountType::Percentage, dec!(150));
        assert_eq!(
            evaluate(&d, Money::from_cents(1000), now()),
            Evaluation::Applicable(Money::zero())
        );
    }

    #[test]
    fn test_huge_percentage_clamps_instead_of_overflowing() {
        // price * value exceeds the Decimal range
        let price = Money::from_cents(9_999_999_999_999_999);
        let d = discount(1, DiscountType::Percentage, dec!(100000000000000000));
        assert_eq!(evaluate(&d, price, now()), Evaluation::Applicable(Money::zero()));

        let d = discount(2, DiscountType::Fixed, dec!(100000000000000000));
        assert_eq!(evaluate(&d, price, now()), Evaluation::Applicable(Money::zero()));

        let mut p = product(0);
        p.price = price;
        assert_eq!(select_best(&p, &[d], now()), Money::zero());
    }

    #[test]
    fn test_zero_value_is_applicable_noop() {
        let price = Money::from_cents(4321);
        for kind in [DiscountType::Percentage, DiscountType::Fixed] {
            let d = discount(1, kind, Decimal::ZERO);
            assert_eq!(evaluate(&d, price, now()), Evaluation::Applicable(price));
        }
    }

    #[test]
    fn test_unrecognized_type_is_inert() {
        let d = discount(1, DiscountType::from("bogo"), dec!(50));
        let price = Money::from_cents(1000);
        assert_eq!(evaluate(&d, price, now()), Evaluation::Applicable(price));
    }

    #[test]
    fn test_inactive_discount() {
        let mut d = discount(1, DiscountType::Fixed, dec!(1));
        d.status = DiscountStatus::Inactive;
        assert_eq!(
            evaluate(&d, Money::from_cents(1000), now()),
            Evaluation::Inapplicable(Inapplicable::Inactive)
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let mut d = discount(1, DiscountType::Fixed, dec!(1));

        d.expires_at = Some(now());
        assert!(evaluate(&d, Money::from_cents(1000), now()).is_applicable());

        d.expires_at = Some(now() - Duration::seconds(1));
        assert_eq!(
            evaluate(&d, Money::from_cents(1000), now()),
            Evaluation::Inapplicable(Inapplicable::Expired)
        );

        d.expires_at = Some(now() + Duration::days(7));
        assert!(evaluate(&d, Money::from_cents(1000), now()).is_applicable());
    }

    #[test]
    fn test_percentage_rounds_half_to_even() {
        // 0.25 * 0.5 = 0.125 off -> 0.125 remains -> 0.12
        let d = discount(1, DiscountType::Percentage, dec!(50));
        assert_eq!(
            evaluate(&d, Money::from_cents(25), now()),
            Evaluation::Applicable(Money::from_cents(12))
        );

        // 0.35 * 0.5 = 0.175 -> 0.18
        assert_eq!(
            evaluate(&d, Money::from_cents(35), now()),
            Evaluation::Applicable(Money::from_cents(18))
        );
    }

    #[test]
    fn test_select_best_picks_lowest_price() {
        let p = product(250099);
        let discounts = vec![
            discount(1, DiscountType::Fixed, dec!(200)),
            discount(2, DiscountType::Percentage, dec!(20)),
        ];

        assert_eq!(select_best(&p, &discounts, now()), Money::from_cents(200079));

        let (winner, _) = best_discount(&p, &discounts, now()).unwrap();
        assert_eq!(winner.id, 2);
    }

    #[test]
    fn test_select_best_without_discounts() {
        let p = product(250099);
        assert_eq!(select_best(&p, &[], now()), p.price);
        assert!(best_discount(&p, &[], now()).is_none());
    }

    #[test]
    fn test_select_best_ignores_inactive_and_expired() {
        let p = product(250099);

        let mut inactive = discount(1, DiscountType::Percentage, dec!(50));
        inactive.status = DiscountStatus::Inactive;

        let mut expired = discount(2, DiscountType::Fixed, dec!(100));
        expired.expires_at = Some(now() - Duration::days(1));

        assert_eq!(select_best(&p, &[inactive, expired], now()), p.price);
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        let p = product(10000);
        // 10% of 100.00 == 10.00 fixed
        let a = discount(7, DiscountType::Fixed, dec!(10));
        let b = discount(3, DiscountType::Percentage, dec!(10));

        let forward = [a.clone(), b.clone()];
        let backward = [b, a];

        for _ in 0..3 {
            assert_eq!(best_discount(&p, &forward, now()).unwrap().0.id, 3);
            assert_eq!(best_discount(&p, &backward, now()).unwrap().0.id, 3);
        }
    }

    #[test]
    fn test_tie_compares_rounded_candidates() {
        // 33.335 rounds to 33.34, same as a fixed 66.66 off 100.00
        let p = product(10000);
        let pct = discount(9, DiscountType::Percentage, dec!(66.665));
        let fixed = discount(4, DiscountType::Fixed, dec!(66.66));

        let both = [pct, fixed];
        let (winner, price) = best_discount(&p, &both, now()).unwrap();
        assert_eq!(price, Money::from_cents(3334));
        assert_eq!(winner.id, 4);
    }

    #[test]
    fn test_select_best_never_exceeds_price() {
        let p = product(9999);
        let values = [dec!(0), dec!(0.01), dec!(12.5), dec!(99.99), dec!(100), dec!(250)];

        for (i, value) in values.iter().enumerate() {
            for kind in [DiscountType::Percentage, DiscountType::Fixed] {
                let d = discount(i as i64 + 1, kind, *value);
                let price = select_best(&p, std::slice::from_ref(&d), now());
                assert!(price <= p.price);
                assert!(!price.is_negative());
            }
        }
    }

    #[test]
    fn test_select_best_is_idempotent() {
        let p = product(123456);
        let discounts = vec![
            discount(1, DiscountType::Percentage, dec!(15)),
            discount(2, DiscountType::Fixed, dec!(150)),
        ];
        let first = select_best(&p, &discounts, now());
        let second = select_best(&p, &discounts, now());
        assert_eq!(first, second);
    }
}
