//! Basket pricing.
//!
//! Pricing is a pure function over the basket and the catalog: no I/O and no
//! mutation, so the checkout flow can price a basket any number of times and
//! get the same answer.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use forno_core::ProductId;

use crate::models::MenuItem;

/// Total price of a basket against a catalog.
///
/// Each basket entry is priced by the first catalog item with a matching
/// product ID. Entries with no match contribute zero and are otherwise
/// ignored; they stay in the basket untouched.
#[must_use]
pub fn basket_total(basket: &[ProductId], catalog: &[MenuItem]) -> Decimal {
    basket
        .iter()
        .map(|product_id| {
            catalog
                .iter()
                .find(|item| item.product_id == *product_id)
                .map_or(Decimal::ZERO, |item| item.price)
        })
        .sum()
}

/// Convert a major-unit amount to integer minor units (e.g., agorot).
///
/// Scales by 100 and truncates toward zero. Returns `None` when the scaled
/// amount overflows or does not fit an `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount.checked_mul(Decimal::ONE_HUNDRED)?.trunc().to_i64()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Vec<MenuItem> {
        vec![
            MenuItem::new(ProductId::new(1), "Margherita".to_string(), Decimal::new(100, 1)),
            MenuItem::new(ProductId::new(2), "Napoletana".to_string(), Decimal::new(465, 1)),
        ]
    }

    #[test]
    fn test_empty_basket_is_zero() {
        assert_eq!(basket_total(&[], &catalog()), Decimal::ZERO);
    }

    #[test]
    fn test_empty_catalog_is_zero() {
        let basket = vec![ProductId::new(1), ProductId::new(2)];
        assert_eq!(basket_total(&basket, &[]), Decimal::ZERO);
    }

    #[test]
    fn test_duplicates_count_twice() {
        let basket = vec![ProductId::new(1), ProductId::new(1)];
        assert_eq!(basket_total(&basket, &catalog()), Decimal::new(200, 1));
    }

    #[test]
    fn test_unknown_ids_price_as_zero() {
        let basket = vec![ProductId::new(1), ProductId::new(99)];
        assert_eq!(basket_total(&basket, &catalog()), Decimal::new(100, 1));
    }

    #[test]
    fn test_total_is_order_independent() {
        let forward = vec![ProductId::new(1), ProductId::new(2), ProductId::new(1)];
        let shuffled = vec![ProductId::new(2), ProductId::new(1), ProductId::new(1)];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            basket_total(&forward, &catalog()),
            basket_total(&shuffled, &catalog())
        );
        assert_eq!(
            basket_total(&forward, &catalog()),
            basket_total(&reversed, &catalog())
        );
    }

    #[test]
    fn test_first_catalog_match_wins() {
        let mut shadowed = catalog();
        shadowed.push(MenuItem::new(
            ProductId::new(1),
            "Margherita (old price)".to_string(),
            Decimal::new(9990, 2),
        ));

        let basket = vec![ProductId::new(1)];
        assert_eq!(basket_total(&basket, &shadowed), Decimal::new(100, 1));
    }

    #[test]
    fn test_to_minor_units_scales_by_hundred() {
        assert_eq!(to_minor_units(Decimal::new(200, 1)), Some(2000));
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
        assert_eq!(to_minor_units(Decimal::new(4650, 2)), Some(4650));
    }

    #[test]
    fn test_to_minor_units_truncates_fractional_minor_units() {
        // 10.505 -> 1050.5 -> 1050
        assert_eq!(to_minor_units(Decimal::new(10505, 3)), Some(1050));
    }

    #[test]
    fn test_to_minor_units_overflow_is_none() {
        assert_eq!(to_minor_units(Decimal::MAX), None);
    }
}
