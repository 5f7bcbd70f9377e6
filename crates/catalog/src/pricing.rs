//! Tax-inclusive price computation and reconciliation.
//!
//! Storefront operators think in tax-inclusive prices; the catalog persists
//! tax-exclusive ones. These functions derive one from the other in exact
//! decimal arithmetic and decide, at cent precision, whether an operator's
//! entry actually changes anything. Intermediate results are never rounded;
//! rounding happens only at the 2-decimal comparison/display boundary.

use rust_decimal::Decimal;

use storefront_core::money;

/// Tax-inclusive price for a base price at the given percentage rate.
///
/// An absent tax rate is rate zero, which makes this the identity.
pub fn price_including_tax(base_price: Decimal, tax_rate: Decimal) -> Decimal {
    base_price + base_price * tax_rate / Decimal::ONE_HUNDRED
}

/// The price a customer would see: the operator's pending entry when present,
/// the calculated tax-inclusive price otherwise.
pub fn effective_price_including_tax(
    base_price: Decimal,
    tax_rate: Decimal,
    entered: Option<Decimal>,
) -> Decimal {
    entered.unwrap_or_else(|| price_including_tax(base_price, tax_rate))
}

/// Does the operator's entry differ from the calculated tax-inclusive price?
///
/// Compared at cent precision so higher-precision storage never reports a
/// spurious mismatch. An absent entry never counts as changed.
pub fn override_changed(base_price: Decimal, tax_rate: Decimal, entered: Option<Decimal>) -> bool {
    match entered {
        Some(entered) => {
            money::round_display(entered)
                != money::round_display(price_including_tax(base_price, tax_rate))
        }
        None => false,
    }
}

/// The base price to commit given an operator entry.
///
/// When the entry differs from the calculated value, back-derive the
/// tax-exclusive base at full precision; otherwise the committed base price is
/// left untouched. The divisor `1 + rate/100` is strictly positive because
/// negative rates are rejected at [`crate::TaxRate`] construction.
pub fn reconcile(base_price: Decimal, tax_rate: Decimal, entered: Option<Decimal>) -> Decimal {
    match entered {
        Some(entered) if override_changed(base_price, tax_rate, Some(entered)) => {
            let tax_multiplier = Decimal::ONE + tax_rate / Decimal::ONE_HUNDRED;
            entered / tax_multiplier
        }
        _ => base_price,
    }
}

/// Pricing contract shared by everything that can be sold.
///
/// A simple product answers from its own fields; a product with variants
/// answers entirely from its default variant. Which of the two applies is
/// fixed at construction, not re-decided per call.
pub trait Priceable {
    /// Committed tax-exclusive price.
    fn price(&self) -> Decimal;

    /// Tax percentage applied on top of the price. Absent rate is zero.
    fn tax_rate_percent(&self) -> Decimal;

    /// Operator-entered tax-inclusive price awaiting reconciliation.
    fn pending_price_including_tax(&self) -> Option<Decimal>;

    /// Tax-inclusive price derived from the committed base price.
    fn calculated_price_including_tax(&self) -> Decimal {
        price_including_tax(self.price(), self.tax_rate_percent())
    }

    /// Tax-inclusive price honoring a pending operator entry.
    fn price_including_tax(&self) -> Decimal {
        effective_price_including_tax(
            self.price(),
            self.tax_rate_percent(),
            self.pending_price_including_tax(),
        )
    }

    /// Whether a pending operator entry disagrees with the calculated price.
    fn price_including_tax_changed(&self) -> bool {
        override_changed(
            self.price(),
            self.tax_rate_percent(),
            self.pending_price_including_tax(),
        )
    }
}
