use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, TaxRateId};

/// A named tax rate, expressed as a percentage (`20` means 20%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate {
    id: TaxRateId,
    name: String,
    rate: Decimal,
}

impl TaxRate {
    /// Create a tax rate.
    ///
    /// Negative rates are rejected here so pricing arithmetic downstream never
    /// sees a divisor at or below zero.
    pub fn new(name: impl Into<String>, rate: Decimal) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("tax rate name cannot be empty"));
        }
        if rate < Decimal::ZERO {
            return Err(DomainError::validation("tax rate cannot be negative"));
        }
        Ok(Self {
            id: TaxRateId::new(),
            name,
            rate,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

impl Entity for TaxRate {
    type Id = TaxRateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_and_positive_rates() {
        assert!(TaxRate::new("Zero rated", Decimal::ZERO).is_ok());
        assert!(TaxRate::new("VAT", Decimal::from(20)).is_ok());
    }

    #[test]
    fn rejects_negative_rate() {
        let err = TaxRate::new("Nonsense", Decimal::from(-5)).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("negative")),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_name() {
        let err = TaxRate::new("   ", Decimal::from(20)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
