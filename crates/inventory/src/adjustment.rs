use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{AdjustmentId, DomainError, DomainResult};

/// A single stock movement, with the reason it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevelAdjustment {
    pub id: AdjustmentId,
    pub description: String,
    /// Signed stock delta. Positive for goods in, negative for goods out.
    pub adjustment: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Append-only ledger of stock movements for one stocked item.
///
/// The current stock level is always derived by summing the ledger; there is
/// no separately maintained counter to drift out of sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLedger {
    entries: Vec<StockLevelAdjustment>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[StockLevelAdjustment] {
        &self.entries
    }

    /// Current stock level: the sum of all recorded adjustments.
    pub fn total(&self) -> i64 {
        self.entries.iter().map(|e| e.adjustment).sum()
    }

    /// Record a stock movement.
    ///
    /// Rejects zero deltas and movements that would take the level negative.
    pub fn record(
        &mut self,
        description: impl Into<String>,
        adjustment: i64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if adjustment == 0 {
            return Err(DomainError::validation("adjustment cannot be zero"));
        }
        if self.total() + adjustment < 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }
        self.entries.push(StockLevelAdjustment {
            id: AdjustmentId::new(),
            description: description.into(),
            adjustment,
            occurred_at,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_adjustments() {
        let mut ledger = StockLedger::new();
        ledger.record("delivery", 10, Utc::now()).unwrap();
        ledger.record("sale", -3, Utc::now()).unwrap();
        ledger.record("correction", 1, Utc::now()).unwrap();
        assert_eq!(ledger.total(), 8);
        assert_eq!(ledger.entries().len(), 3);
    }

    #[test]
    fn rejects_zero_delta() {
        let mut ledger = StockLedger::new();
        let err = ledger.record("noop", 0, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_movement_below_zero() {
        let mut ledger = StockLedger::new();
        ledger.record("delivery", 5, Utc::now()).unwrap();
        let err = ledger.record("sale", -6, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(ledger.total(), 5);
    }

    #[test]
    fn keeps_the_reason_with_the_movement() {
        let mut ledger = StockLedger::new();
        ledger.record("Imported", 25, Utc::now()).unwrap();
        let entry = &ledger.entries()[0];
        assert_eq!(entry.description, "Imported");
        assert_eq!(entry.adjustment, 25);
    }
}
