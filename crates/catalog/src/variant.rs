use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, VariantId, money};
use storefront_inventory::{StockLedger, StockLevelAdjustment};

use crate::pricing::{self, Priceable};
use crate::tax_rate::TaxRate;

/// A sellable variant of a product (a size, a colour, a bundle).
///
/// Variants carry their own price, tax rate and stock ledger. When a variant
/// is the product's default, it is the sole source of truth for the parent's
/// pricing and stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    id: VariantId,
    name: String,
    sku: String,
    price: Decimal,
    cost_price: Option<Decimal>,
    tax_rate: Option<TaxRate>,
    /// Operator-entered tax-inclusive price. Lives only until the next save
    /// cycle reconciles it; never serialized.
    #[serde(skip)]
    pending_price_including_tax: Option<Decimal>,
    stock_control: bool,
    ledger: StockLedger,
}

impl Variant {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        price: Decimal,
    ) -> DomainResult<Self> {
        let variant = Self {
            id: VariantId::new(),
            name: name.into(),
            sku: sku.into(),
            price,
            cost_price: None,
            tax_rate: None,
            pending_price_including_tax: None,
            stock_control: true,
            ledger: StockLedger::new(),
        };
        variant.validate()?;
        Ok(variant)
    }

    pub fn with_tax_rate(mut self, tax_rate: TaxRate) -> Self {
        self.tax_rate = Some(tax_rate);
        self
    }

    pub fn with_cost_price(mut self, cost_price: Decimal) -> Self {
        self.cost_price = Some(cost_price);
        self
    }

    pub fn without_stock_control(mut self) -> Self {
        self.stock_control = false;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("variant name cannot be empty"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("variant SKU cannot be empty"));
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::validation("variant price cannot be negative"));
        }
        if matches!(self.cost_price, Some(p) if p < Decimal::ZERO) {
            return Err(DomainError::validation(
                "variant cost price cannot be negative",
            ));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn cost_price(&self) -> Option<Decimal> {
        self.cost_price
    }

    pub fn tax_rate(&self) -> Option<&TaxRate> {
        self.tax_rate.as_ref()
    }

    pub fn stock_control(&self) -> bool {
        self.stock_control
    }

    /// Stage an operator-entered tax-inclusive price for the next save cycle.
    /// Passing `None` clears a previously staged entry.
    pub fn set_price_including_tax(&mut self, entered: Option<Decimal>) {
        self.pending_price_including_tax = entered;
    }

    /// Consume the pending entry and, when it changed anything, rewrite the
    /// committed price. Returns whether the price moved. The entry is absent
    /// afterwards either way, so calling this twice is a no-op the second
    /// time.
    pub fn reconcile_before_save(&mut self) -> bool {
        let entered = self.pending_price_including_tax.take();
        let rate = self.tax_rate_percent();
        if pricing::override_changed(self.price, rate, entered) {
            self.price = pricing::reconcile(self.price, rate, entered);
            true
        } else {
            false
        }
    }

    /// Clamp the committed price to the storage precision.
    pub fn normalize_for_storage(&mut self) {
        self.price = money::quantize_stored(self.price);
    }

    pub fn stock(&self) -> i64 {
        self.ledger.total()
    }

    pub fn in_stock(&self) -> bool {
        if self.stock_control { self.stock() > 0 } else { true }
    }

    pub fn stock_adjustments(&self) -> &[StockLevelAdjustment] {
        self.ledger.entries()
    }

    pub fn record_stock_adjustment(
        &mut self,
        description: impl Into<String>,
        adjustment: i64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ledger.record(description, adjustment, occurred_at)?;
        Ok(())
    }
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Priceable for Variant {
    fn price(&self) -> Decimal {
        self.price
    }

    fn tax_rate_percent(&self) -> Decimal {
        self.tax_rate.as_ref().map(TaxRate::rate).unwrap_or(Decimal::ZERO)
    }

    fn pending_price_including_tax(&self) -> Option<Decimal> {
        self.pending_price_including_tax
    }
}
