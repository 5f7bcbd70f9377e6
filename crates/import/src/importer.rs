use std::path::Path;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

use storefront_catalog::{CatalogDetails, Product};
use storefront_core::{DomainError, Entity, money};
use storefront_infra::CatalogStore;

use crate::error::ImportError;
use crate::spreadsheet::{ProductRow, SpreadsheetFormat};

/// Ledger description stamped on every imported stock movement.
const IMPORT_DESCRIPTION: &str = "Imported";

/// Outcome counters for one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Drives pre-parsed spreadsheet rows through the catalog store.
pub struct Importer<'a, S: CatalogStore> {
    store: &'a S,
}

impl<'a, S: CatalogStore> Importer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Import rows decoded from `path`. The extension is checked first; an
    /// unrecognized format aborts before any row is touched.
    pub fn import_file(
        &self,
        path: &Path,
        rows: impl IntoIterator<Item = ProductRow>,
    ) -> Result<ImportSummary, ImportError> {
        let format = SpreadsheetFormat::from_path(path)?;
        debug!(path = %path.display(), ?format, "starting product import");
        self.import_rows(rows)
    }

    /// Import already-validated rows (format checking skipped).
    pub fn import_rows(
        &self,
        rows: impl IntoIterator<Item = ProductRow>,
    ) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary::default();

        for row in rows {
            let Some(name) = row.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
            else {
                debug!("skipping row without a product name");
                summary.skipped += 1;
                continue;
            };

            match self.store.product_by_name(name)? {
                Some(existing) => {
                    if self.top_up_stock(existing, &row)? {
                        summary.updated += 1;
                    } else {
                        summary.skipped += 1;
                    }
                }
                None => {
                    self.create_product(name, &row)?;
                    summary.created += 1;
                }
            }
        }

        info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "product import finished"
        );
        Ok(summary)
    }

    /// Existing products only get their stock topped up: a positive quantity
    /// that differs from the current level is recorded as an adjustment, and
    /// nothing else on the product is touched.
    fn top_up_stock(&self, mut product: Product, row: &ProductRow) -> Result<bool, ImportError> {
        let qty = parse_quantity(row.qty.as_deref())?;
        if qty > 0 && qty != product.stock() {
            product.record_stock_adjustment(IMPORT_DESCRIPTION, qty, Utc::now())?;
            self.store.save_product(product)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn create_product(&self, name: &str, row: &ProductRow) -> Result<(), ImportError> {
        let category = self
            .store
            .find_or_create_category(row.category_name.as_deref().unwrap_or_default())?;

        let mut details = CatalogDetails::new(name, row.sku.clone().unwrap_or_default());
        details.description = row.description.clone().unwrap_or_default();
        details.short_description = row.short_description.clone().unwrap_or_default();
        details.weight = parse_amount_or_zero(row.weight.as_deref())?;
        details.category_id = Some(*category.id());

        let price = parse_amount_or_zero(row.price.as_deref())?;
        let mut saved = self.store.save_product(Product::simple(details, price))?;
        info!(product = %name, price = %price, "imported product");

        let qty = parse_quantity(row.qty.as_deref())?;
        if qty > 0 {
            saved.record_stock_adjustment(IMPORT_DESCRIPTION, qty, Utc::now())?;
            self.store.save_product(saved)?;
        }
        Ok(())
    }
}

/// An absent cell means zero; a present cell must parse exactly.
fn parse_amount_or_zero(cell: Option<&str>) -> Result<Decimal, DomainError> {
    match cell {
        Some(raw) if !raw.trim().is_empty() => money::parse_amount(raw),
        _ => Ok(Decimal::ZERO),
    }
}

fn parse_quantity(cell: Option<&str>) -> Result<i64, DomainError> {
    match cell {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::malformed_number(raw.trim().to_string())),
        _ => Ok(0),
    }
}
