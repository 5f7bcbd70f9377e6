use std::collections::HashMap;
use std::sync::RwLock;

use rust_decimal::Decimal;
use tracing::{debug, info};

use storefront_core::{DomainError, Entity, ProductCategoryId, ProductId};
use storefront_catalog::{Priceable, Product, ProductCategory};

use super::{CatalogStore, StoreError};

/// In-memory catalog store.
///
/// Intended for tests/dev and as the reference implementation of the save
/// cycle. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
    categories: RwLock<HashMap<ProductCategoryId, ProductCategory>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active products ordered by name, the default storefront listing.
    pub fn active_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut listing: Vec<Product> = products
            .values()
            .filter(|p| p.details().active)
            .cloned()
            .collect();
        listing.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(listing)
    }

    pub fn featured_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut listing: Vec<Product> = products
            .values()
            .filter(|p| p.details().featured)
            .cloned()
            .collect();
        listing.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(listing)
    }
}

impl CatalogStore for InMemoryCatalog {
    fn save_product(&self, mut product: Product) -> Result<Product, StoreError> {
        product.ensure_permalink();
        product.validate()?;

        // The only place reconciliation runs: once, immediately before the
        // write. The pending entry is consumed here whether or not it moved
        // the price.
        let adjusted = product.reconcile_before_save();
        if adjusted {
            debug!(
                product = %product.name(),
                price = %product.price(),
                "tax-inclusive entry adjusted the base price"
            );
        }
        if product.price() < Decimal::ZERO {
            return Err(DomainError::invariant("committed price cannot be negative").into());
        }
        product.normalize_for_storage();

        let mut products = self.products.write().map_err(|_| StoreError::LockPoisoned)?;

        let duplicate = products
            .values()
            .any(|p| p.id() != product.id() && p.permalink() == product.permalink());
        if duplicate {
            return Err(DomainError::conflict(format!(
                "permalink '{}' is already taken",
                product.permalink()
            ))
            .into());
        }

        products.insert(*product.id(), product.clone());
        Ok(product)
    }

    fn product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(products.get(id).cloned())
    }

    fn product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(products.values().find(|p| p.name() == name).cloned())
    }

    fn category_by_name(&self, name: &str) -> Result<Option<ProductCategory>, StoreError> {
        let categories = self.categories.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(categories.values().find(|c| c.name() == name).cloned())
    }

    fn find_or_create_category(&self, name: &str) -> Result<ProductCategory, StoreError> {
        let mut categories = self.categories.write().map_err(|_| StoreError::LockPoisoned)?;
        if let Some(existing) = categories.values().find(|c| c.name() == name) {
            return Ok(existing.clone());
        }
        let category = ProductCategory::new(name)?;
        info!(category = %name, "created product category");
        categories.insert(*category.id(), category.clone());
        Ok(category)
    }
}
