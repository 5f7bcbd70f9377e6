//! Catalog persistence: the one write path products go through.

use thiserror::Error;

use storefront_core::{DomainError, ProductId};
use storefront_catalog::{Product, ProductCategory};

mod in_memory;

pub use in_memory::InMemoryCatalog;

/// Storage failure surfaced by a catalog store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A domain rule rejected the write (validation, invariant, conflict).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The store's lock was poisoned by a panicking writer.
    #[error("catalog store lock poisoned")]
    LockPoisoned,
}

/// Catalog repository contract.
///
/// `save_product` is the single write path for products: it derives a blank
/// permalink, validates, runs tax-inclusive price reconciliation **exactly
/// once**, clamps prices to storage precision, then commits. Callers never
/// invoke reconciliation themselves.
pub trait CatalogStore {
    /// Persist a product through the full save cycle and return the committed
    /// state.
    fn save_product(&self, product: Product) -> Result<Product, StoreError>;

    fn product(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    fn product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError>;

    fn category_by_name(&self, name: &str) -> Result<Option<ProductCategory>, StoreError>;

    /// Look a category up by name, creating it when absent.
    fn find_or_create_category(&self, name: &str) -> Result<ProductCategory, StoreError>;
}
