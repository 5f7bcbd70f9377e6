use thiserror::Error;

use storefront_core::DomainError;
use storefront_infra::StoreError;

/// Import failure. Domain and store failures pass through; the only failure
/// owned by this crate is an unrecognized spreadsheet format, which is fatal
/// before any row is read.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unknown spreadsheet format: {filename}")]
    UnknownFormat { filename: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
