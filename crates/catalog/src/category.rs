use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, ProductCategoryId};

use crate::permalink;

/// A product category. Categories are flat and addressed by name; bulk import
/// creates them on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    id: ProductCategoryId,
    name: String,
    permalink: String,
}

impl ProductCategory {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        let permalink = permalink::parameterize(&name);
        if permalink.is_empty() {
            return Err(DomainError::validation(
                "category name yields an empty permalink",
            ));
        }
        Ok(Self {
            id: ProductCategoryId::new(),
            name,
            permalink,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permalink(&self) -> &str {
        &self.permalink
    }
}

impl Entity for ProductCategory {
    type Id = ProductCategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_permalink_from_name() {
        let cat = ProductCategory::new("Desk Phones").unwrap();
        assert_eq!(cat.name(), "Desk Phones");
        assert_eq!(cat.permalink(), "desk-phones");
    }

    #[test]
    fn rejects_blank_name() {
        assert!(matches!(
            ProductCategory::new("  ").unwrap_err(),
            DomainError::Validation(_)
        ));
    }
}
