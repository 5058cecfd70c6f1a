//! Product catalog contract plus the two bundled sources: the seeded synthetic generator used by
//! the demo storefront and a CSV importer for hand-curated catalogs.

pub mod domain;
mod generator;
mod import;

pub use domain::{CatalogFacets, Product, ProductId};
pub use generator::SyntheticCatalog;
pub use import::CsvCatalog;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Ordered, immutable product list. Cloning shares the underlying records.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and records outside the storefront's value ranges.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if !(1..=5).contains(&product.rating) {
                return Err(CatalogError::InvalidRating {
                    id: product.id.clone(),
                    rating: product.rating,
                });
            }
            if !(product.price > 0.0) {
                return Err(CatalogError::InvalidPrice {
                    id: product.id.clone(),
                    price: product.price,
                });
            }
        }

        Ok(Self {
            products: products.into(),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn facets(&self) -> CatalogFacets {
        let mut sports = BTreeSet::new();
        let mut brands = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for product in self.products.iter() {
            sports.insert(product.sport.clone());
            brands.insert(product.brand.clone());
            categories.insert(product.category.clone());
        }

        CatalogFacets {
            sports: sports.into_iter().collect(),
            brands: brands.into_iter().collect(),
            categories: categories.into_iter().collect(),
        }
    }
}

impl AsRef<[Product]> for Catalog {
    fn as_ref(&self) -> &[Product] {
        self.products()
    }
}

/// Source of the storefront catalog. Implementations own the records for the process lifetime.
pub trait CatalogProvider: Send + Sync {
    fn catalog(&self) -> Result<Catalog, CatalogError>;
}

impl CatalogProvider for Catalog {
    fn catalog(&self) -> Result<Catalog, CatalogError> {
        Ok(self.clone())
    }
}

/// Error raised while loading or validating catalog records.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate product id '{0}'")]
    DuplicateId(ProductId),
    #[error("product '{id}' has rating {rating}; expected 1-5 stars")]
    InvalidRating { id: ProductId, rating: u8 },
    #[error("product '{id}' has non-positive price {price}")]
    InvalidPrice { id: ProductId, price: f64 },
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, sport: &str, brand: &str, category: &str) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("{brand} {sport} {category}"),
            brand: brand.to_string(),
            sport: sport.to_string(),
            category: category.to_string(),
            price: 49.0,
            rating: 4,
            reviews: 12,
        }
    }

    #[test]
    fn facets_are_sorted_and_unique() {
        let catalog = Catalog::new(vec![
            product("prod-1", "Tennis", "Swift", "Shoes"),
            product("prod-2", "Golf", "Nova", "Apparel"),
            product("prod-3", "Tennis", "Nova", "Shoes"),
        ])
        .expect("catalog builds");

        let facets = catalog.facets();
        assert_eq!(facets.sports, vec!["Golf", "Tennis"]);
        assert_eq!(facets.brands, vec!["Nova", "Swift"]);
        assert_eq!(facets.categories, vec!["Apparel", "Shoes"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::new(vec![
            product("prod-1", "Tennis", "Swift", "Shoes"),
            product("prod-1", "Golf", "Nova", "Apparel"),
        ])
        .expect_err("duplicate ids rejected");

        assert!(matches!(err, CatalogError::DuplicateId(id) if id.as_str() == "prod-1"));
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let mut record = product("prod-9", "Golf", "Nova", "Apparel");
        record.rating = 0;

        let err = Catalog::new(vec![record]).expect_err("rating 0 rejected");
        assert!(matches!(err, CatalogError::InvalidRating { rating: 0, .. }));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::new(Vec::new()).expect("empty catalog builds");
        assert!(catalog.is_empty());
        assert_eq!(catalog.facets(), CatalogFacets::default());
    }
}
