use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError, CatalogProvider, Product, ProductId};
use crate::filtering::FilterEngine;
use crate::xray::InMemoryTraceSink;

pub(super) fn product(
    id: &str,
    name: &str,
    brand: &str,
    sport: &str,
    category: &str,
    rating: u8,
) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        brand: brand.to_string(),
        sport: sport.to_string(),
        category: category.to_string(),
        price: 89.0,
        rating,
        reviews: 120,
    }
}

pub(super) fn apex_running_shoe() -> Product {
    product("prod-apex", "Apex Running Shoe", "Apex", "Running", "Shoes", 5)
}

/// Small hand-built catalog mixing sports, brands, and ratings.
pub(super) fn sample_catalog() -> Vec<Product> {
    vec![
        product("prod-1", "Velocity Golf Performance Jersey", "Velocity", "Golf", "Apparel", 3),
        apex_running_shoe(),
        product("prod-3", "Nova Tennis Elite Pro Shoes", "Nova", "Tennis", "Footwear", 4),
        product("prod-4", "Nova Golf Equipment", "Nova", "Golf", "Equipment", 5),
        product("prod-5", "Swift Running Performance Compression Top", "Swift", "Running", "Torso", 4),
        product("prod-6", "Titan Gear Smart-Track Golf Monitor", "Titan Gear", "Golf", "Wearables", 3),
    ]
}

pub(super) fn engine() -> (FilterEngine<InMemoryTraceSink>, Arc<InMemoryTraceSink>) {
    let sink = Arc::new(InMemoryTraceSink::default());
    (FilterEngine::new(Arc::clone(&sink)), sink)
}

pub(super) fn catalog_provider() -> Arc<Catalog> {
    Arc::new(Catalog::new(sample_catalog()).expect("sample catalog is valid"))
}

/// Provider standing in for a feed that cannot be reached.
pub(super) struct UnavailableCatalog;

impl CatalogProvider for UnavailableCatalog {
    fn catalog(&self) -> Result<Catalog, CatalogError> {
        Err(CatalogError::Unavailable("feed offline".to_string()))
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
