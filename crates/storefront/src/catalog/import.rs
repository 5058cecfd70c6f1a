use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{Product, ProductId};
use super::{Catalog, CatalogError};

/// Loads a catalog from a CSV export with the header
/// `id,name,brand,sport,category,price,rating,reviews`.
pub struct CsvCatalog;

impl CsvCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut products = Vec::new();

        for record in csv_reader.deserialize::<CatalogRow>() {
            products.push(record?.into_product());
        }

        Catalog::new(products)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    brand: String,
    sport: String,
    category: String,
    price: f64,
    rating: u8,
    #[serde(default)]
    reviews: u32,
}

impl CatalogRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId(self.id),
            name: self.name,
            brand: self.brand,
            sport: self.sport,
            category: self.category,
            price: self.price,
            rating: self.rating,
            reviews: self.reviews,
        }
    }
}
