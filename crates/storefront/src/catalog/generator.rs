use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::domain::{Product, ProductId};
use super::{Catalog, CatalogError, CatalogProvider};

const SPORTS: [&str; 10] = [
    "Basketball",
    "Soccer",
    "Tennis",
    "Running",
    "Gym",
    "Cycling",
    "Swimming",
    "Golf",
    "Trecking",
    "Winter Sports",
];

const BRANDS: [&str; 8] = [
    "Peak Performance",
    "Velocity",
    "Apex Sports",
    "Core Athletics",
    "Titan Gear",
    "Swift",
    "Endurance",
    "Nova",
];

const CATEGORIES: [&str; 9] = [
    "Footwear",
    "Apparel",
    "Equipment",
    "Accessories",
    "Shoes",
    "Torso",
    "Trecking Gear",
    "Thermal Suits",
    "Wearables",
];

/// Seeded stand-in for the storefront's product feed.
///
/// Labels cycle deterministically by index; rating, price, and review counts are drawn from a
/// seeded RNG so two catalogs built with the same `(size, seed)` are identical.
#[derive(Debug, Clone)]
pub struct SyntheticCatalog {
    catalog: Catalog,
}

impl SyntheticCatalog {
    pub const DEFAULT_SIZE: usize = 200;

    pub fn new(size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let products: Vec<Product> = (0..size)
            .map(|index| generate_product(index, &mut rng))
            .collect();

        Self {
            catalog: Catalog {
                products: products.into(),
            },
        }
    }

    pub fn catalog_ref(&self) -> &Catalog {
        &self.catalog
    }
}

impl CatalogProvider for SyntheticCatalog {
    fn catalog(&self) -> Result<Catalog, CatalogError> {
        Ok(self.catalog.clone())
    }
}

fn generate_product(index: usize, rng: &mut StdRng) -> Product {
    let sport = SPORTS[index % SPORTS.len()];
    let brand = BRANDS[index % BRANDS.len()];
    let category = CATEGORIES[index % CATEGORIES.len()];
    let even = index % 2 == 0;

    let rating = rng.gen_range(3..=5u8);
    let price = f64::from(rng.gen_range(20..170u32));
    let reviews = rng.gen_range(10..510u32);

    Product {
        id: ProductId(format!("prod-{}", index + 1)),
        name: product_name(brand, sport, category, even),
        brand: brand.to_string(),
        sport: sport.to_string(),
        category: category.to_string(),
        price,
        rating,
        reviews,
    }
}

fn product_name(brand: &str, sport: &str, category: &str, even: bool) -> String {
    match category {
        "Shoes" | "Footwear" => {
            let line = if even { "Pro" } else { "Swift" };
            format!("{brand} {sport} Elite {line} Shoes")
        }
        "Torso" | "Apparel" => {
            let garment = if even { "Jersey" } else { "Compression Top" };
            format!("{brand} {sport} Performance {garment}")
        }
        "Trecking Gear" => {
            let gear = if even { "Mountain Pack" } else { "Climbing Harness" };
            format!("{brand} All-Terrain {gear}")
        }
        "Thermal Suits" => format!("{brand} {sport} Arctic-Shield Thermal Suit"),
        "Wearables" => format!("{brand} Smart-Track {sport} Monitor"),
        _ => format!("{brand} {sport} {category}"),
    }
}
