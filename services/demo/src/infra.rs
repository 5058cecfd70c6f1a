use crate::cli::CatalogArgs;
use std::fmt;
use std::path::PathBuf;
use storefront::catalog::{Catalog, CatalogError, CatalogProvider, CsvCatalog, SyntheticCatalog};
use storefront::config::AppConfig;
use tracing::info;

/// Where the demo catalog came from, for the report header.
#[derive(Debug, Clone)]
pub(crate) enum CatalogSource {
    Synthetic { size: usize, seed: u64 },
    Csv(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Synthetic { size, seed } => {
                write!(f, "synthetic catalog ({size} products, seed {seed})")
            }
            CatalogSource::Csv(path) => write!(f, "CSV import {}", path.display()),
        }
    }
}

pub(crate) fn load_catalog(
    config: &AppConfig,
    args: &CatalogArgs,
) -> Result<(Catalog, CatalogSource), CatalogError> {
    let (catalog, source) = match &args.catalog_csv {
        Some(path) => (
            CsvCatalog::from_path(path)?,
            CatalogSource::Csv(path.clone()),
        ),
        None => {
            let size = args.size.unwrap_or(config.catalog.size);
            let seed = args.seed.unwrap_or(config.catalog.seed);
            (
                SyntheticCatalog::new(size, seed).catalog()?,
                CatalogSource::Synthetic { size, seed },
            )
        }
    };

    info!(products = catalog.len(), source = %source, "catalog loaded");
    Ok((catalog, source))
}

pub(crate) fn parse_rating(raw: &str) -> Result<u8, String> {
    match raw.trim().parse::<u8>() {
        Ok(rating) if (1..=5).contains(&rating) => Ok(rating),
        Ok(rating) => Err(format!("rating {rating} is outside the 1-5 star range")),
        Err(err) => Err(format!("failed to parse '{raw}' as a star rating ({err})")),
    }
}
