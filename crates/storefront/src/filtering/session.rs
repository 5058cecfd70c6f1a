use std::sync::Arc;

use tracing::info;

use super::criteria::{CriteriaError, FilterCriteria};
use super::engine::{Execution, FilterEngine};
use crate::catalog::{CatalogError, CatalogFacets, CatalogProvider};
use crate::xray::{TraceSink, XRayEvent};

/// Filter-apply entry point used by the page: owns the active criteria and routes every
/// apply/reset through the engine so the X-Ray log sees the user action and its execution.
pub struct StorefrontSession<C, S> {
    catalog: Arc<C>,
    sink: Arc<S>,
    engine: FilterEngine<S>,
    active: FilterCriteria,
}

impl<C, S> StorefrontSession<C, S>
where
    C: CatalogProvider + 'static,
    S: TraceSink + 'static,
{
    pub fn new(catalog: Arc<C>, sink: Arc<S>) -> Self {
        let engine = FilterEngine::new(Arc::clone(&sink));
        Self {
            catalog,
            sink,
            engine,
            active: FilterCriteria::default(),
        }
    }

    pub fn active_criteria(&self) -> &FilterCriteria {
        &self.active
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn facets(&self) -> Result<CatalogFacets, StorefrontError> {
        Ok(self.catalog.catalog()?.facets())
    }

    /// Re-run the currently active criteria, as the page does on first render.
    pub fn refresh(&self) -> Result<Execution, StorefrontError> {
        let catalog = self.catalog.catalog()?;
        Ok(self.engine.execute(catalog.products(), &self.active)?)
    }

    /// Record the user's selection, execute it, and make it the active filter state.
    pub fn apply(&mut self, criteria: FilterCriteria) -> Result<Execution, StorefrontError> {
        criteria.validate()?;
        let catalog = self.catalog.catalog()?;

        info!(
            filters = criteria.active_filter_count(),
            total_products = catalog.len(),
            "applying storefront filters"
        );
        self.sink
            .append(XRayEvent::filter_applied(&criteria, catalog.len()));

        let execution = self.engine.execute(catalog.products(), &criteria)?;
        self.active = criteria;
        Ok(execution)
    }

    /// Clear every filter and re-run against the full catalog.
    pub fn reset(&mut self) -> Result<Execution, StorefrontError> {
        let catalog = self.catalog.catalog()?;

        info!(
            previous_filters = self.active.active_filter_count(),
            "resetting storefront filters"
        );
        self.sink
            .append(XRayEvent::filter_reset(&self.active, catalog.len()));

        self.active = FilterCriteria::default();
        Ok(self.engine.execute(catalog.products(), &self.active)?)
    }
}

/// Error raised by the storefront session.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
