use std::collections::HashMap;
use std::sync::Arc;

use storefront::catalog::{CatalogProvider, Product, SyntheticCatalog};
use storefront::filtering::{Criterion, FilterCriteria, FilterEngine, StorefrontSession};
use storefront::xray::{EventKind, InMemoryTraceSink};

fn synthetic(size: usize) -> Vec<Product> {
    SyntheticCatalog::new(size, 42)
        .catalog()
        .expect("synthetic catalog")
        .products()
        .to_vec()
}

fn satisfies(product: &Product, criteria: &FilterCriteria) -> bool {
    (criteria.sports.is_empty() || criteria.sports.contains(&product.sport))
        && (criteria.brands.is_empty() || criteria.brands.contains(&product.brand))
        && (criteria.categories.is_empty() || criteria.categories.contains(&product.category))
        && (criteria.ratings.is_empty() || criteria.ratings.contains(&product.rating))
}

#[test]
fn default_catalog_passes_unconstrained_in_order() {
    let catalog = synthetic(SyntheticCatalog::DEFAULT_SIZE);
    let engine = FilterEngine::new(Arc::new(InMemoryTraceSink::default()));

    let execution = engine
        .execute(&catalog, &FilterCriteria::default())
        .expect("execution succeeds");

    assert_eq!(execution.results.len(), 200);
    assert!(execution
        .results
        .iter()
        .enumerate()
        .all(|(index, ranked)| ranked.rank == index + 1 && ranked.product == catalog[index]));
}

#[test]
fn checkbox_filters_partition_the_catalog() {
    let catalog = synthetic(SyntheticCatalog::DEFAULT_SIZE);
    let engine = FilterEngine::new(Arc::new(InMemoryTraceSink::default()));
    let criteria = FilterCriteria::new()
        .with_sport("Golf")
        .with_sport("Tennis")
        .with_rating(4)
        .with_rating(5);

    let execution = engine.execute(&catalog, &criteria).expect("execution succeeds");

    let expected: Vec<&Product> = catalog
        .iter()
        .filter(|product| satisfies(product, &criteria))
        .collect();
    assert_eq!(execution.products().collect::<Vec<_>>(), expected);

    for filtered in execution.trace.filtered() {
        assert!(!filtered.failed_checks.is_empty());
        assert!(filtered.score.is_none());
    }
    let summary = &execution.trace.summary;
    assert_eq!(summary.passed_count + summary.filtered_count, catalog.len());
    assert_eq!(summary.total_checks_performed, 2 * catalog.len());
}

#[test]
fn search_ranking_is_descending_and_stable() {
    let catalog = synthetic(SyntheticCatalog::DEFAULT_SIZE);
    let engine = FilterEngine::new(Arc::new(InMemoryTraceSink::default()));
    let positions: HashMap<&str, usize> = catalog
        .iter()
        .enumerate()
        .map(|(index, product)| (product.id.as_str(), index))
        .collect();

    let execution = engine
        .execute(&catalog, &FilterCriteria::new().with_search("nova shoes"))
        .expect("execution succeeds");

    assert!(!execution.results.is_empty());
    for pair in execution.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        if pair[0].score == pair[1].score {
            assert!(positions[pair[0].product.id.as_str()] < positions[pair[1].product.id.as_str()]);
        }
    }
    assert!(execution.trace.passed().all(|details| details
        .score_breakdown
        .as_ref()
        .is_some_and(|breakdown| breakdown.matched_term_count > 0)));
}

#[test]
fn large_catalog_traces_every_product() {
    let catalog = synthetic(2000);
    let sink = Arc::new(InMemoryTraceSink::new(5000));
    let engine = FilterEngine::new(Arc::clone(&sink));

    let execution = engine
        .execute(&catalog, &FilterCriteria::new().with_search("golf").with_rating(5))
        .expect("execution succeeds");

    let stats = sink.stats();
    assert_eq!(stats.total_events, 2001);
    assert_eq!(stats.count(EventKind::SearchExecuted), 1);
    assert_eq!(
        stats.count(EventKind::ProductPassed),
        execution.results.len()
    );
    assert_eq!(stats.evicted, 0);
}

#[test]
fn browse_search_narrow_reset_journey() {
    let provider = Arc::new(SyntheticCatalog::new(SyntheticCatalog::DEFAULT_SIZE, 42));
    let sink = Arc::new(InMemoryTraceSink::default());
    let mut session = StorefrontSession::new(provider, Arc::clone(&sink));

    let browse = session.refresh().expect("initial render");
    assert_eq!(browse.results.len(), 200);

    let searched = session
        .apply(FilterCriteria::new().with_search("golf"))
        .expect("search");
    let narrowed = session
        .apply(FilterCriteria::new().with_search("golf").with_brand("Nova"))
        .expect("narrow");
    assert!(narrowed.results.len() <= searched.results.len());
    assert!(narrowed
        .trace
        .filtered()
        .any(|details| details.failed_checks.contains(&Criterion::Brand)));

    let reset = session.reset().expect("reset");
    assert_eq!(reset.results.len(), 200);

    let stats = sink.stats();
    assert_eq!(stats.count(EventKind::FilterApplied), 2);
    assert_eq!(stats.count(EventKind::FilterReset), 1);
    assert_eq!(stats.count(EventKind::SearchExecuted), 4);
}
