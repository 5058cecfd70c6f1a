use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use super::criteria::{CriteriaError, FilterCriteria};
use super::evaluation::{Decision, Evaluator};
use crate::catalog::Product;
use crate::xray::{
    EventContext, ExecutionId, FilteredDetails, PassedDetails, SearchSummaryDetails, Trace,
    TraceEntry, TraceSink,
};

/// Product that survived filtering, with its 1-based position in the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProduct {
    pub product: Product,
    pub rank: usize,
    pub score: f64,
}

/// Outcome of one filter-apply action.
#[derive(Debug, Clone)]
pub struct Execution {
    pub results: Vec<RankedProduct>,
    pub trace: Trace,
}

impl Execution {
    pub fn execution_id(&self) -> &ExecutionId {
        &self.trace.execution_id
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.results.iter().map(|ranked| &ranked.product)
    }
}

/// Runs the evaluator over a catalog, ranks the survivors, and writes the trace to its sink.
pub struct FilterEngine<S> {
    sink: Arc<S>,
}

impl<S> FilterEngine<S>
where
    S: TraceSink + 'static,
{
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    /// Evaluate every product, rank the passing ones, and append the trace exactly once.
    pub fn execute(
        &self,
        catalog: &[Product],
        criteria: &FilterCriteria,
    ) -> Result<Execution, CriteriaError> {
        if let Err(err) = criteria.validate() {
            warn!(error = %err, "rejected filter criteria");
            return Err(err);
        }

        let execution_id = ExecutionId::generate();
        let started = Instant::now();
        let evaluator = Evaluator::new(criteria);

        let decisions: Vec<Decision> = catalog
            .iter()
            .map(|product| evaluator.evaluate(product))
            .collect();
        let total_checks_performed: usize =
            decisions.iter().map(|decision| decision.checks.len()).sum();

        let mut passing: Vec<(usize, f64)> = decisions
            .iter()
            .enumerate()
            .filter(|(_, decision)| decision.passed)
            .map(|(index, decision)| (index, decision.score))
            .collect();
        // `sort_by` is stable, so equal scores keep catalog order.
        if evaluator.search_active() {
            passing.sort_by(|left, right| right.1.total_cmp(&left.1));
        }

        let mut slots: Vec<Option<Decision>> = decisions.into_iter().map(Some).collect();
        let mut results = Vec::with_capacity(passing.len());
        let mut entries = Vec::with_capacity(catalog.len());

        for (position, &(index, score)) in passing.iter().enumerate() {
            let rank = position + 1;
            let Some(decision) = slots[index].take() else {
                continue;
            };

            results.push(RankedProduct {
                product: catalog[index].clone(),
                rank,
                score,
            });
            entries.push(TraceEntry::Passed(PassedDetails {
                score_breakdown: decision.score_breakdown().cloned(),
                decision,
                rank,
                score,
            }));
        }

        for decision in slots.into_iter().flatten() {
            entries.push(TraceEntry::Filtered(FilteredDetails {
                failed_checks: decision.failed_checks(),
                score: evaluator.search_active().then_some(decision.score),
                decision,
            }));
        }

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        let summary = summarize(
            duration_ms,
            catalog.len(),
            &results,
            total_checks_performed,
        );

        let trace = Trace {
            execution_id,
            context: EventContext {
                total_products: catalog.len(),
                active_filters: criteria.clone(),
            },
            entries,
            summary,
        };

        debug!(
            execution_id = %trace.execution_id,
            total = trace.summary.total_products,
            passed = trace.summary.passed_count,
            duration_ms = trace.summary.duration_ms,
            "filter execution completed"
        );
        self.sink.append_batch(trace.to_events());

        Ok(Execution { results, trace })
    }
}

fn summarize(
    duration_ms: f64,
    total_products: usize,
    results: &[RankedProduct],
    total_checks_performed: usize,
) -> SearchSummaryDetails {
    let passed_count = results.len();
    let average_checks_per_product = if total_products == 0 {
        0.0
    } else {
        total_checks_performed as f64 / total_products as f64
    };
    let (average_score, top_score) = if results.is_empty() {
        (0.0, 0.0)
    } else {
        let total: f64 = results.iter().map(|ranked| ranked.score).sum();
        let top = results
            .iter()
            .map(|ranked| ranked.score)
            .fold(f64::MIN, f64::max);
        (total / passed_count as f64, top)
    };

    SearchSummaryDetails {
        duration_ms,
        total_products,
        passed_count,
        filtered_count: total_products - passed_count,
        total_checks_performed,
        average_checks_per_product,
        average_score,
        top_score,
    }
}
