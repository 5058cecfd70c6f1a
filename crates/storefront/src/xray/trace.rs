use serde::Serialize;

use super::event::{
    EventContext, EventPayload, ExecutionId, FilteredDetails, PassedDetails, SearchSummaryDetails,
    XRayEvent,
};

/// Per-product line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TraceEntry {
    Passed(PassedDetails),
    Filtered(FilteredDetails),
}

impl TraceEntry {
    pub fn rank(&self) -> Option<usize> {
        match self {
            TraceEntry::Passed(details) => Some(details.rank),
            TraceEntry::Filtered(_) => None,
        }
    }

    fn reason(&self) -> String {
        match self {
            TraceEntry::Passed(details) => {
                let name = &details.decision.product.name;
                match &details.score_breakdown {
                    Some(breakdown) => format!(
                        "Rank #{}: \"{name}\" scored {:.2} points ({:.1}% match)",
                        details.rank, details.score, breakdown.match_percentage
                    ),
                    None => format!(
                        "Product \"{name}\" passed all {} filter checks (Rank: #{}, Score: {})",
                        details.decision.checks.len(),
                        details.rank,
                        details.score
                    ),
                }
            }
            TraceEntry::Filtered(details) => {
                let product = &details.decision.product;
                let mut reason = format!(
                    "Product \"{}\" ({}, ${}) filtered out: {}",
                    product.name,
                    product.brand,
                    product.price,
                    details.decision.failure_summary()
                );
                if let Some(score) = details.score {
                    reason.push_str(&format!(" (Match Score: {score})"));
                }
                reason
            }
        }
    }

    fn into_payload(self) -> EventPayload {
        match self {
            TraceEntry::Passed(details) => EventPayload::ProductPassed(details),
            TraceEntry::Filtered(details) => EventPayload::ProductFiltered(details),
        }
    }
}

/// Full audit of one execution: ranked passes, catalog-ordered rejections, then the summary.
///
/// A trace is assembled completely before anything reaches a sink, so every entry already
/// carries its final rank and score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub execution_id: ExecutionId,
    pub context: EventContext,
    pub entries: Vec<TraceEntry>,
    pub summary: SearchSummaryDetails,
}

impl Trace {
    pub fn passed(&self) -> impl Iterator<Item = &PassedDetails> {
        self.entries.iter().filter_map(|entry| match entry {
            TraceEntry::Passed(details) => Some(details),
            TraceEntry::Filtered(_) => None,
        })
    }

    pub fn filtered(&self) -> impl Iterator<Item = &FilteredDetails> {
        self.entries.iter().filter_map(|entry| match entry {
            TraceEntry::Filtered(details) => Some(details),
            TraceEntry::Passed(_) => None,
        })
    }

    pub fn summary_reason(&self) -> String {
        format!(
            "Filter execution completed: {}/{} products passed in {:.2}ms",
            self.summary.passed_count, self.summary.total_products, self.summary.duration_ms
        )
    }

    /// Sink events in emission order, each tagged with this execution's id.
    pub fn to_events(&self) -> Vec<XRayEvent> {
        let mut events = Vec::with_capacity(self.entries.len() + 1);

        for entry in &self.entries {
            events.push(XRayEvent::new(
                Some(self.execution_id.clone()),
                entry.reason(),
                self.context.clone(),
                entry.clone().into_payload(),
            ));
        }

        events.push(XRayEvent::new(
            Some(self.execution_id.clone()),
            self.summary_reason(),
            self.context.clone(),
            EventPayload::SearchExecuted(self.summary.clone()),
        ));

        events
    }
}
