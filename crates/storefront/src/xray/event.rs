use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filtering::{Criterion, Decision, FilterCriteria, ScoreBreakdown};

static IDENTIFIER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_identifier(prefix: &str) -> String {
    let sequence = IDENTIFIER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "{prefix}-{}-{sequence:06}",
        Utc::now().timestamp_millis()
    )
}

/// Identity of one filter-apply execution; every event it emits carries this tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(pub String);

impl ExecutionId {
    pub fn generate() -> Self {
        Self(next_identifier("exec"))
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn generate() -> Self {
        Self(next_identifier("xray"))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    FilterApplied,
    FilterReset,
    ProductPassed,
    ProductFiltered,
    SearchExecuted,
}

impl EventKind {
    pub fn ordered() -> [EventKind; 5] {
        [
            EventKind::FilterApplied,
            EventKind::FilterReset,
            EventKind::ProductPassed,
            EventKind::ProductFiltered,
            EventKind::SearchExecuted,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            EventKind::FilterApplied => "FILTER_APPLIED",
            EventKind::FilterReset => "FILTER_RESET",
            EventKind::ProductPassed => "PRODUCT_PASSED",
            EventKind::ProductFiltered => "PRODUCT_FILTERED",
            EventKind::SearchExecuted => "SEARCH_EXECUTED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog size and filter state at the time an event was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    pub total_products: usize,
    pub active_filters: FilterCriteria,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterAppliedDetails {
    pub criteria: FilterCriteria,
    pub filter_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResetDetails {
    pub previous_filters: FilterCriteria,
}

/// Trace payload for a product that survived every active check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassedDetails {
    pub decision: Decision,
    pub rank: usize,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
}

/// Trace payload for a product rejected by at least one check. Never ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredDetails {
    pub decision: Decision,
    pub failed_checks: Vec<Criterion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Closing summary of an execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSummaryDetails {
    pub duration_ms: f64,
    pub total_products: usize,
    pub passed_count: usize,
    pub filtered_count: usize,
    pub total_checks_performed: usize,
    pub average_checks_per_product: f64,
    pub average_score: f64,
    pub top_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    FilterApplied(FilterAppliedDetails),
    FilterReset(FilterResetDetails),
    ProductPassed(PassedDetails),
    ProductFiltered(FilteredDetails),
    SearchExecuted(SearchSummaryDetails),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::FilterApplied(_) => EventKind::FilterApplied,
            EventPayload::FilterReset(_) => EventKind::FilterReset,
            EventPayload::ProductPassed(_) => EventKind::ProductPassed,
            EventPayload::ProductFiltered(_) => EventKind::ProductFiltered,
            EventPayload::SearchExecuted(_) => EventKind::SearchExecuted,
        }
    }

    /// Detail payload as JSON text, without the kind tag.
    pub fn details_json(&self) -> serde_json::Result<String> {
        match self {
            EventPayload::FilterApplied(details) => serde_json::to_string(details),
            EventPayload::FilterReset(details) => serde_json::to_string(details),
            EventPayload::ProductPassed(details) => serde_json::to_string(details),
            EventPayload::ProductFiltered(details) => serde_json::to_string(details),
            EventPayload::SearchExecuted(details) => serde_json::to_string(details),
        }
    }

    /// Checks carried by product-level payloads, used for per-criterion tallies.
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            EventPayload::ProductPassed(details) => Some(&details.decision),
            EventPayload::ProductFiltered(details) => Some(&details.decision),
            _ => None,
        }
    }
}

/// One entry of the X-Ray log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XRayEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<ExecutionId>,
    pub reason: String,
    pub context: EventContext,
    pub payload: EventPayload,
}

impl XRayEvent {
    pub fn new(
        execution_id: Option<ExecutionId>,
        reason: String,
        context: EventContext,
        payload: EventPayload,
    ) -> Self {
        Self {
            id: EventId::generate(),
            timestamp: Utc::now(),
            execution_id,
            reason,
            context,
            payload,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// User-initiated FILTER_APPLIED event; not tied to an execution.
    pub fn filter_applied(criteria: &FilterCriteria, total_products: usize) -> Self {
        let filter_count = criteria.active_filter_count();
        let reason = format!(
            "User applied {filter_count} filter(s): {}",
            criteria.describe()
        );

        Self::new(
            None,
            reason,
            EventContext {
                total_products,
                active_filters: criteria.clone(),
            },
            EventPayload::FilterApplied(FilterAppliedDetails {
                criteria: criteria.clone(),
                filter_count,
            }),
        )
    }

    pub fn filter_reset(previous: &FilterCriteria, total_products: usize) -> Self {
        Self::new(
            None,
            "User reset all filters to default state".to_string(),
            EventContext {
                total_products,
                active_filters: previous.clone(),
            },
            EventPayload::FilterReset(FilterResetDetails {
                previous_filters: previous.clone(),
            }),
        )
    }
}
