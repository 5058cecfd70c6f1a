//! Read-side views over the X-Ray log: totals per kind, execution groups, and text queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::event::{EventId, EventKind, EventPayload, ExecutionId, XRayEvent};
use crate::filtering::Criterion;

/// Number of rejected-product events surfaced in [`SinkStats::recent_failures`].
pub const RECENT_FAILURE_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SinkStats {
    pub total_events: usize,
    pub by_kind: BTreeMap<EventKind, usize>,
    /// Newest first.
    pub recent_failures: Vec<XRayEvent>,
    pub evicted: u64,
}

impl SinkStats {
    pub(crate) fn from_events<'a, I>(events: I, evicted: u64) -> Self
    where
        I: DoubleEndedIterator<Item = &'a XRayEvent>,
    {
        let mut stats = SinkStats {
            evicted,
            ..SinkStats::default()
        };

        for event in events.rev() {
            stats.total_events += 1;
            *stats.by_kind.entry(event.kind()).or_insert(0) += 1;

            if event.kind() == EventKind::ProductFiltered
                && stats.recent_failures.len() < RECENT_FAILURE_LIMIT
            {
                stats.recent_failures.push(event.clone());
            }
        }

        stats
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Grouping key: events from an execution share its id, anything else stands alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "group", content = "id", rename_all = "snake_case")]
pub enum GroupKey {
    Execution(ExecutionId),
    Ungrouped(EventId),
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionGroup {
    pub key: GroupKey,
    pub events: Vec<XRayEvent>,
}

impl ExecutionGroup {
    pub fn execution_id(&self) -> Option<&ExecutionId> {
        match &self.key {
            GroupKey::Execution(id) => Some(id),
            GroupKey::Ungrouped(_) => None,
        }
    }

    pub fn passed(&self) -> impl Iterator<Item = &XRayEvent> {
        self.events_of(EventKind::ProductPassed)
    }

    pub fn filtered(&self) -> impl Iterator<Item = &XRayEvent> {
        self.events_of(EventKind::ProductFiltered)
    }

    pub fn others(&self) -> impl Iterator<Item = &XRayEvent> {
        self.events.iter().filter(|event| {
            !matches!(
                event.kind(),
                EventKind::ProductPassed | EventKind::ProductFiltered
            )
        })
    }

    pub fn stats(&self) -> Option<GroupStats> {
        self.execution_id()
            .map(|id| GroupStats::for_execution(&self.events, id))
    }

    fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &XRayEvent> {
        self.events.iter().filter(move |event| event.kind() == kind)
    }
}

/// Group events by execution, ordering groups by first appearance.
pub fn group_events(events: &[XRayEvent]) -> Vec<ExecutionGroup> {
    let mut groups: Vec<ExecutionGroup> = Vec::new();
    let mut positions: BTreeMap<ExecutionId, usize> = BTreeMap::new();

    for event in events {
        match &event.execution_id {
            Some(execution_id) => {
                if let Some(&position) = positions.get(execution_id) {
                    groups[position].events.push(event.clone());
                } else {
                    positions.insert(execution_id.clone(), groups.len());
                    groups.push(ExecutionGroup {
                        key: GroupKey::Execution(execution_id.clone()),
                        events: vec![event.clone()],
                    });
                }
            }
            None => groups.push(ExecutionGroup {
                key: GroupKey::Ungrouped(event.id.clone()),
                events: vec![event.clone()],
            }),
        }
    }

    groups
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckTally {
    pub passed: usize,
    pub failed: usize,
}

/// Aggregates for one execution as shown in the dashboard's group header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub total_events: usize,
    pub passed: usize,
    pub filtered: usize,
    pub execution_time_ms: f64,
    pub filters: BTreeMap<Criterion, CheckTally>,
    pub started_at: Option<DateTime<Utc>>,
}

impl GroupStats {
    pub fn for_execution(events: &[XRayEvent], execution_id: &ExecutionId) -> Self {
        let mut stats = GroupStats::default();

        for event in events
            .iter()
            .filter(|event| event.execution_id.as_ref() == Some(execution_id))
        {
            stats.total_events += 1;
            stats.started_at = Some(match stats.started_at {
                Some(earliest) => earliest.min(event.timestamp),
                None => event.timestamp,
            });

            match &event.payload {
                EventPayload::ProductPassed(_) => stats.passed += 1,
                EventPayload::ProductFiltered(_) => stats.filtered += 1,
                EventPayload::SearchExecuted(summary) => {
                    stats.execution_time_ms = summary.duration_ms;
                }
                EventPayload::FilterApplied(_) | EventPayload::FilterReset(_) => {}
            }

            if let Some(decision) = event.payload.decision() {
                for (criterion, check) in &decision.checks {
                    let tally = stats.filters.entry(*criterion).or_default();
                    if check.passed {
                        tally.passed += 1;
                    } else {
                        tally.failed += 1;
                    }
                }
            }
        }

        stats
    }
}

/// Dashboard search box plus kind dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub text: String,
    pub kind: Option<EventKind>,
}

impl EventQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: None,
        }
    }

    pub fn of_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Case-insensitive match against the reason or the serialized details.
    pub fn matches(&self, event: &XRayEvent) -> bool {
        if self.kind.is_some_and(|kind| kind != event.kind()) {
            return false;
        }
        if self.text.is_empty() {
            return true;
        }

        let needle = self.text.to_lowercase();
        if event.reason.to_lowercase().contains(&needle) {
            return true;
        }

        event
            .payload
            .details_json()
            .map(|json| json.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}
