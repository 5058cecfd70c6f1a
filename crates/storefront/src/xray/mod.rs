//! X-Ray: the developer-facing log of every filtering decision.
//!
//! Executions hand complete [`Trace`]s to a [`TraceSink`]; the dashboard reads them back through
//! [`InMemoryTraceSink`] grouped by execution.

pub mod dashboard;
pub mod event;
mod sink;
mod trace;

pub use dashboard::{
    group_events, CheckTally, EventQuery, ExecutionGroup, GroupKey, GroupStats, SinkStats,
    RECENT_FAILURE_LIMIT,
};
pub use event::{
    EventContext, EventId, EventKind, EventPayload, ExecutionId, FilterAppliedDetails,
    FilterResetDetails, FilteredDetails, PassedDetails, SearchSummaryDetails, XRayEvent,
};
pub use sink::{InMemoryTraceSink, Listener, SubscriptionId, TraceSink};
pub use trace::{Trace, TraceEntry};
