//! Filter-and-rank engine behind the storefront sidebar.
//!
//! [`scoring`] rates a product against search terms, [`evaluation`] turns one product plus the
//! active criteria into a [`Decision`], and [`FilterEngine`] runs the whole catalog, ranks the
//! survivors, and hands the resulting trace to the X-Ray sink.

pub mod criteria;
pub mod engine;
pub mod evaluation;
pub mod scoring;
pub mod session;

#[cfg(test)]
mod tests;

pub use criteria::{CriteriaError, Criterion, FilterCriteria};
pub use engine::{Execution, FilterEngine, RankedProduct};
pub use evaluation::{evaluate, CheckDetails, CheckResult, Decision, Evaluator, ProductSnapshot};
pub use scoring::{score, tokenize, MatchQuality, ScoreBreakdown};
pub use session::{StorefrontError, StorefrontSession};
