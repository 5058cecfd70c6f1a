use crate::cli::CatalogArgs;
use crate::infra::{load_catalog, CatalogSource};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use storefront::catalog::Catalog;
use storefront::config::AppConfig;
use storefront::error::AppError;
use storefront::filtering::{Execution, FilterCriteria, RankedProduct, StorefrontSession};
use storefront::xray::{
    EventKind, EventQuery, ExecutionId, GroupKey, InMemoryTraceSink, Trace, TraceEntry,
};

/// Rows printed per result list; the full set is always available through `--json`.
const RESULT_PREVIEW: usize = 10;
const FAILURE_PREVIEW: usize = 5;

#[derive(Args, Debug)]
pub(crate) struct FilterArgs {
    /// Free-text search over name, brand, sport, and category
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Sport to include (repeatable)
    #[arg(long = "sport")]
    pub(crate) sports: Vec<String>,
    /// Brand to include (repeatable)
    #[arg(long = "brand")]
    pub(crate) brands: Vec<String>,
    /// Category to include (repeatable)
    #[arg(long = "category")]
    pub(crate) categories: Vec<String>,
    /// Star rating to include, 1-5 (repeatable)
    #[arg(long = "rating", value_parser = crate::infra::parse_rating)]
    pub(crate) ratings: Vec<u8>,
    /// Print the per-product decision trace after the results
    #[arg(long)]
    pub(crate) trace: bool,
    /// Emit results and trace as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.clone().unwrap_or_default(),
            sports: self.sports.iter().cloned().collect(),
            brands: self.brands.iter().cloned().collect(),
            categories: self.categories.iter().cloned().collect(),
            ratings: self.ratings.iter().copied().collect(),
        }
    }
}

#[derive(Serialize)]
struct FilterReport<'a> {
    execution_id: &'a ExecutionId,
    criteria: &'a FilterCriteria,
    results: &'a [RankedProduct],
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a Trace>,
}

fn open_session(
    config: &AppConfig,
    args: &CatalogArgs,
) -> Result<(StorefrontSession<Catalog, InMemoryTraceSink>, CatalogSource), AppError> {
    let (catalog, source) = load_catalog(config, args)?;
    let sink = Arc::new(InMemoryTraceSink::new(config.xray.max_events));
    Ok((StorefrontSession::new(Arc::new(catalog), sink), source))
}

pub(crate) fn run_filter(config: &AppConfig, args: FilterArgs) -> Result<(), AppError> {
    let (mut session, source) = open_session(config, &args.catalog)?;
    let criteria = args.criteria();
    let execution = session.apply(criteria.clone())?;

    if args.json {
        let report = FilterReport {
            execution_id: execution.execution_id(),
            criteria: &criteria,
            results: &execution.results,
            trace: args.trace.then_some(&execution.trace),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Storefront filter ({source})");
    let description = criteria.describe();
    if description.is_empty() {
        println!("Criteria: none");
    } else {
        println!("Criteria: {description}");
    }
    render_results(&execution, usize::MAX);
    if args.trace {
        render_trace(&execution.trace);
    }

    Ok(())
}

pub(crate) fn run_facets(config: &AppConfig, args: &CatalogArgs) -> Result<(), AppError> {
    let (session, source) = open_session(config, args)?;
    let facets = session.facets()?;

    println!("Filter options ({source})");
    println!("Sports: {}", facets.sports.join(", "));
    println!("Brands: {}", facets.brands.join(", "));
    println!("Categories: {}", facets.categories.join(", "));
    println!("Ratings: 1, 2, 3, 4, 5 stars");

    Ok(())
}

pub(crate) fn run_demo(config: &AppConfig, args: &CatalogArgs) -> Result<(), AppError> {
    let (mut session, source) = open_session(config, args)?;
    println!("Storefront X-Ray demo ({source})");

    println!("\n1. Browse the full catalog");
    render_results(&session.refresh()?, RESULT_PREVIEW);

    let search = FilterCriteria::new().with_search("running shoes");
    println!("\n2. Search: {}", search.describe());
    render_results(&session.apply(search)?, RESULT_PREVIEW);

    let narrowed = FilterCriteria::new()
        .with_search("running shoes")
        .with_sport("Running")
        .with_rating(4)
        .with_rating(5);
    println!("\n3. Narrow: {}", narrowed.describe());
    let execution = session.apply(narrowed)?;
    render_results(&execution, RESULT_PREVIEW);
    render_trace_excerpt(&execution.trace);

    println!("\n4. Reset all filters");
    render_results(&session.reset()?, RESULT_PREVIEW);

    render_dashboard(session.sink());
    Ok(())
}

fn render_results(execution: &Execution, limit: usize) {
    let summary = &execution.trace.summary;
    println!(
        "- {} of {} products shown ({} filtered) in {:.2} ms [{}]",
        summary.passed_count,
        summary.total_products,
        summary.filtered_count,
        summary.duration_ms,
        execution.execution_id()
    );

    for ranked in execution.results.iter().take(limit) {
        let product = &ranked.product;
        println!(
            "  #{:<3} {:<52} {:<18} ${:>7.2}  {}★  score {:.1}",
            ranked.rank, product.name, product.brand, product.price, product.rating, ranked.score
        );
    }
    if execution.results.len() > limit {
        println!("  ... {} more", execution.results.len() - limit);
    }
}

fn render_trace(trace: &Trace) {
    println!("\nDecision trace {}", trace.execution_id);
    for entry in &trace.entries {
        match entry {
            TraceEntry::Passed(details) => {
                let quality = details
                    .score_breakdown
                    .as_ref()
                    .map(|breakdown| format!(", {} match", breakdown.match_quality().label()))
                    .unwrap_or_default();
                println!(
                    "  PASS #{} {} (score {:.1}{quality})",
                    details.rank, details.decision.product.name, details.score
                );
                for (criterion, check) in &details.decision.checks {
                    println!("       {criterion}: {}", check.reason);
                }
            }
            TraceEntry::Filtered(details) => {
                println!(
                    "  DROP    {}: {}",
                    details.decision.product.name,
                    details.decision.failure_summary()
                );
            }
        }
    }
    println!("  {}", trace.summary_reason());
}

fn render_trace_excerpt(trace: &Trace) {
    if let Some(top) = trace.passed().next() {
        println!("  Top match: {}", top.decision.product.name);
        for (criterion, check) in &top.decision.checks {
            println!("    - {criterion}: {}", check.reason);
        }
    }
    if let Some(dropped) = trace.filtered().next() {
        println!(
            "  First rejection: {} -> {}",
            dropped.decision.product.name,
            dropped.decision.failure_summary()
        );
    }
}

fn render_dashboard(sink: &InMemoryTraceSink) {
    let stats = sink.stats();
    println!(
        "\nX-Ray dashboard: {} events retained (capacity {}, {} evicted)",
        stats.total_events,
        sink.capacity(),
        stats.evicted
    );
    for kind in EventKind::ordered() {
        println!("- {:<17} {}", kind.label(), stats.count(kind));
    }

    println!("\nTimeline");
    for group in sink.grouped() {
        match (&group.key, group.stats()) {
            (GroupKey::Execution(id), Some(group_stats)) => {
                let started = group_stats
                    .started_at
                    .map(|at| at.format("%H:%M:%S%.3f").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "- {started} execution {id}: {} passed / {} filtered in {:.2} ms",
                    group_stats.passed, group_stats.filtered, group_stats.execution_time_ms
                );
                for (criterion, tally) in &group_stats.filters {
                    println!(
                        "    {criterion}: {} passed, {} failed",
                        tally.passed, tally.failed
                    );
                }
            }
            _ => {
                for event in &group.events {
                    println!(
                        "- {} {}: {}",
                        event.timestamp.format("%H:%M:%S%.3f"),
                        event.kind(),
                        event.reason
                    );
                }
            }
        }
    }

    println!("\nRecent failures");
    if stats.recent_failures.is_empty() {
        println!("- none");
    }
    for event in stats.recent_failures.iter().take(FAILURE_PREVIEW) {
        println!("- {}", event.reason);
    }

    let query = EventQuery::text("running").of_kind(EventKind::FilterApplied);
    let matches = sink.query(&query);
    println!(
        "\nQuery \"{}\" on {}: {} match(es)",
        query.text,
        EventKind::FilterApplied,
        matches.len()
    );
    for event in matches {
        println!("- {}", event.reason);
    }
}
