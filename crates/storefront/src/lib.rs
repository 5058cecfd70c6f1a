//! Slam Sports storefront core.
//!
//! A product catalog, the sidebar filter-and-rank engine, and the X-Ray event log that records
//! why each product was shown, ranked, or filtered out.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filtering;
pub mod telemetry;
pub mod xray;
