use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::criteria::{join_labels, join_ratings, Criterion, FilterCriteria};
use super::scoring::{self, MatchQuality, ScoreBreakdown};
use crate::catalog::{Product, ProductId};

/// Comparison fields captured alongside each decision so traces stay readable on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub sport: String,
    pub category: String,
    pub price: f64,
    pub rating: u8,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            sport: product.sport.clone(),
            category: product.category.clone(),
            price: product.price,
            rating: product.rating,
        }
    }
}

/// Structured evidence behind a single check, one shape per criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "criterion", rename_all = "snake_case")]
pub enum CheckDetails {
    Search {
        search_terms: Vec<String>,
        score_breakdown: ScoreBreakdown,
        match_quality: MatchQuality,
    },
    Sport {
        product_sport: String,
        selected_sports: Vec<String>,
    },
    Brand {
        product_brand: String,
        selected_brands: Vec<String>,
    },
    Category {
        product_category: String,
        selected_categories: Vec<String>,
    },
    Rating {
        product_rating: u8,
        selected_ratings: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    pub reason: String,
    pub details: CheckDetails,
}

/// Complete per-product evaluation record for one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub product: ProductSnapshot,
    pub passed: bool,
    pub score: f64,
    pub checks: BTreeMap<Criterion, CheckResult>,
}

impl Decision {
    pub fn failed_checks(&self) -> Vec<Criterion> {
        self.checks
            .iter()
            .filter(|(_, check)| !check.passed)
            .map(|(criterion, _)| *criterion)
            .collect()
    }

    pub fn score_breakdown(&self) -> Option<&ScoreBreakdown> {
        match self.checks.get(&Criterion::Search).map(|check| &check.details) {
            Some(CheckDetails::Search {
                score_breakdown, ..
            }) => Some(score_breakdown),
            _ => None,
        }
    }

    /// `name: reason` pairs for every failed check, joined for log lines.
    pub fn failure_summary(&self) -> String {
        self.checks
            .iter()
            .filter(|(_, check)| !check.passed)
            .map(|(criterion, check)| format!("{criterion}: {}", check.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Evaluator bound to one criteria set; search terms are tokenized once per execution.
pub struct Evaluator<'a> {
    criteria: &'a FilterCriteria,
    search_terms: Vec<String>,
    distinct_terms: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(criteria: &'a FilterCriteria) -> Self {
        let search_terms = criteria.search_terms();
        let distinct_terms = search_terms.iter().collect::<BTreeSet<_>>().len();
        Self {
            criteria,
            search_terms,
            distinct_terms,
        }
    }

    pub fn search_active(&self) -> bool {
        !self.search_terms.is_empty()
    }

    pub fn evaluate(&self, product: &Product) -> Decision {
        let mut checks = BTreeMap::new();
        let mut score = 0.0;

        if self.search_active() {
            let check = self.search_check(product);
            if let CheckDetails::Search {
                score_breakdown, ..
            } = &check.details
            {
                score = score_breakdown.total_score;
            }
            checks.insert(Criterion::Search, check);
        }

        if !self.criteria.sports.is_empty() {
            checks.insert(
                Criterion::Sport,
                label_check(LabelCheck {
                    noun: "Sport",
                    plural: "sports",
                    value: &product.sport,
                    selected: &self.criteria.sports,
                    details: |value, selected| CheckDetails::Sport {
                        product_sport: value,
                        selected_sports: selected,
                    },
                }),
            );
        }

        if !self.criteria.brands.is_empty() {
            checks.insert(
                Criterion::Brand,
                label_check(LabelCheck {
                    noun: "Brand",
                    plural: "brands",
                    value: &product.brand,
                    selected: &self.criteria.brands,
                    details: |value, selected| CheckDetails::Brand {
                        product_brand: value,
                        selected_brands: selected,
                    },
                }),
            );
        }

        if !self.criteria.categories.is_empty() {
            checks.insert(
                Criterion::Category,
                label_check(LabelCheck {
                    noun: "Category",
                    plural: "categories",
                    value: &product.category,
                    selected: &self.criteria.categories,
                    details: |value, selected| CheckDetails::Category {
                        product_category: value,
                        selected_categories: selected,
                    },
                }),
            );
        }

        if !self.criteria.ratings.is_empty() {
            checks.insert(
                Criterion::Rating,
                rating_check(product.rating, &self.criteria.ratings),
            );
        }

        Decision {
            product: ProductSnapshot::from(product),
            passed: checks.values().all(|check| check.passed),
            score,
            checks,
        }
    }

    fn search_check(&self, product: &Product) -> CheckResult {
        let breakdown = scoring::score(product, &self.search_terms);
        let passed = breakdown.matched_term_count > 0;

        let reason = if passed {
            format!(
                "Matched {}/{} search terms with score {:.1} ({:.1}% relevance). Name: {:.1}, Brand: {:.1}, Sport: {:.1}, Category: {:.1}",
                breakdown.matched_term_count,
                self.distinct_terms,
                breakdown.total_score,
                breakdown.match_percentage,
                breakdown.name_score,
                breakdown.brand_score,
                breakdown.sport_score,
                breakdown.category_score,
            )
        } else {
            format!(
                "Failed: No matches found for search terms: \"{}\"",
                self.search_terms.join("\", \"")
            )
        };

        CheckResult {
            passed,
            reason,
            details: CheckDetails::Search {
                search_terms: self.search_terms.clone(),
                match_quality: breakdown.match_quality(),
                score_breakdown: breakdown,
            },
        }
    }
}

/// Evaluate a single product without reusing tokenized terms across a catalog pass.
pub fn evaluate(product: &Product, criteria: &FilterCriteria) -> Decision {
    Evaluator::new(criteria).evaluate(product)
}

struct LabelCheck<'a, F> {
    noun: &'static str,
    plural: &'static str,
    value: &'a str,
    selected: &'a BTreeSet<String>,
    details: F,
}

fn label_check<F>(check: LabelCheck<'_, F>) -> CheckResult
where
    F: FnOnce(String, Vec<String>) -> CheckDetails,
{
    let LabelCheck {
        noun,
        plural,
        value,
        selected,
        details,
    } = check;
    let passed = selected.contains(value);

    let reason = if passed {
        format!("{noun} \"{value}\" is in selected {plural} filter")
    } else {
        format!(
            "Failed: {noun} \"{value}\" not in [{}]",
            join_labels(selected)
        )
    };

    CheckResult {
        passed,
        reason,
        details: details(value.to_string(), selected.iter().cloned().collect()),
    }
}

fn rating_check(rating: u8, selected: &BTreeSet<u8>) -> CheckResult {
    let passed = selected.contains(&rating);

    let reason = if passed {
        format!("Rating {rating} stars is in selected ratings filter")
    } else {
        format!(
            "Failed: Rating {rating} stars not in [{} stars]",
            join_ratings(selected)
        )
    };

    CheckResult {
        passed,
        reason,
        details: CheckDetails::Rating {
            product_rating: rating,
            selected_ratings: selected.iter().copied().collect(),
        },
    }
}
