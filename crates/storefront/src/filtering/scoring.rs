use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

pub const NAME_WEIGHT: f64 = 10.0;
pub const BRAND_WEIGHT: f64 = 6.0;
pub const SPORT_WEIGHT: f64 = 4.0;
pub const CATEGORY_WEIGHT: f64 = 3.0;

/// Highest score a single term can earn across all four fields.
pub const MAX_SCORE_PER_TERM: f64 = NAME_WEIGHT + BRAND_WEIGHT + SPORT_WEIGHT + CATEGORY_WEIGHT;

/// Per-field relevance of one product against a tokenized search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub name_score: f64,
    pub brand_score: f64,
    pub sport_score: f64,
    pub category_score: f64,
    pub total_score: f64,
    pub max_possible_score: f64,
    pub match_percentage: f64,
    pub matched_term_count: usize,
    pub search_terms: Vec<String>,
}

impl ScoreBreakdown {
    fn empty() -> Self {
        Self {
            name_score: 0.0,
            brand_score: 0.0,
            sport_score: 0.0,
            category_score: 0.0,
            total_score: 0.0,
            max_possible_score: 0.0,
            match_percentage: 0.0,
            matched_term_count: 0,
            search_terms: Vec::new(),
        }
    }

    pub fn match_quality(&self) -> MatchQuality {
        MatchQuality::from_percentage(self.match_percentage)
    }
}

/// Coarse display bucket derived from the match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    High,
    Medium,
    Low,
}

impl MatchQuality {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 50.0 {
            MatchQuality::High
        } else if percentage >= 25.0 {
            MatchQuality::Medium
        } else {
            MatchQuality::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchQuality::High => "high",
            MatchQuality::Medium => "medium",
            MatchQuality::Low => "low",
        }
    }
}

/// Lowercase the raw search box contents and split on whitespace.
pub fn tokenize(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

struct WeightedField {
    text: String,
    weight: f64,
}

impl WeightedField {
    fn new(value: &str, weight: f64) -> Self {
        Self {
            text: value.to_lowercase(),
            weight,
        }
    }

    /// Whole-word hits earn the full weight, substring hits half of it.
    fn contribution(&self, term: &str) -> f64 {
        if self.text.split_whitespace().any(|word| word == term) {
            self.weight
        } else if self.text.contains(term) {
            self.weight * 0.5
        } else {
            0.0
        }
    }

    fn contains(&self, term: &str) -> bool {
        self.text.contains(term)
    }
}

/// Score `product` against already-tokenized `search_terms`.
pub fn score(product: &Product, search_terms: &[String]) -> ScoreBreakdown {
    if search_terms.is_empty() {
        return ScoreBreakdown::empty();
    }

    let fields = [
        WeightedField::new(&product.name, NAME_WEIGHT),
        WeightedField::new(&product.brand, BRAND_WEIGHT),
        WeightedField::new(&product.sport, SPORT_WEIGHT),
        WeightedField::new(&product.category, CATEGORY_WEIGHT),
    ];

    let mut field_scores = [0.0f64; 4];
    for term in search_terms {
        for (slot, field) in field_scores.iter_mut().zip(&fields) {
            *slot += field.contribution(term);
        }
    }

    // Substring containment in any field counts; exact-word matching only affects weights.
    let matched_term_count = search_terms
        .iter()
        .filter(|term| fields.iter().any(|field| field.contains(term)))
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .len();

    let [name_score, brand_score, sport_score, category_score] = field_scores;
    let total_score = name_score + brand_score + sport_score + category_score;
    let max_possible_score = search_terms.len() as f64 * MAX_SCORE_PER_TERM;

    ScoreBreakdown {
        name_score,
        brand_score,
        sport_score,
        category_score,
        total_score,
        max_possible_score,
        match_percentage: total_score / max_possible_score * 100.0,
        matched_term_count,
        search_terms: search_terms.to_vec(),
    }
}
