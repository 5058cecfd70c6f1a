use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::scoring::tokenize;

/// One independently togglable filter dimension of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Search,
    Sport,
    Brand,
    Category,
    Rating,
}

impl Criterion {
    pub fn ordered() -> [Criterion; 5] {
        [
            Criterion::Search,
            Criterion::Sport,
            Criterion::Brand,
            Criterion::Category,
            Criterion::Rating,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Search => "search",
            Criterion::Sport => "sport",
            Criterion::Brand => "brand",
            Criterion::Category => "category",
            Criterion::Rating => "rating",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filter selection for a single apply action. Empty sets and an empty search impose no
/// constraint, so `FilterCriteria::default()` lets every product through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterCriteria {
    pub search: String,
    pub sports: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub ratings: BTreeSet<u8>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse criteria posted by the UI layer, rejecting wrong value shapes and unknown keys.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CriteriaError> {
        let criteria: FilterCriteria = serde_json::from_value(value)?;
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sports.insert(sport.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.ratings.insert(rating);
        self
    }

    /// Lowercase, whitespace-split, non-empty search tokens in input order.
    pub fn search_terms(&self) -> Vec<String> {
        tokenize(&self.search)
    }

    /// A search made only of whitespace yields no terms and is treated as no search.
    pub fn is_search_active(&self) -> bool {
        self.search.split_whitespace().next().is_some()
    }

    pub fn is_active(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Search => self.is_search_active(),
            Criterion::Sport => !self.sports.is_empty(),
            Criterion::Brand => !self.brands.is_empty(),
            Criterion::Category => !self.categories.is_empty(),
            Criterion::Rating => !self.ratings.is_empty(),
        }
    }

    pub fn active_criteria(&self) -> Vec<Criterion> {
        Criterion::ordered()
            .into_iter()
            .filter(|criterion| self.is_active(*criterion))
            .collect()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_criteria().is_empty()
    }

    /// Number of individual selections: one for the search box plus one per ticked checkbox.
    pub fn active_filter_count(&self) -> usize {
        usize::from(self.is_search_active())
            + self.sports.len()
            + self.brands.len()
            + self.categories.len()
            + self.ratings.len()
    }

    /// One-line summary such as `search="golf", sports=[Golf, Tennis], ratings=[5 stars]`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.is_search_active() {
            parts.push(format!("search=\"{}\"", self.search.trim()));
        }
        if !self.sports.is_empty() {
            parts.push(format!("sports=[{}]", join_labels(&self.sports)));
        }
        if !self.brands.is_empty() {
            parts.push(format!("brands=[{}]", join_labels(&self.brands)));
        }
        if !self.categories.is_empty() {
            parts.push(format!("categories=[{}]", join_labels(&self.categories)));
        }
        if !self.ratings.is_empty() {
            parts.push(format!("ratings=[{} stars]", join_ratings(&self.ratings)));
        }
        parts.join(", ")
    }

    /// Precondition check run at the filter-apply entry point.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if let Some(rating) = self
            .ratings
            .iter()
            .copied()
            .find(|rating| !(1..=5).contains(rating))
        {
            return Err(CriteriaError::RatingOutOfRange(rating));
        }

        let label_sets = [
            (Criterion::Sport, &self.sports),
            (Criterion::Brand, &self.brands),
            (Criterion::Category, &self.categories),
        ];
        for (criterion, labels) in label_sets {
            if labels.iter().any(|label| label.trim().is_empty()) {
                return Err(CriteriaError::BlankLabel { criterion });
            }
        }

        Ok(())
    }
}

pub(crate) fn join_labels(labels: &BTreeSet<String>) -> String {
    labels.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

pub(crate) fn join_ratings(ratings: &BTreeSet<u8>) -> String {
    ratings
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Precondition violation raised before any product is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
    #[error("malformed filter criteria: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("rating {0} is outside the supported 1-5 star range")]
    RatingOutOfRange(u8),
    #[error("{criterion} filter contains a blank label")]
    BlankLabel { criterion: Criterion },
}
