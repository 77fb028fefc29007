//! Search/city filtering and aggregate counts over fetched school records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::school::School;

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Active browse filter. `None` or an empty string disables a predicate.
///
/// The term is matched as typed: surrounding whitespace is part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchoolFilter {
    /// Free-text term matched against name, city and address.
    pub term: Option<String>,
    /// Exact city match. `None` means "All Cities".
    pub city: Option<String>,
}

impl SchoolFilter {
    pub fn new(term: Option<String>, city: Option<String>) -> Self {
        Self { term, city }
    }

    /// Whether neither predicate is active.
    pub fn is_empty(&self) -> bool {
        active(&self.term).is_none() && active(&self.city).is_none()
    }

    /// Whether `school` passes both predicates.
    pub fn matches(&self, school: &School) -> bool {
        let term_ok = match active(&self.term) {
            Some(term) => {
                let term = term.to_lowercase();
                school.name.to_lowercase().contains(&term)
                    || school.city.to_lowercase().contains(&term)
                    || school.address.to_lowercase().contains(&term)
            }
            None => true,
        };

        let city_ok = match active(&self.city) {
            Some(city) => school.city.to_lowercase() == city.to_lowercase(),
            None => true,
        };

        term_ok && city_ok
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Records from `schools` that pass `filter`, in their original order.
pub fn apply_filter<'a>(schools: &'a [School], filter: &SchoolFilter) -> Vec<&'a School> {
    schools.iter().filter(|s| filter.matches(s)).collect()
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Counts derived from the full, unfiltered record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchoolStats {
    pub total: usize,
    pub cities: usize,
    pub states: usize,
    pub with_images: usize,
}

impl SchoolStats {
    pub fn from_records(schools: &[School]) -> Self {
        let cities: HashSet<&str> = schools.iter().map(|s| s.city.as_str()).collect();
        let states: HashSet<&str> = schools.iter().map(|s| s.state.as_str()).collect();
        Self {
            total: schools.len(),
            cities: cities.len(),
            states: states.len(),
            with_images: schools.iter().filter(|s| s.has_image()).count(),
        }
    }
}

/// Distinct city values in first-seen order, for the city selector.
pub fn city_options(schools: &[School]) -> Vec<String> {
    let mut seen = HashSet::new();
    schools
        .iter()
        .filter(|s| seen.insert(s.city.as_str()))
        .map(|s| s.city.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
