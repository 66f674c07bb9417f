use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summed amount per category, keyed by the exact category label.
///
/// Iteration order is alphabetical (byte order) so charts and tables render
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<String, f64>);

impl CategoryTotals {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add `amount` to `category`, creating the entry if needed.
    pub fn add(&mut self, category: &str, amount: f64) {
        *self.0.entry(category.to_string()).or_insert(0.0) += amount;
    }

    #[must_use]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    /// Sum of all category totals.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().fold(0.0, |acc, v| acc + v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut totals = CategoryTotals::new();
        for (category, amount) in iter {
            totals.add(&category, amount);
        }
        totals
    }
}
