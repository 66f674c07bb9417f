use crate::models::record::FinancialRecord;
use crate::models::totals::CategoryTotals;

/// Reduces a flat list of records into per-category sums.
///
/// Categories are compared by exact string equality: "Rent" and "rent"
/// are two different categories.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Sum amounts per category. Empty input yields empty totals.
    #[must_use]
    pub fn by_category<'a, I>(&self, records: I) -> CategoryTotals
    where
        I: IntoIterator<Item = &'a FinancialRecord>,
    {
        let mut totals = CategoryTotals::new();
        for record in records {
            totals.add(&record.category, record.amount);
        }
        totals
    }

    /// Sum of all amounts. `0.0` (never `-0.0`) for empty input.
    #[must_use]
    pub fn total<'a, I>(&self, records: I) -> f64
    where
        I: IntoIterator<Item = &'a FinancialRecord>,
    {
        records.into_iter().fold(0.0, |acc, r| acc + r.amount)
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
