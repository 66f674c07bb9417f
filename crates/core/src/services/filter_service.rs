use crate::models::filter::{DateRange, FilterState, YearMonth};
use crate::models::record::FinancialRecord;
use std::collections::BTreeSet;

/// Applies the dashboard filters to a record list.
///
/// Every active predicate must hold (logical AND). Inactive predicates are
/// skipped, so the default `FilterState` returns the input unchanged.
/// Nothing here fails: records with undecodable dates simply do not match
/// date or month predicates.
pub struct FilterService;

impl FilterService {
    pub fn new() -> Self {
        Self
    }

    /// Records satisfying every active predicate in `state`, in input order.
    #[must_use]
    pub fn apply<'a>(
        &self,
        records: &'a [FinancialRecord],
        state: &FilterState,
    ) -> Vec<&'a FinancialRecord> {
        if state.date_range.is_some_and(|r| r.is_inverted()) {
            tracing::debug!(range = ?state.date_range, "inverted date range matches nothing");
            return Vec::new();
        }

        let search = state.search_term().map(str::to_lowercase);
        let filtered: Vec<&FinancialRecord> = records
            .iter()
            .filter(|r| Self::matches_date(r, state.date_range.as_ref()))
            .filter(|r| Self::matches_account(r, state.account_id.as_deref()))
            .filter(|r| Self::matches_months(r, &state.selected_months))
            .filter(|r| Self::matches_search(r, search.as_deref()))
            .collect();

        tracing::debug!(
            input = records.len(),
            output = filtered.len(),
            "filter pipeline applied"
        );
        filtered
    }

    /// Records inside the inclusive range. Undated records are excluded
    /// only when the range is active.
    #[must_use]
    pub fn by_date_range<'a>(
        &self,
        records: &'a [FinancialRecord],
        range: &DateRange,
    ) -> Vec<&'a FinancialRecord> {
        let state = FilterState {
            date_range: Some(*range),
            ..FilterState::default()
        };
        self.apply(records, &state)
    }

    /// Records booked against `account_id`.
    #[must_use]
    pub fn by_account<'a>(
        &self,
        records: &'a [FinancialRecord],
        account_id: &str,
    ) -> Vec<&'a FinancialRecord> {
        records
            .iter()
            .filter(|r| Self::matches_account(r, Some(account_id)))
            .collect()
    }

    /// Records whose month is one of `months`. An empty set selects all.
    #[must_use]
    pub fn by_months<'a>(
        &self,
        records: &'a [FinancialRecord],
        months: &BTreeSet<YearMonth>,
    ) -> Vec<&'a FinancialRecord> {
        records
            .iter()
            .filter(|r| Self::matches_months(r, months))
            .collect()
    }

    fn matches_date(record: &FinancialRecord, range: Option<&DateRange>) -> bool {
        match range {
            Some(range) => range.admits(record.date),
            None => true,
        }
    }

    fn matches_account(record: &FinancialRecord, account_id: Option<&str>) -> bool {
        match account_id {
            Some(wanted) => record.account_id.as_deref() == Some(wanted),
            None => true,
        }
    }

    fn matches_months(record: &FinancialRecord, months: &BTreeSet<YearMonth>) -> bool {
        if months.is_empty() {
            return true;
        }
        record.year_month().is_some_and(|ym| months.contains(&ym))
    }

    /// `lowered_term` must already be lower-cased.
    fn matches_search(record: &FinancialRecord, lowered_term: Option<&str>) -> bool {
        match lowered_term {
            Some(term) => record.category.to_lowercase().contains(term),
            None => true,
        }
    }
}

impl Default for FilterService {
    fn default() -> Self {
        Self::new()
    }
}
