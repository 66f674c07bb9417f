use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A calendar month. `month` is 1-based (January = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Short English label used by the month picker ("Jan", "Feb", ...).
    #[must_use]
    pub fn label(&self) -> String {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        let name = self
            .month
            .checked_sub(1)
            .and_then(|i| NAMES.get(i as usize))
            .copied()
            .unwrap_or("???");
        format!("{name} {}", self.year)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Inclusive calendar-day range. A missing bound disables the range entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both bounds are set, so the range restricts records.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both bounds set with `start > end`. Such a range matches nothing.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }

    /// Whether `date` passes this range.
    ///
    /// An inactive range passes everything, including undated records.
    /// An active range rejects undated records.
    #[must_use]
    pub fn admits(&self, date: Option<NaiveDate>) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => match date {
                Some(d) => start <= d && d <= end,
                None => false,
            },
            _ => true,
        }
    }
}

/// Quick date filters offered next to the custom range picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePreset {
    Today,
    /// From the most recent Sunday through today
    ThisWeek,
    /// The whole calendar month containing today
    ThisMonth,
    /// From three calendar months ago through today
    LastThreeMonths,
    /// The whole calendar year containing today
    ThisYear,
    Custom(DateRange),
}

impl DatePreset {
    /// Resolve the preset to a concrete range relative to `today`.
    #[must_use]
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self {
            DatePreset::Today => DateRange::new(today, today),
            DatePreset::ThisWeek => {
                let back = i64::from(today.weekday().num_days_from_sunday());
                DateRange::new(today - Duration::days(back), today)
            }
            DatePreset::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|d| d.pred_opt())
                    .unwrap_or(today);
                DateRange::new(first, last)
            }
            DatePreset::LastThreeMonths => {
                let start = today.checked_sub_months(Months::new(3)).unwrap_or(today);
                DateRange::new(start, today)
            }
            DatePreset::ThisYear => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
                DateRange::new(first, last)
            }
            DatePreset::Custom(range) => *range,
        }
    }
}

/// Every user-selected filter on the dashboard.
///
/// The default value selects everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    /// Applied to the expense/earning views, not to the runway set
    pub date_range: Option<DateRange>,

    /// Applied to every view
    pub account_id: Option<String>,

    /// Applied to the runway set only. Empty means all months.
    pub selected_months: BTreeSet<YearMonth>,

    /// Case-insensitive substring match on the category label.
    /// Narrows the category and detail tables only, never totals or runway.
    #[serde(default)]
    pub category_search: Option<String>,
}

impl FilterState {
    /// No predicate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.date_range.is_some_and(|r| r.is_active())
            && self.account_id.is_none()
            && self.selected_months.is_empty()
            && self.search_term().is_none()
    }

    /// The filters behind the expense/earning totals, pies and profit/loss.
    #[must_use]
    pub fn for_main_view(&self) -> FilterState {
        FilterState {
            selected_months: BTreeSet::new(),
            category_search: None,
            ..self.clone()
        }
    }

    /// The filters behind the category and detail tables of the active card.
    #[must_use]
    pub fn for_tables(&self) -> FilterState {
        FilterState {
            selected_months: BTreeSet::new(),
            ..self.clone()
        }
    }

    /// The filters that drive the runway set.
    #[must_use]
    pub fn for_runway(&self) -> FilterState {
        FilterState {
            date_range: None,
            category_search: None,
            ..self.clone()
        }
    }

    /// Number of selected runway months (0 = none selected).
    #[must_use]
    pub fn month_count(&self) -> usize {
        self.selected_months.len()
    }

    /// Add the month if absent, remove it if present.
    pub fn toggle_month(&mut self, month: YearMonth) {
        if !self.selected_months.remove(&month) {
            self.selected_months.insert(month);
        }
    }

    /// Trimmed search term, or `None` when blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.category_search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
