use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::filter::YearMonth;

/// Which collection a financial record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Money going out (rent, salaries, licenses, ...)
    Expense,
    /// Money coming in (sales, project revenue, ...)
    Earning,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Expense => write!(f, "Expense"),
            RecordKind::Earning => write!(f, "Earning"),
        }
    }
}

/// A single expense or earning as fetched from the record store.
///
/// Records are immutable once loaded into a session; a re-fetch replaces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Document id in the record store
    pub id: String,

    /// Expense or Earning
    pub kind: RecordKind,

    /// Free-text category label. Compared case-sensitively everywhere.
    pub category: String,

    /// Non-negative amount
    pub amount: f64,

    /// Calendar date of the record.
    /// `None` when the stored value could not be decoded into a date.
    pub date: Option<NaiveDate>,

    /// Account this record is booked against, if any
    #[serde(default)]
    pub account_id: Option<String>,

    /// Project this record is booked against, if any
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl FinancialRecord {
    pub fn new(
        id: impl Into<String>,
        kind: RecordKind,
        category: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            category: category.into(),
            amount,
            date: Some(date),
            account_id: None,
            project_id: None,
            description: None,
        }
    }

    /// Attach an account id.
    #[must_use]
    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build a stored record from a validated draft.
    pub fn from_draft(id: impl Into<String>, kind: RecordKind, draft: RecordDraft) -> Self {
        Self {
            id: id.into(),
            kind,
            category: draft.category,
            amount: draft.amount,
            date: Some(draft.date),
            account_id: draft.account_id,
            project_id: draft.project_id,
            description: draft.description,
        }
    }

    /// Calendar month of the record, if its date is known.
    #[must_use]
    pub fn year_month(&self) -> Option<YearMonth> {
        self.date.map(|d| YearMonth::new(d.year(), d.month()))
    }
}

/// Input for creating or replacing a record in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RecordDraft {
    pub fn new(category: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            category: category.into(),
            amount,
            date,
            account_id: None,
            project_id: None,
            description: None,
        }
    }

    /// Reject drafts the dashboard could not aggregate.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.category.trim().is_empty() {
            return Err(CoreError::ValidationError("Category must not be empty".into()));
        }
        if !self.amount.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Amount must be a finite number, got {}",
                self.amount
            )));
        }
        if self.amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must not be negative, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Expenses and earnings fetched together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub expenses: Vec<FinancialRecord>,
    pub earnings: Vec<FinancialRecord>,
}

impl RecordSet {
    pub fn new(expenses: Vec<FinancialRecord>, earnings: Vec<FinancialRecord>) -> Self {
        Self { expenses, earnings }
    }

    /// Records of one kind.
    #[must_use]
    pub fn of_kind(&self, kind: RecordKind) -> &[FinancialRecord] {
        match kind {
            RecordKind::Expense => &self.expenses,
            RecordKind::Earning => &self.earnings,
        }
    }

    pub fn of_kind_mut(&mut self, kind: RecordKind) -> &mut Vec<FinancialRecord> {
        match kind {
            RecordKind::Expense => &mut self.expenses,
            RecordKind::Earning => &mut self.earnings,
        }
    }

    /// Iterate over expenses followed by earnings.
    pub fn iter(&self) -> impl Iterator<Item = &FinancialRecord> {
        self.expenses.iter().chain(self.earnings.iter())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.earnings.is_empty()
    }
}
