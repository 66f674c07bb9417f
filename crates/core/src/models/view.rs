use serde::{Deserialize, Serialize};

use super::record::RecordKind;

/// The chart/card currently driving the detail area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveSelection {
    #[default]
    Expenses,
    Earnings,
    Comparison,
    Runway,
}

impl ActiveSelection {
    /// The record kind whose categories the selection breaks down.
    /// `None` for the comparison and runway cards, which have no category table.
    #[must_use]
    pub fn record_kind(&self) -> Option<RecordKind> {
        match self {
            ActiveSelection::Expenses => Some(RecordKind::Expense),
            ActiveSelection::Earnings => Some(RecordKind::Earning),
            ActiveSelection::Comparison | ActiveSelection::Runway => None,
        }
    }
}

/// Organization-wide figures or a single account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardLevel {
    #[default]
    Organization,
    Account,
}

/// Which detail table is visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "categories", rename_all = "snake_case")]
pub enum DetailView {
    Hidden,
    /// One expanded row
    Single(String),
    /// Checked rows, in the order they were checked
    Multi(Vec<String>),
}

/// Interaction state of the dashboard (everything except filters).
///
/// Transitions return a new value so callers can treat state as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub active_selection: ActiveSelection,

    /// Row expanded with the arrow button
    pub open_detail_category: Option<String>,

    /// Rows checked for the merged detail table, in check order
    pub selected_detail_categories: Vec<String>,

    pub level: DashboardLevel,
}

impl ViewState {
    /// Switch charts. Drill-down state from the previous chart is discarded.
    #[must_use]
    pub fn select(&self, selection: ActiveSelection) -> ViewState {
        ViewState {
            active_selection: selection,
            open_detail_category: None,
            selected_detail_categories: Vec::new(),
            level: self.level,
        }
    }

    /// Check or uncheck a category for the merged detail table.
    #[must_use]
    pub fn toggle_detail_category(&self, category: &str) -> ViewState {
        let mut next = self.clone();
        if let Some(pos) = next
            .selected_detail_categories
            .iter()
            .position(|c| c == category)
        {
            next.selected_detail_categories.remove(pos);
        } else {
            next.selected_detail_categories.push(category.to_string());
        }
        next
    }

    /// Expand a single row; expanding the already open row collapses it.
    #[must_use]
    pub fn expand_category(&self, category: &str) -> ViewState {
        let mut next = self.clone();
        next.open_detail_category = if self.open_detail_category.as_deref() == Some(category) {
            None
        } else {
            Some(category.to_string())
        };
        next
    }

    #[must_use]
    pub fn with_level(&self, level: DashboardLevel) -> ViewState {
        ViewState {
            level,
            ..self.clone()
        }
    }

    /// Resolve which detail table is shown.
    /// Any checked category wins over the expanded row.
    #[must_use]
    pub fn detail_view(&self) -> DetailView {
        if !self.selected_detail_categories.is_empty() {
            DetailView::Multi(self.selected_detail_categories.clone())
        } else if let Some(category) = &self.open_detail_category {
            DetailView::Single(category.clone())
        } else {
            DetailView::Hidden
        }
    }
}
