use serde::{Deserialize, Serialize};

use super::chart::{BarChart, CategoryRow, DetailRow, PieSlice, Table};
use super::filter::FilterState;
use super::load::LoadState;
use super::metrics::DerivedMetrics;
use super::view::ViewState;

/// Everything the dashboard page renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub load_state: LoadState,
    pub view: ViewState,
    pub filters: FilterState,

    pub expenses_pie: Vec<PieSlice>,
    pub earnings_pie: Vec<PieSlice>,

    /// Totals and profit/loss of the date-filtered view
    pub metrics: DerivedMetrics,

    /// Totals, burn rate and runway of the month-filtered view
    pub runway_metrics: DerivedMetrics,

    pub comparison_chart: BarChart,
    pub runway_chart: BarChart,

    /// Present only while the expenses or earnings card is active
    pub category_table: Option<Table<CategoryRow>>,

    /// Present only while a category is expanded or checked
    pub detail_table: Option<Table<DetailRow>>,

    /// Choices for the account picker
    pub account_ids: Vec<String>,

    /// Years offered by the runway month picker
    pub available_years: Vec<i32>,
}
