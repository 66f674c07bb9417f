use crate::models::chart::{
    AxisBounds, BarChart, BarSeries, CategoryRow, DetailRow, PieSlice, Table, TableColumn,
};
use crate::models::metrics::{DerivedMetrics, Runway};
use crate::models::record::FinancialRecord;
use crate::models::totals::CategoryTotals;
use crate::models::view::{DetailView, ViewState};

/// Padding added around the runway bar so the bar never touches the frame.
const RUNWAY_AXIS_PADDING: f64 = 5.0;

const NO_DESCRIPTION: &str = "No description available";

/// Turns aggregated data into chart and table payloads.
///
/// The core computes all the numbers; the frontend only renders.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// One slice per category, in category order.
    #[must_use]
    pub fn pie(&self, totals: &CategoryTotals) -> Vec<PieSlice> {
        totals
            .iter()
            .map(|(name, value)| PieSlice {
                name: name.to_string(),
                value,
            })
            .collect()
    }

    /// Expenses vs. earnings bars.
    #[must_use]
    pub fn comparison_bar(&self, metrics: &DerivedMetrics) -> BarChart {
        BarChart {
            labels: vec!["Expenses".into(), "Earnings".into()],
            y_axis_name: "Amount".into(),
            y_axis_unit: "$".into(),
            y_axis: None,
            series: vec![
                BarSeries {
                    name: "Expenses".into(),
                    data: vec![Some(metrics.total_expenses)],
                },
                BarSeries {
                    name: "Earnings".into(),
                    data: vec![Some(metrics.total_earnings)],
                },
            ],
        }
    }

    /// Single runway bar with bounds that always include zero.
    /// An undefined runway is drawn as a missing point.
    #[must_use]
    pub fn runway_bar(&self, runway: &Runway) -> BarChart {
        let value = runway.months();
        let m = value.unwrap_or(0.0);
        BarChart {
            labels: vec!["Financial Runway".into()],
            y_axis_name: "Months".into(),
            y_axis_unit: String::new(),
            y_axis: Some(AxisBounds {
                min: m.min(0.0) - RUNWAY_AXIS_PADDING,
                max: m.max(0.0) + RUNWAY_AXIS_PADDING,
            }),
            series: vec![BarSeries {
                name: "Financial Runway".into(),
                data: vec![value],
            }],
        }
    }

    /// Per-category summary table with the row selection flags.
    #[must_use]
    pub fn category_table(&self, totals: &CategoryTotals, view: &ViewState) -> Table<CategoryRow> {
        let rows = totals
            .iter()
            .map(|(category, amount)| CategoryRow {
                category: category.to_string(),
                amount,
                selected: view.selected_detail_categories.iter().any(|c| c == category),
                expanded: view.open_detail_category.as_deref() == Some(category),
            })
            .collect();

        Table {
            columns: vec![
                TableColumn::new("Select", "select"),
                TableColumn::new("Category", "category"),
                TableColumn::new("Amount", "amount"),
                TableColumn::new("Description", "description"),
            ],
            rows,
        }
    }

    /// Record table for the visible detail view, or `None` when hidden.
    ///
    /// Multi-select rows are grouped by category in selection order.
    #[must_use]
    pub fn detail_table(
        &self,
        records: &[&FinancialRecord],
        detail: &DetailView,
    ) -> Option<Table<DetailRow>> {
        let categories: Vec<&str> = match detail {
            DetailView::Hidden => return None,
            DetailView::Single(category) => vec![category.as_str()],
            DetailView::Multi(categories) => categories.iter().map(String::as_str).collect(),
        };

        let mut rows = Vec::new();
        for category in categories {
            rows.extend(
                records
                    .iter()
                    .filter(|r| r.category == category)
                    .map(|r| Self::detail_row(r)),
            );
        }

        Some(Table {
            columns: vec![
                TableColumn::new("Type", "kind"),
                TableColumn::new("Category", "category"),
                TableColumn::new("Date", "date"),
                TableColumn::new("Amount", "amount"),
                TableColumn::new("Account ID", "account_id"),
                TableColumn::new("Description", "description"),
            ],
            rows,
        })
    }

    fn detail_row(record: &FinancialRecord) -> DetailRow {
        DetailRow {
            kind: record.kind,
            category: record.category.clone(),
            date: record
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            amount: record.amount,
            account_id: record.account_id.clone(),
            description: record
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(NO_DESCRIPTION)
                .to_string(),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
