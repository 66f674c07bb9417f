use serde::{Deserialize, Serialize};

use super::record::RecordKind;

/// One slice of a category pie chart.
///
/// The core computes these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    /// Category label
    pub name: String,

    /// Summed amount for the category
    pub value: f64,
}

/// Payload for the comparison and runway bar charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    /// Legend labels, one per series
    pub labels: Vec<String>,

    /// Y axis title (e.g., "Amount", "Months")
    pub y_axis_name: String,

    /// Unit suffix for axis ticks (e.g., "$")
    pub y_axis_unit: String,

    /// Explicit axis bounds, when the chart needs them
    pub y_axis: Option<AxisBounds>,

    pub series: Vec<BarSeries>,
}

/// A named series of bar values.
///
/// A `None` value is a point that cannot be drawn (e.g., undefined runway).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

/// Column descriptor for a tabular payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Text shown in the header cell
    pub header: String,

    /// Row field the column reads
    pub accessor: String,
}

impl TableColumn {
    pub fn new(header: &str, accessor: &str) -> Self {
        Self {
            header: header.to_string(),
            accessor: accessor.to_string(),
        }
    }
}

/// Generic `{columns, rows}` table consumed by the table widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table<R> {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<R>,
}

/// A row in the per-category summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub amount: f64,

    /// Checked in the multi-select column
    pub selected: bool,

    /// Expanded via the row's arrow button
    pub expanded: bool,
}

/// A row in the record detail table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub kind: RecordKind,
    pub category: String,

    /// Formatted date, "N/A" for records whose date could not be decoded
    pub date: String,

    pub amount: f64,
    pub account_id: Option<String>,
    pub description: String,
}
