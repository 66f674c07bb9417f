use serde::{Deserialize, Serialize};

/// Months of sustainability at the current burn rate.
///
/// `Undefined` covers every case where the division has no meaningful
/// answer (zero average expense, NaN or infinite inputs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "months", rename_all = "snake_case")]
pub enum Runway {
    Months(f64),
    Undefined,
}

impl Runway {
    /// Number of months, or `None` when undefined.
    #[must_use]
    pub fn months(&self) -> Option<f64> {
        match self {
            Runway::Months(m) => Some(*m),
            Runway::Undefined => None,
        }
    }

    #[must_use]
    pub fn is_defined(&self) -> bool {
        matches!(self, Runway::Months(_))
    }
}

impl std::fmt::Display for Runway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runway::Months(m) => write!(f, "{m:.1}"),
            Runway::Undefined => write!(f, "N/A"),
        }
    }
}

/// Figures derived from a filtered pair of expense/earning sets.
/// Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub total_expenses: f64,

    pub total_earnings: f64,

    /// total_earnings - total_expenses
    pub profit_loss: f64,

    /// Months the expenses are spread over (selected months, or the default)
    pub month_count: u32,

    /// total_expenses / month_count
    pub average_monthly_expense: f64,

    /// profit_loss / average_monthly_expense
    pub runway: Runway,
}
