use crate::models::metrics::{DerivedMetrics, Runway};
use crate::models::settings::DEFAULT_RUNWAY_MONTHS;

/// Computes profit/loss, average monthly burn and financial runway.
///
/// Values are never clamped or rounded; presentation decides formatting.
pub struct MetricsService {
    default_months: u32,
}

impl MetricsService {
    pub fn new() -> Self {
        Self::with_default_months(DEFAULT_RUNWAY_MONTHS)
    }

    /// Use `months` when the caller has no month selection.
    /// A value of 0 falls back to 12.
    pub fn with_default_months(months: u32) -> Self {
        Self {
            default_months: if months == 0 {
                DEFAULT_RUNWAY_MONTHS
            } else {
                months
            },
        }
    }

    /// Derive every metric from the two totals.
    ///
    /// `month_count` is the number of selected months; 0 means "no selection"
    /// and is replaced by the default month count.
    #[must_use]
    pub fn compute(
        &self,
        total_expenses: f64,
        total_earnings: f64,
        month_count: u32,
    ) -> DerivedMetrics {
        let months = if month_count == 0 {
            self.default_months
        } else {
            month_count
        };
        let profit_loss = total_earnings - total_expenses;
        let average_monthly_expense = total_expenses / f64::from(months);

        DerivedMetrics {
            total_expenses,
            total_earnings,
            profit_loss,
            month_count: months,
            average_monthly_expense,
            runway: Self::runway(profit_loss, average_monthly_expense),
        }
    }

    /// `profit_loss / average_monthly_expense`, or `Undefined` when that
    /// quotient is not a finite number.
    #[must_use]
    pub fn runway(profit_loss: f64, average_monthly_expense: f64) -> Runway {
        if average_monthly_expense == 0.0 {
            return Runway::Undefined;
        }
        let months = profit_loss / average_monthly_expense;
        if months.is_finite() {
            Runway::Months(months)
        } else {
            Runway::Undefined
        }
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}
