// ═══════════════════════════════════════════════════════════════════
// Integration Tests — Dashboard facade over a record source
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;

use bizdash_core::errors::CoreError;
use bizdash_core::models::access::{AccessLevel, Screen};
use bizdash_core::models::filter::{DatePreset, DateRange, FilterState, YearMonth};
use bizdash_core::models::load::LoadState;
use bizdash_core::models::metrics::Runway;
use bizdash_core::models::record::{FinancialRecord, RecordDraft, RecordKind, RecordSet};
use bizdash_core::models::settings::Settings;
use bizdash_core::models::view::{ActiveSelection, DashboardLevel, DetailView};
use bizdash_core::sources::memory::InMemoryRecordSource;
use bizdash_core::sources::traits::RecordSource;
use bizdash_core::Dashboard;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn expense(id: &str, category: &str, amount: f64, date: NaiveDate) -> FinancialRecord {
    FinancialRecord::new(id, RecordKind::Expense, category, amount, date)
}

fn earning(id: &str, category: &str, amount: f64, date: NaiveDate) -> FinancialRecord {
    FinancialRecord::new(id, RecordKind::Earning, category, amount, date)
}

/// Two rent payments and one sale.
fn rent_and_sales() -> RecordSet {
    RecordSet::new(
        vec![
            expense("e1", "Rent", 1000.0, d(2024, 1, 5)),
            expense("e2", "Rent", 500.0, d(2024, 2, 5)),
        ],
        vec![earning("g1", "Sales", 2000.0, d(2024, 1, 20))],
    )
}

/// A small company across two accounts and two years.
fn company() -> RecordSet {
    RecordSet::new(
        vec![
            expense("e1", "Rent", 1000.0, d(2024, 1, 5)).with_account("ACC-1"),
            expense("e2", "Rent", 500.0, d(2024, 2, 5)).with_account("ACC-1"),
            expense("e3", "Salaries", 3000.0, d(2024, 1, 31)).with_account("ACC-2"),
            expense("e4", "Utilities", 120.0, d(2024, 2, 10)).with_account("ACC-2"),
            expense("e5", "Marketing", 400.0, d(2023, 12, 1)),
        ],
        vec![
            earning("g1", "Sales", 2000.0, d(2024, 1, 20)).with_account("ACC-1"),
            earning("g2", "Project Revenue", 5000.0, d(2024, 2, 28)).with_account("ACC-2"),
        ],
    )
}

fn full_access() -> Vec<String> {
    vec![
        Screen::ManageExpense.full_access_role(),
        Screen::ManageEarning.full_access_role(),
    ]
}

/// A record source whose every call fails.
struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn list_records(&self, _kind: RecordKind) -> Result<Vec<FinancialRecord>, CoreError> {
        Err(CoreError::FetchFailure {
            source_name: "Failing".into(),
            message: "backend unavailable".into(),
        })
    }

    async fn create_record(
        &self,
        _kind: RecordKind,
        _draft: &RecordDraft,
    ) -> Result<String, CoreError> {
        Err(CoreError::Network("offline".into()))
    }

    async fn update_record(
        &self,
        _kind: RecordKind,
        _id: &str,
        _draft: &RecordDraft,
    ) -> Result<(), CoreError> {
        Err(CoreError::Network("offline".into()))
    }

    async fn delete_record(&self, _kind: RecordKind, _id: &str) -> Result<(), CoreError> {
        Err(CoreError::Network("offline".into()))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════

mod loading {
    use super::*;

    #[test]
    fn new_dashboard_is_idle_and_empty() {
        let dash = Dashboard::new(&Settings::default());
        assert_eq!(dash.load_state(), &LoadState::Idle);
        assert!(dash.records().is_empty());
        assert!(dash.expense_totals().is_empty());
        assert_eq!(dash.metrics().runway, Runway::Undefined);
    }

    #[tokio::test]
    async fn load_fills_caches() {
        let source = InMemoryRecordSource::with_records(company());
        let mut dash = Dashboard::new(&Settings::default());
        dash.load(&source).await.unwrap();

        assert_eq!(dash.load_state(), &LoadState::Loaded);
        assert_eq!(dash.records().expenses.len(), 5);
        assert_eq!(dash.records().earnings.len(), 2);
        assert_eq!(dash.runway_expenses().len(), 5);
    }

    #[tokio::test]
    async fn load_resets_to_expenses_card() {
        let source = InMemoryRecordSource::with_records(company());
        let mut dash = Dashboard::new(&Settings::default());
        dash.select(ActiveSelection::Runway);
        dash.load(&source).await.unwrap();
        assert_eq!(dash.view().active_selection, ActiveSelection::Expenses);
    }

    #[tokio::test]
    async fn failed_load_clears_data() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        let err = dash.load(&FailingSource).await.unwrap_err();

        assert!(matches!(err, CoreError::FetchFailure { .. }));
        match dash.load_state() {
            LoadState::Failed(msg) => assert!(msg.contains("backend unavailable")),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(dash.records().is_empty());
        assert!(dash.runway_expenses().is_empty());
        assert!(dash.snapshot().expenses_pie.is_empty());
    }

    #[tokio::test]
    async fn load_through_trait_object() {
        let source: Box<dyn RecordSource> = Box::new(InMemoryRecordSource::with_records(company()));
        let mut dash = Dashboard::new(&Settings::default());
        dash.load(source.as_ref()).await.unwrap();
        assert_eq!(dash.records().earnings.len(), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Aggregates & metrics
// ═══════════════════════════════════════════════════════════════════

mod aggregates {
    use super::*;

    #[test]
    fn rent_and_sales_scenario() {
        let dash = Dashboard::with_records(&Settings::default(), rent_and_sales());

        let totals = dash.expense_totals();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.get("Rent"), Some(1500.0));

        let m = dash.metrics();
        assert_eq!(m.total_expenses, 1500.0);
        assert_eq!(m.total_earnings, 2000.0);
        assert_eq!(m.profit_loss, 500.0);
    }

    #[test]
    fn runway_over_selected_months() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        dash.toggle_runway_month(YearMonth::new(2024, 1));

        let m = dash.runway_metrics();
        assert_eq!(m.month_count, 1);
        assert_eq!(m.total_expenses, 1000.0);
        assert_eq!(m.total_earnings, 2000.0);
        assert_eq!(m.average_monthly_expense, 1000.0);
        assert_eq!(m.runway, Runway::Months(1.0));
    }

    #[test]
    fn runway_without_selection_uses_default_months() {
        let dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        let m = dash.runway_metrics();
        assert_eq!(m.month_count, 12);
        assert_eq!(m.average_monthly_expense, 125.0);
        assert_eq!(m.runway, Runway::Months(4.0));
    }

    #[test]
    fn configured_default_months() {
        let settings = Settings {
            default_runway_months: 6,
            ..Settings::default()
        };
        let dash = Dashboard::with_records(&settings, rent_and_sales());
        assert_eq!(dash.runway_metrics().month_count, 6);
        assert_eq!(dash.runway_metrics().average_monthly_expense, 250.0);
    }

    #[test]
    fn runway_ignores_date_range() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        dash.apply_date_range(DateRange::new(d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(dash.metrics().total_expenses, 500.0);
        assert_eq!(dash.runway_metrics().total_expenses, 1500.0);
    }

    #[test]
    fn month_selection_does_not_touch_main_view() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        dash.toggle_runway_month(YearMonth::new(2024, 2));
        assert_eq!(dash.metrics().total_expenses, 1500.0);
        assert_eq!(dash.runway_metrics().total_expenses, 500.0);
        dash.select_all_months();
        assert_eq!(dash.runway_metrics().total_expenses, 1500.0);
    }

    #[test]
    fn empty_side_totals_are_positive_zero() {
        let records = RecordSet::new(vec![expense("e1", "Rent", 100.0, d(2024, 1, 1))], vec![]);
        let dash = Dashboard::with_records(&Settings::default(), records);
        let m = dash.metrics();
        assert!(m.total_earnings.is_sign_positive());
        assert!(dash.earning_totals().total().is_sign_positive());

        let json = serde_json::to_value(dash.snapshot()).unwrap();
        assert_eq!(json["metrics"]["total_earnings"].to_string(), "0.0");
    }

    #[test]
    fn no_expenses_means_undefined_runway() {
        let records = RecordSet::new(vec![], vec![earning("g1", "Sales", 10.0, d(2024, 1, 1))]);
        let dash = Dashboard::with_records(&Settings::default(), records);
        let snap = dash.snapshot();
        assert_eq!(snap.runway_metrics.runway, Runway::Undefined);
        assert_eq!(snap.runway_metrics.runway.to_string(), "N/A");
        assert_eq!(snap.runway_chart.series[0].data, vec![None]);
    }

    #[test]
    fn account_ids_and_years() {
        let dash = Dashboard::with_records(&Settings::default(), company());
        assert_eq!(dash.account_ids(), vec!["ACC-1", "ACC-2"]);
        assert_eq!(dash.available_years(), vec![2023, 2024]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Filters
// ═══════════════════════════════════════════════════════════════════

mod filters {
    use super::*;

    #[test]
    fn inverted_range_is_empty_not_error() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        dash.apply_date_range(DateRange::new(d(2024, 3, 1), d(2024, 1, 1)));
        assert!(dash.filtered_expenses().is_empty());
        assert!(dash.filtered_earnings().is_empty());
        assert!(dash.expense_totals().is_empty());
        assert_eq!(dash.metrics().profit_loss, 0.0);
    }

    #[test]
    fn reset_restores_everything() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.apply_date_range(DateRange::new(d(2024, 1, 1), d(2024, 1, 31)));
        assert_eq!(dash.filtered_expenses().len(), 2);
        dash.reset_date_filter();
        assert_eq!(dash.filtered_expenses().len(), 5);
    }

    #[test]
    fn preset_this_month() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.apply_date_preset(DatePreset::ThisMonth, d(2024, 2, 15));
        let ids: Vec<&str> = dash.filtered_expenses().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e4"]);
    }

    #[test]
    fn account_filter_applies_to_both_views() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.set_dashboard_level(DashboardLevel::Account);
        dash.set_account_filter(Some("ACC-2".into()));
        assert_eq!(dash.expense_totals().total(), 3120.0);
        assert_eq!(dash.runway_metrics().total_earnings, 5000.0);
    }

    #[test]
    fn blank_account_clears_filter() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.set_dashboard_level(DashboardLevel::Account);
        dash.set_account_filter(Some("ACC-1".into()));
        dash.set_account_filter(Some("  ".into()));
        assert_eq!(dash.filters().account_id, None);
    }

    #[test]
    fn account_filter_ignored_at_organization_level() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.set_account_filter(Some("ACC-2".into()));
        assert_eq!(dash.filters().account_id, None);
        assert_eq!(dash.expense_totals().total(), 5020.0);
    }

    #[test]
    fn replaced_filters_drop_account_at_organization_level() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.replace_filters(FilterState {
            account_id: Some("ACC-1".into()),
            ..FilterState::default()
        });
        assert_eq!(dash.filters().account_id, None);

        dash.set_dashboard_level(DashboardLevel::Account);
        dash.replace_filters(FilterState {
            account_id: Some("ACC-1".into()),
            ..FilterState::default()
        });
        assert_eq!(dash.filters().account_id.as_deref(), Some("ACC-1"));
        assert_eq!(dash.expense_totals().total(), 1500.0);
    }

    #[test]
    fn level_switch_clears_account() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.set_dashboard_level(DashboardLevel::Account);
        dash.set_account_filter(Some("ACC-1".into()));
        dash.set_dashboard_level(DashboardLevel::Organization);
        assert_eq!(dash.view().level, DashboardLevel::Organization);
        assert_eq!(dash.filters().account_id, None);
    }

    #[test]
    fn category_search_narrows_tables_only() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.set_category_search(Some("sal".into()));

        let table = dash.category_table().unwrap();
        let cats: Vec<&str> = table.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(cats, vec!["Salaries"]);
        assert_eq!(dash.expense_totals().len(), 4);
        assert_eq!(dash.snapshot().expenses_pie.len(), 4);
    }

    #[test]
    fn category_search_narrows_detail_rows() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.toggle_detail_category("Rent");
        dash.toggle_detail_category("Salaries");
        dash.set_category_search(Some("RENT".into()));
        let table = dash.detail_table().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.category == "Rent"));
    }

    #[test]
    fn category_search_leaves_profit_and_runway_alone() {
        let records = RecordSet::new(
            vec![
                expense("e1", "Rent", 1200.0, d(2024, 1, 5)),
                expense("e2", "Salaries", 2400.0, d(2024, 1, 31)),
            ],
            vec![earning("g1", "Sales", 6000.0, d(2024, 1, 20))],
        );
        let mut dash = Dashboard::with_records(&Settings::default(), records);
        let metrics_before = dash.metrics();
        let runway_before = dash.runway_metrics();
        assert_eq!(runway_before.runway, Runway::Months(8.0));

        dash.set_category_search(Some("rent".into()));

        assert_eq!(dash.metrics(), metrics_before);
        assert_eq!(dash.metrics().total_earnings, 6000.0);
        assert_eq!(dash.runway_metrics(), runway_before);
        assert_eq!(dash.snapshot().metrics, metrics_before);
        assert_eq!(dash.earning_totals().get("Sales"), Some(6000.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// View controller
// ═══════════════════════════════════════════════════════════════════

mod view {
    use super::*;

    #[test]
    fn multi_select_suppresses_single_expansion() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.select(ActiveSelection::Earnings);
        dash.expand_category("Sales");
        dash.toggle_detail_category("Project Revenue");

        assert_eq!(
            dash.detail_view(),
            DetailView::Multi(vec!["Project Revenue".into()])
        );
        let table = dash.detail_table().unwrap();
        assert!(table.rows.iter().all(|r| r.category == "Project Revenue"));
    }

    #[test]
    fn single_expansion_shows_category_records() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.expand_category("Rent");
        let table = dash.detail_table().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.kind == RecordKind::Expense));
    }

    #[test]
    fn unchecking_last_category_falls_back_to_expansion() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.expand_category("Rent");
        dash.toggle_detail_category("Salaries");
        dash.toggle_detail_category("Salaries");
        assert_eq!(dash.detail_view(), DetailView::Single("Rent".into()));
    }

    #[test]
    fn switching_cards_clears_detail() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.expand_category("Rent");
        dash.toggle_detail_category("Salaries");
        dash.select(ActiveSelection::Earnings);
        assert_eq!(dash.detail_view(), DetailView::Hidden);
        assert!(dash.detail_table().is_none());
    }

    #[test]
    fn comparison_and_runway_have_no_tables() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.select(ActiveSelection::Comparison);
        assert!(dash.category_table().is_none());
        dash.select(ActiveSelection::Runway);
        assert!(dash.category_table().is_none());
        assert!(dash.detail_table().is_none());
    }

    #[test]
    fn detail_respects_filters() {
        let mut dash = Dashboard::with_records(&Settings::default(), company());
        dash.apply_date_range(DateRange::new(d(2024, 2, 1), d(2024, 2, 29)));
        dash.expand_category("Rent");
        let table = dash.detail_table().unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].date, "2024-02-05");
    }

    #[test]
    fn snapshot_is_consistent() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        dash.toggle_detail_category("Rent");
        let snap = dash.snapshot();

        assert_eq!(snap.load_state, LoadState::Loaded);
        assert_eq!(snap.expenses_pie.len(), 1);
        assert_eq!(snap.earnings_pie[0].name, "Sales");
        assert_eq!(snap.metrics.profit_loss, 500.0);
        assert_eq!(snap.comparison_chart.series[0].data, vec![Some(1500.0)]);
        let table = snap.category_table.unwrap();
        assert!(table.rows[0].selected);
        assert_eq!(snap.detail_table.unwrap().rows.len(), 2);
    }

    #[test]
    fn snapshot_serializes() {
        let dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        let json = serde_json::to_value(dash.snapshot()).unwrap();
        assert_eq!(json["metrics"]["profit_loss"], 500.0);
        assert_eq!(json["load_state"]["state"], "loaded");
        assert_eq!(json["view"]["active_selection"], "expenses");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Runway refetch
// ═══════════════════════════════════════════════════════════════════

mod runway_refetch {
    use super::*;

    #[test]
    fn stale_fetch_is_ignored() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        let old = dash.begin_runway_fetch();
        let new = dash.begin_runway_fetch();

        let newer = RecordSet::new(vec![expense("n1", "Rent", 10.0, d(2024, 1, 1))], vec![]);
        assert!(dash.complete_runway_fetch(new, newer));
        let older = RecordSet::new(vec![expense("o1", "Rent", 99.0, d(2024, 1, 1))], vec![]);
        assert!(!dash.complete_runway_fetch(old, older));

        assert_eq!(dash.runway_metrics().total_expenses, 10.0);
    }

    #[test]
    fn runway_cache_is_separate_from_main() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        let ticket = dash.begin_runway_fetch();
        dash.complete_runway_fetch(ticket, RecordSet::default());
        assert_eq!(dash.metrics().total_expenses, 1500.0);
        assert_eq!(dash.runway_metrics().total_expenses, 0.0);
    }

    #[tokio::test]
    async fn load_cancels_pending_fetch() {
        let source = InMemoryRecordSource::with_records(company());
        let mut dash = Dashboard::new(&Settings::default());
        let ticket = dash.begin_runway_fetch();
        dash.load(&source).await.unwrap();
        assert!(!dash.complete_runway_fetch(ticket, RecordSet::default()));
        assert_eq!(dash.runway_expenses().len(), 5);
    }

    #[tokio::test]
    async fn refresh_picks_up_new_records() {
        let source = InMemoryRecordSource::with_records(rent_and_sales());
        let mut dash = Dashboard::new(&Settings::default());
        dash.load(&source).await.unwrap();

        let draft = RecordDraft::new("Rent", 300.0, d(2024, 3, 5));
        source.create_record(RecordKind::Expense, &draft).await.unwrap();

        assert!(dash.refresh_runway(&source).await.unwrap());
        assert_eq!(dash.runway_metrics().total_expenses, 1800.0);
        assert_eq!(dash.metrics().total_expenses, 1500.0);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_cache() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        assert!(dash.refresh_runway(&FailingSource).await.is_err());
        assert_eq!(dash.runway_metrics().total_expenses, 1500.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Access & writes
// ═══════════════════════════════════════════════════════════════════

mod writes {
    use super::*;

    #[tokio::test]
    async fn roles_come_from_source() {
        let source = InMemoryRecordSource::new();
        source.set_roles("ana@example.com", vec!["ManageExpense:read".into()]);
        let mut dash = Dashboard::new(&Settings::default());
        dash.load_user_roles(&source, "ana@example.com").await.unwrap();
        assert_eq!(dash.access_level(Screen::ManageExpense), AccessLevel::ReadOnly);
        assert_eq!(dash.access_level(Screen::ManageEarning), AccessLevel::None);
    }

    #[tokio::test]
    async fn write_without_full_access_is_denied() {
        let source = InMemoryRecordSource::new();
        let mut dash = Dashboard::new(&Settings::default());
        dash.set_user_roles(vec!["ManageExpense:read".into()]);

        let draft = RecordDraft::new("Rent", 100.0, d(2024, 1, 1));
        let err = dash
            .create_record(&source, RecordKind::Expense, draft)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::PermissionDenied(ref m) if m.contains("ManageExpense:full access")
        ));
        assert!(source.list_expenses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expense_access_does_not_grant_earnings() {
        let source = InMemoryRecordSource::new();
        let mut dash = Dashboard::new(&Settings::default());
        dash.set_user_roles(vec![Screen::ManageExpense.full_access_role()]);
        let draft = RecordDraft::new("Sales", 100.0, d(2024, 1, 1));
        let err = dash
            .create_record(&source, RecordKind::Earning, draft)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_store() {
        let source = InMemoryRecordSource::new();
        let mut dash = Dashboard::new(&Settings::default());
        dash.set_user_roles(full_access());
        let draft = RecordDraft::new("", 100.0, d(2024, 1, 1));
        let err = dash
            .create_record(&source, RecordKind::Expense, draft)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(source.list_expenses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_update_delete_keep_caches_in_sync() {
        let source = InMemoryRecordSource::with_records(rent_and_sales());
        let mut dash = Dashboard::new(&Settings::default());
        dash.load(&source).await.unwrap();
        dash.set_user_roles(full_access());

        let draft = RecordDraft::new("Utilities", 90.0, d(2024, 2, 1));
        let id = dash
            .create_record(&source, RecordKind::Expense, draft)
            .await
            .unwrap();
        assert_eq!(dash.expense_totals().get("Utilities"), Some(90.0));
        assert_eq!(dash.runway_metrics().total_expenses, 1590.0);

        dash.update_record(
            &source,
            RecordKind::Expense,
            &id,
            RecordDraft::new("Utilities", 110.0, d(2024, 2, 1)),
        )
        .await
        .unwrap();
        assert_eq!(dash.expense_totals().get("Utilities"), Some(110.0));
        assert_eq!(source.list_expenses().await.unwrap().len(), 3);

        dash.delete_record(&source, RecordKind::Expense, &id).await.unwrap();
        assert_eq!(dash.expense_totals().get("Utilities"), None);
        assert_eq!(dash.runway_metrics().total_expenses, 1500.0);
        assert_eq!(source.list_expenses().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn store_failure_leaves_caches_untouched() {
        let mut dash = Dashboard::with_records(&Settings::default(), rent_and_sales());
        dash.set_user_roles(full_access());
        let err = dash
            .delete_record(&FailingSource, RecordKind::Expense, "e1")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
        assert_eq!(dash.records().expenses.len(), 2);
    }

    #[tokio::test]
    async fn delete_unknown_record() {
        let source = InMemoryRecordSource::with_records(rent_and_sales());
        let mut dash = Dashboard::new(&Settings::default());
        dash.load(&source).await.unwrap();
        dash.set_user_roles(full_access());
        let err = dash
            .delete_record(&source, RecordKind::Earning, "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::RecordNotFound(_)));
    }
}
