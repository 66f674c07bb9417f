pub mod errors;
pub mod models;
pub mod services;
pub mod sources;

use chrono::{Datelike, NaiveDate};
use models::{
    access::{AccessLevel, Screen},
    chart::{CategoryRow, DetailRow, Table},
    filter::{DatePreset, DateRange, FilterState, YearMonth},
    load::{FetchTicket, LoadState, RequestTracker},
    metrics::DerivedMetrics,
    record::{FinancialRecord, RecordDraft, RecordKind, RecordSet},
    settings::Settings,
    snapshot::DashboardSnapshot,
    totals::CategoryTotals,
    view::{ActiveSelection, DashboardLevel, DetailView, ViewState},
};
use services::{
    aggregation_service::AggregationService, chart_service::ChartService,
    filter_service::FilterService, metrics_service::MetricsService,
};
use sources::traits::{RecordSource, RoleSource};
use std::collections::BTreeSet;

use errors::CoreError;

/// Main entry point for the dashboard core.
/// Owns the record caches, the filters and the interaction state, and
/// derives every chart and table from them on demand.
#[must_use]
pub struct Dashboard {
    /// Records from the last successful load
    records: RecordSet,
    /// Records from the last accepted runway fetch
    runway_records: RecordSet,
    filters: FilterState,
    view: ViewState,
    roles: Vec<String>,
    load_state: LoadState,
    runway_requests: RequestTracker,
    aggregation_service: AggregationService,
    filter_service: FilterService,
    metrics_service: MetricsService,
    chart_service: ChartService,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("expenses", &self.records.expenses.len())
            .field("earnings", &self.records.earnings.len())
            .field("filters", &self.filters)
            .field("view", &self.view)
            .field("load_state", &self.load_state)
            .finish()
    }
}

impl Dashboard {
    /// Create an empty dashboard. Call [`Dashboard::load`] to fill it.
    pub fn new(settings: &Settings) -> Self {
        Self {
            records: RecordSet::default(),
            runway_records: RecordSet::default(),
            filters: FilterState::default(),
            view: ViewState::default(),
            roles: Vec::new(),
            load_state: LoadState::Idle,
            runway_requests: RequestTracker::new(),
            aggregation_service: AggregationService::new(),
            filter_service: FilterService::new(),
            metrics_service: MetricsService::with_default_months(settings.runway_months()),
            chart_service: ChartService::new(),
        }
    }

    /// Create a dashboard over records that are already in memory.
    pub fn with_records(settings: &Settings, records: RecordSet) -> Self {
        let mut dashboard = Self::new(settings);
        dashboard.runway_records = records.clone();
        dashboard.records = records;
        dashboard.load_state = LoadState::Loaded;
        dashboard
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Fetch all expenses and earnings and reset the view to the expenses card.
    ///
    /// On failure the caches are emptied, the load state becomes `Failed`,
    /// and the error is returned. Pending runway fetches are invalidated.
    pub async fn load<S>(&mut self, source: &S) -> Result<(), CoreError>
    where
        S: RecordSource + ?Sized,
    {
        self.load_state = LoadState::Loading;
        self.runway_requests.cancel_all();

        match Self::fetch_all(source).await {
            Ok(records) => {
                tracing::info!(
                    source = source.name(),
                    expenses = records.expenses.len(),
                    earnings = records.earnings.len(),
                    "dashboard records loaded"
                );
                self.runway_records = records.clone();
                self.records = records;
                self.view = self.view.select(ActiveSelection::Expenses);
                self.load_state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "dashboard load failed");
                self.records = RecordSet::default();
                self.runway_records = RecordSet::default();
                self.load_state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Start a runway re-fetch. Earlier tickets become stale.
    pub fn begin_runway_fetch(&mut self) -> FetchTicket {
        self.runway_requests.begin()
    }

    /// Install the result of a runway fetch.
    ///
    /// Returns `false` (and keeps the current cache) when a newer fetch
    /// was started after `ticket`.
    pub fn complete_runway_fetch(&mut self, ticket: FetchTicket, records: RecordSet) -> bool {
        if !self.runway_requests.is_current(ticket) {
            tracing::warn!(
                generation = ticket.generation(),
                "ignoring stale runway fetch"
            );
            return false;
        }
        self.runway_records = records;
        true
    }

    /// Re-fetch the records behind the runway card.
    /// On failure the previous runway cache stays in place.
    pub async fn refresh_runway<S>(&mut self, source: &S) -> Result<bool, CoreError>
    where
        S: RecordSource + ?Sized,
    {
        let ticket = self.begin_runway_fetch();
        match Self::fetch_all(source).await {
            Ok(records) => Ok(self.complete_runway_fetch(ticket, records)),
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "runway refresh failed");
                Err(e)
            }
        }
    }

    async fn fetch_all<S>(source: &S) -> Result<RecordSet, CoreError>
    where
        S: RecordSource + ?Sized,
    {
        let expenses = source.list_expenses().await?;
        let earnings = source.list_earnings().await?;
        Ok(RecordSet::new(expenses, earnings))
    }

    // ── Interaction ─────────────────────────────────────────────────

    /// Activate a chart card. Clears expanded and checked categories.
    pub fn select(&mut self, selection: ActiveSelection) {
        self.view = self.view.select(selection);
    }

    /// Check or uncheck a category row for the merged detail table.
    pub fn toggle_detail_category(&mut self, category: &str) {
        self.view = self.view.toggle_detail_category(category);
    }

    /// Expand a category row, or collapse it if it is already open.
    pub fn expand_category(&mut self, category: &str) {
        self.view = self.view.expand_category(category);
    }

    /// Switch between organization and account level. Clears the account filter.
    pub fn set_dashboard_level(&mut self, level: DashboardLevel) {
        self.view = self.view.with_level(level);
        self.filters.account_id = None;
    }

    /// Restrict every view to one account. `None` or a blank id shows all accounts.
    ///
    /// Only honored at account level; at organization level the account
    /// filter stays cleared.
    pub fn set_account_filter(&mut self, account_id: Option<String>) {
        if self.view.level == DashboardLevel::Organization {
            tracing::debug!(?account_id, "account filter ignored at organization level");
            return;
        }
        self.filters.account_id = account_id.filter(|id| !id.trim().is_empty());
    }

    /// Restrict the expense/earning views to a date range.
    pub fn apply_date_range(&mut self, range: DateRange) {
        self.filters.date_range = Some(range);
    }

    /// Apply one of the quick date filters relative to `today`.
    pub fn apply_date_preset(&mut self, preset: DatePreset, today: NaiveDate) {
        self.apply_date_range(preset.resolve(today));
    }

    /// Drop the date range and show all records again.
    pub fn reset_date_filter(&mut self) {
        self.filters.date_range = None;
    }

    /// Narrow the category and detail tables by category name.
    pub fn set_category_search(&mut self, term: Option<String>) {
        self.filters.category_search = term;
    }

    /// Add or remove a month from the runway selection.
    pub fn toggle_runway_month(&mut self, month: YearMonth) {
        self.filters.toggle_month(month);
    }

    /// Clear the runway selection, which means "all months".
    pub fn select_all_months(&mut self) {
        self.filters.selected_months = BTreeSet::new();
    }

    /// Replace every filter at once.
    /// The account filter is dropped at organization level.
    pub fn replace_filters(&mut self, mut filters: FilterState) {
        if self.view.level == DashboardLevel::Organization {
            filters.account_id = None;
        }
        self.filters = filters;
    }

    // ── State accessors ─────────────────────────────────────────────

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// All loaded records, unfiltered.
    #[must_use]
    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    // ── Filtered views ──────────────────────────────────────────────

    /// Records of one kind after the date and account filters.
    #[must_use]
    pub fn filtered(&self, kind: RecordKind) -> Vec<&FinancialRecord> {
        self.filter_service
            .apply(self.records.of_kind(kind), &self.filters.for_main_view())
    }

    /// Records of one kind behind the category and detail tables:
    /// the date and account filters plus the category search.
    #[must_use]
    pub fn searched(&self, kind: RecordKind) -> Vec<&FinancialRecord> {
        self.filter_service
            .apply(self.records.of_kind(kind), &self.filters.for_tables())
    }

    #[must_use]
    pub fn filtered_expenses(&self) -> Vec<&FinancialRecord> {
        self.filtered(RecordKind::Expense)
    }

    #[must_use]
    pub fn filtered_earnings(&self) -> Vec<&FinancialRecord> {
        self.filtered(RecordKind::Earning)
    }

    /// Runway records of one kind after the month and account filters.
    #[must_use]
    pub fn runway_filtered(&self, kind: RecordKind) -> Vec<&FinancialRecord> {
        self.filter_service
            .apply(self.runway_records.of_kind(kind), &self.filters.for_runway())
    }

    #[must_use]
    pub fn runway_expenses(&self) -> Vec<&FinancialRecord> {
        self.runway_filtered(RecordKind::Expense)
    }

    #[must_use]
    pub fn runway_earnings(&self) -> Vec<&FinancialRecord> {
        self.runway_filtered(RecordKind::Earning)
    }

    // ── Aggregates ──────────────────────────────────────────────────

    /// Category totals of the filtered records of one kind.
    #[must_use]
    pub fn totals(&self, kind: RecordKind) -> CategoryTotals {
        self.aggregation_service.by_category(self.filtered(kind))
    }

    #[must_use]
    pub fn expense_totals(&self) -> CategoryTotals {
        self.totals(RecordKind::Expense)
    }

    #[must_use]
    pub fn earning_totals(&self) -> CategoryTotals {
        self.totals(RecordKind::Earning)
    }

    /// Totals and profit/loss of the date-filtered view.
    /// The average and runway here use the default month count.
    #[must_use]
    pub fn metrics(&self) -> DerivedMetrics {
        let expenses = self.aggregation_service.total(self.filtered_expenses());
        let earnings = self.aggregation_service.total(self.filtered_earnings());
        self.metrics_service.compute(expenses, earnings, 0)
    }

    /// Burn rate and runway over the selected runway months.
    #[must_use]
    pub fn runway_metrics(&self) -> DerivedMetrics {
        let expenses = self.aggregation_service.total(self.runway_expenses());
        let earnings = self.aggregation_service.total(self.runway_earnings());
        let months = u32::try_from(self.filters.month_count()).unwrap_or(u32::MAX);
        self.metrics_service.compute(expenses, earnings, months)
    }

    /// Distinct account ids across all loaded records, sorted.
    #[must_use]
    pub fn account_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.account_id.as_deref())
            .collect();
        ids.into_iter().map(str::to_string).collect()
    }

    /// Distinct years across all loaded dated records, ascending.
    #[must_use]
    pub fn available_years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .records
            .iter()
            .filter_map(|r| r.date.map(|d| d.year()))
            .collect();
        years.into_iter().collect()
    }

    // ── Tables ──────────────────────────────────────────────────────

    /// Which detail table is visible. Checked categories win over the expanded row.
    #[must_use]
    pub fn detail_view(&self) -> DetailView {
        self.view.detail_view()
    }

    /// Category table of the active card, `None` for comparison/runway.
    #[must_use]
    pub fn category_table(&self) -> Option<Table<CategoryRow>> {
        let kind = self.view.active_selection.record_kind()?;
        let totals = self.aggregation_service.by_category(self.searched(kind));
        Some(self.chart_service.category_table(&totals, &self.view))
    }

    /// Records behind the visible detail view, `None` when no detail is shown.
    #[must_use]
    pub fn detail_table(&self) -> Option<Table<DetailRow>> {
        let kind = self.view.active_selection.record_kind()?;
        let records = self.searched(kind);
        self.chart_service.detail_table(&records, &self.view.detail_view())
    }

    /// Every chart and table payload for the current state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let expense_totals = self.expense_totals();
        let earning_totals = self.earning_totals();
        let metrics = self.metrics_service.compute(
            expense_totals.total(),
            earning_totals.total(),
            0,
        );
        let runway_metrics = self.runway_metrics();

        DashboardSnapshot {
            load_state: self.load_state.clone(),
            view: self.view.clone(),
            filters: self.filters.clone(),
            expenses_pie: self.chart_service.pie(&expense_totals),
            earnings_pie: self.chart_service.pie(&earning_totals),
            metrics,
            runway_metrics,
            comparison_chart: self.chart_service.comparison_bar(&metrics),
            runway_chart: self.chart_service.runway_bar(&runway_metrics.runway),
            category_table: self.category_table(),
            detail_table: self.detail_table(),
            account_ids: self.account_ids(),
            available_years: self.available_years(),
        }
    }

    // ── Access & writes ─────────────────────────────────────────────

    pub fn set_user_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
    }

    /// Fetch the signed-in user's roles. Unknown users end up with no roles.
    pub async fn load_user_roles<R>(&mut self, source: &R, email: &str) -> Result<(), CoreError>
    where
        R: RoleSource + ?Sized,
    {
        self.roles = source.roles_for(email).await?;
        tracing::debug!(%email, roles = self.roles.len(), "user roles loaded");
        Ok(())
    }

    #[must_use]
    pub fn access_level(&self, screen: Screen) -> AccessLevel {
        AccessLevel::from_roles(&self.roles, screen)
    }

    /// Store a new record and add it to the local caches.
    pub async fn create_record<S>(
        &mut self,
        source: &S,
        kind: RecordKind,
        draft: RecordDraft,
    ) -> Result<String, CoreError>
    where
        S: RecordSource + ?Sized,
    {
        self.require_write(kind)?;
        draft.validate()?;
        let id = source.create_record(kind, &draft).await?;
        let record = FinancialRecord::from_draft(id.clone(), kind, draft);
        self.runway_records.of_kind_mut(kind).push(record.clone());
        self.records.of_kind_mut(kind).push(record);
        tracing::info!(%kind, %id, "record created");
        Ok(id)
    }

    /// Replace a stored record and refresh the local caches.
    pub async fn update_record<S>(
        &mut self,
        source: &S,
        kind: RecordKind,
        id: &str,
        draft: RecordDraft,
    ) -> Result<(), CoreError>
    where
        S: RecordSource + ?Sized,
    {
        self.require_write(kind)?;
        draft.validate()?;
        source.update_record(kind, id, &draft).await?;
        let updated = FinancialRecord::from_draft(id, kind, draft);
        for cache in [&mut self.records, &mut self.runway_records] {
            if let Some(slot) = cache.of_kind_mut(kind).iter_mut().find(|r| r.id == id) {
                *slot = updated.clone();
            }
        }
        tracing::info!(%kind, %id, "record updated");
        Ok(())
    }

    /// Delete a stored record and drop it from the local caches.
    pub async fn delete_record<S>(
        &mut self,
        source: &S,
        kind: RecordKind,
        id: &str,
    ) -> Result<(), CoreError>
    where
        S: RecordSource + ?Sized,
    {
        self.require_write(kind)?;
        source.delete_record(kind, id).await?;
        for cache in [&mut self.records, &mut self.runway_records] {
            cache.of_kind_mut(kind).retain(|r| r.id != id);
        }
        tracing::info!(%kind, %id, "record deleted");
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn require_write(&self, kind: RecordKind) -> Result<(), CoreError> {
        let screen = Screen::for_record_kind(kind);
        if self.access_level(screen).can_write() {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(format!(
                "'{}' role required",
                screen.full_access_role()
            )))
        }
    }
}
