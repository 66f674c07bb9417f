use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::record::{FinancialRecord, RecordDraft, RecordKind};

/// Abstraction over the document store holding expenses and earnings.
///
/// The dashboard only reads through this trait; the record-management
/// screens also write through it. Implementations return fully
/// materialized lists with dates already decoded.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RecordSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Every record of one kind.
    async fn list_records(&self, kind: RecordKind) -> Result<Vec<FinancialRecord>, CoreError>;

    async fn list_expenses(&self) -> Result<Vec<FinancialRecord>, CoreError> {
        self.list_records(RecordKind::Expense).await
    }

    async fn list_earnings(&self) -> Result<Vec<FinancialRecord>, CoreError> {
        self.list_records(RecordKind::Earning).await
    }

    /// Store a new record and return its id.
    async fn create_record(
        &self,
        kind: RecordKind,
        draft: &RecordDraft,
    ) -> Result<String, CoreError>;

    /// Replace the fields of an existing record.
    async fn update_record(
        &self,
        kind: RecordKind,
        id: &str,
        draft: &RecordDraft,
    ) -> Result<(), CoreError>;

    async fn delete_record(&self, kind: RecordKind, id: &str) -> Result<(), CoreError>;
}

/// Looks up the role strings assigned to a signed-in user.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RoleSource: Send + Sync {
    /// Roles of the user with this email; empty when the user is unknown.
    async fn roles_for(&self, email: &str) -> Result<Vec<String>, CoreError>;
}
