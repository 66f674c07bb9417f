use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::CoreError;
use crate::models::record::{FinancialRecord, RecordDraft, RecordKind, RecordSet};
use super::traits::{RecordSource, RoleSource};

/// Process-local record store.
///
/// Used offline, in demos, and as the reference behavior for tests.
/// Ids are random UUIDs.
pub struct InMemoryRecordSource {
    records: Mutex<RecordSet>,
    roles: Mutex<HashMap<String, Vec<String>>>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::with_records(RecordSet::default())
    }

    /// Start with pre-loaded records. Each record's `kind` must match the
    /// list it is placed in.
    pub fn with_records(records: RecordSet) -> Self {
        Self {
            records: Mutex::new(records),
            roles: Mutex::new(HashMap::new()),
        }
    }

    /// Register the roles of a user.
    pub fn set_roles(&self, email: &str, roles: Vec<String>) {
        lock(&self.roles).insert(email.to_string(), roles);
    }

    fn not_found(kind: RecordKind, id: &str) -> CoreError {
        CoreError::RecordNotFound(format!("{kind} {id}"))
    }
}

impl Default for InMemoryRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock, recovering the data from a poisoned mutex.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RecordSource for InMemoryRecordSource {
    fn name(&self) -> &str {
        "InMemory"
    }

    async fn list_records(&self, kind: RecordKind) -> Result<Vec<FinancialRecord>, CoreError> {
        Ok(lock(&self.records).of_kind(kind).to_vec())
    }

    async fn create_record(
        &self,
        kind: RecordKind,
        draft: &RecordDraft,
    ) -> Result<String, CoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let record = FinancialRecord::from_draft(id.clone(), kind, draft.clone());
        lock(&self.records).of_kind_mut(kind).push(record);
        Ok(id)
    }

    async fn update_record(
        &self,
        kind: RecordKind,
        id: &str,
        draft: &RecordDraft,
    ) -> Result<(), CoreError> {
        let mut records = lock(&self.records);
        let slot = records
            .of_kind_mut(kind)
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(kind, id))?;
        *slot = FinancialRecord::from_draft(id, kind, draft.clone());
        Ok(())
    }

    async fn delete_record(&self, kind: RecordKind, id: &str) -> Result<(), CoreError> {
        let mut records = lock(&self.records);
        let list = records.of_kind_mut(kind);
        let before = list.len();
        list.retain(|r| r.id != id);
        if list.len() == before {
            return Err(Self::not_found(kind, id));
        }
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RoleSource for InMemoryRecordSource {
    async fn roles_for(&self, email: &str) -> Result<Vec<String>, CoreError> {
        Ok(lock(&self.roles).get(email).cloned().unwrap_or_default())
    }
}
