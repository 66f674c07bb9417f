use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::record::{FinancialRecord, RecordDraft, RecordKind};
use crate::models::settings::Settings;
use super::codec::{self, Document, Value};
use super::traits::{RecordSource, RoleSource};

const SOURCE_NAME: &str = "Firestore";

/// Cloud Firestore record store, accessed through the REST v1 API.
///
/// - **Reads**: paged `documents.list` on the expenses/earnings collections
/// - **Writes**: `createDocument`, masked `patch`, `delete`
/// - **Roles**: `runQuery` on the users collection, matched by email
///
/// Authentication is the project's web API key; security rules apply.
pub struct FirestoreSource {
    client: Client,
    settings: Settings,
}

impl FirestoreSource {
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        if settings.project_id.trim().is_empty() {
            return Err(CoreError::Config("project_id is required for Firestore".into()));
        }
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Ok(Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            settings,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.project_id,
            self.settings.database,
        )
    }

    fn collection(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Expense => &self.settings.expenses_collection,
            RecordKind::Earning => &self.settings.earnings_collection,
        }
    }

    fn collection_url(&self, kind: RecordKind) -> String {
        format!("{}/{}", self.documents_url(), self.collection(kind))
    }

    fn document_url(&self, kind: RecordKind, id: &str) -> String {
        format!("{}/{}", self.collection_url(kind), id)
    }

    fn with_key(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.settings.api_key {
            Some(key) => req.query(&[("key", key)]),
            None => req,
        }
    }

    /// Map a non-success response to an error, keeping Firestore's message.
    async fn check(resp: Response, what: &str) -> Result<Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        if status == StatusCode::NOT_FOUND {
            return Err(CoreError::RecordNotFound(format!("{what}: {message}")));
        }
        Err(CoreError::Api {
            source_name: SOURCE_NAME.into(),
            message: format!("{what} failed with {status}: {message}"),
        })
    }
}

// ── Firestore REST response types ───────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RunQueryItem {
    document: Option<Document>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest {
    structured_query: serde_json::Value,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RecordSource for FirestoreSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn list_records(&self, kind: RecordKind) -> Result<Vec<FinancialRecord>, CoreError> {
        let url = self.collection_url(kind);
        let page_size = self.settings.page_size.to_string();
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self.client.get(&url).query(&[("pageSize", page_size.as_str())]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }
            let resp = self.with_key(req).send().await?;
            let resp = Self::check(resp, &format!("listing {}", self.collection(kind)))
                .await
                .map_err(|e| CoreError::FetchFailure {
                    source_name: SOURCE_NAME.into(),
                    message: e.to_string(),
                })?;
            let page: ListResponse = resp.json().await.map_err(|e| CoreError::FetchFailure {
                source_name: SOURCE_NAME.into(),
                message: format!("Failed to parse {} page: {e}", self.collection(kind)),
            })?;

            for doc in &page.documents {
                match codec::decode_record(kind, doc) {
                    Ok(record) => records.push(record),
                    Err(reason) => {
                        tracing::warn!(document = %doc.name, %reason, "skipping {kind} document");
                    }
                }
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(
            count = records.len(),
            collection = self.collection(kind),
            "listed records"
        );
        Ok(records)
    }

    async fn create_record(
        &self,
        kind: RecordKind,
        draft: &RecordDraft,
    ) -> Result<String, CoreError> {
        let body = codec::encode_draft(draft);
        let req = self.client.post(self.collection_url(kind)).json(&body);
        let resp = self.with_key(req).send().await?;
        let resp = Self::check(resp, &format!("creating {kind}")).await?;
        let created: Document = resp.json().await.map_err(|e| CoreError::Api {
            source_name: SOURCE_NAME.into(),
            message: format!("Failed to parse created {kind}: {e}"),
        })?;
        Ok(created.id().to_string())
    }

    async fn update_record(
        &self,
        kind: RecordKind,
        id: &str,
        draft: &RecordDraft,
    ) -> Result<(), CoreError> {
        let body = codec::encode_draft(draft);
        // Only touch the dashboard's fields; screen-specific fields survive.
        let mut params: Vec<(&str, &str)> = body
            .fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.as_str()))
            .collect();
        params.push(("currentDocument.exists", "true"));

        let req = self
            .client
            .patch(self.document_url(kind, id))
            .query(&params)
            .json(&body);
        let resp = self.with_key(req).send().await?;
        Self::check(resp, &format!("updating {kind} {id}")).await?;
        Ok(())
    }

    async fn delete_record(&self, kind: RecordKind, id: &str) -> Result<(), CoreError> {
        let req = self
            .client
            .delete(self.document_url(kind, id))
            .query(&[("currentDocument.exists", "true")]);
        let resp = self.with_key(req).send().await?;
        Self::check(resp, &format!("deleting {kind} {id}")).await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RoleSource for FirestoreSource {
    async fn roles_for(&self, email: &str) -> Result<Vec<String>, CoreError> {
        let filter_value = serde_json::to_value(Value::StringValue(email.to_string()))
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        let body = RunQueryRequest {
            structured_query: serde_json::json!({
                "from": [{ "collectionId": self.settings.users_collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "email" },
                        "op": "EQUAL",
                        "value": filter_value,
                    }
                },
                "limit": 1,
            }),
        };

        let url = format!("{}:runQuery", self.documents_url());
        let req = self.client.post(&url).json(&body);
        let resp = self.with_key(req).send().await?;
        let resp = Self::check(resp, "querying user roles").await?;
        let items: Vec<RunQueryItem> = resp.json().await.map_err(|e| CoreError::Api {
            source_name: SOURCE_NAME.into(),
            message: format!("Failed to parse role query response: {e}"),
        })?;

        let roles = items
            .iter()
            .find_map(|item| item.document.as_ref())
            .map(codec::decode_roles)
            .unwrap_or_default();
        if roles.is_empty() {
            tracing::warn!(%email, "user not found or has no roles");
        }
        Ok(roles)
    }
}
