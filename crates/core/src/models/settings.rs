use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Month count used for the runway average when no month is selected.
pub const DEFAULT_RUNWAY_MONTHS: u32 = 12;

/// Runtime configuration: record store location and dashboard defaults.
///
/// Loaded from a JSON file; every field except `project_id` has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Firestore project id
    pub project_id: String,

    /// Web API key appended to REST calls (optional for open rules/emulator)
    pub api_key: Option<String>,

    /// Firestore database id
    pub database: String,

    /// Base URL of the Firestore REST API (override for the emulator)
    pub base_url: String,

    pub expenses_collection: String,
    pub earnings_collection: String,

    /// Collection holding `{ email, roles }` user documents
    pub users_collection: String,

    /// Documents requested per list page
    pub page_size: u32,

    /// HTTP timeout, native targets only
    pub request_timeout_secs: u64,

    /// Runway month count when no month is selected. 0 falls back to 12.
    pub default_runway_months: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: None,
            database: "(default)".to_string(),
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            expenses_collection: "expenses".to_string(),
            earnings_collection: "earnings".to_string(),
            users_collection: "users".to_string(),
            page_size: 300,
            request_timeout_secs: 30,
            default_runway_months: DEFAULT_RUNWAY_MONTHS,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::FileIO(format!("Reading settings file {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Runway month count with the zero fallback applied.
    #[must_use]
    pub fn runway_months(&self) -> u32 {
        if self.default_runway_months == 0 {
            DEFAULT_RUNWAY_MONTHS
        } else {
            self.default_runway_months
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.page_size == 0 {
            return Err(CoreError::Config("page_size must be at least 1".into()));
        }
        let collections = [
            ("expenses_collection", &self.expenses_collection),
            ("earnings_collection", &self.earnings_collection),
            ("users_collection", &self.users_collection),
        ];
        for (field, name) in collections {
            if name.trim().is_empty() || name.contains('/') {
                return Err(CoreError::Config(format!(
                    "{field} must be a single collection name, got '{name}'"
                )));
            }
        }
        Ok(())
    }
}
