use thiserror::Error;

/// Unified error type for the entire bizdash-core library.
///
/// Only the record/role sources, settings loading and record writes can fail.
/// Aggregation, filtering and metrics never return an error.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Record source ───────────────────────────────────────────────
    #[error("Failed to fetch records from {source_name}: {message}")]
    FetchFailure {
        source_name: String,
        message: String,
    },

    #[error("API error ({source_name}): {message}")]
    Api {
        source_name: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    // ── Encoding ────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration / File ────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Record validation failed: {0}")]
    ValidationError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Firestore REST URLs carry the API key as `?key=...`.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
