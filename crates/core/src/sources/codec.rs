//! Firestore REST document encoding.
//!
//! This is the only place where stored values are turned into dashboard
//! types. Dates arrive either as `timestampValue` (native timestamps) or as
//! `stringValue` (legacy writes); both are normalized to `NaiveDate` here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::record::{FinancialRecord, RecordDraft, RecordKind};

/// A Firestore typed value (`{"stringValue": "..."}`, `{"doubleValue": 1.5}`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(serde_json::Value),
    BooleanValue(bool),
    /// int64 encoded as a decimal string
    IntegerValue(String),
    DoubleValue(f64),
    /// RFC 3339 timestamp
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(serde_json::Value),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

/// A document as returned by the REST API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name: `projects/{p}/databases/{d}/documents/{collection}/{id}`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Document {
    /// Last path segment of the resource name.
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    fn string(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::StringValue(s) if !s.is_empty() => Some(s.clone()),
            Value::IntegerValue(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Decode a stored date value. `None` for anything that is not a date.
#[must_use]
pub fn decode_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::TimestampValue(s) | Value::StringValue(s) => parse_date_str(s),
        _ => None,
    }
}

/// Parse the date formats found in stored records.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the UTC calendar day is used),
/// and zone-less `YYYY-MM-DDTHH:MM[:SS[.fff]]`.
#[must_use]
pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_utc().date());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Decode a numeric amount (`doubleValue`, `integerValue`, or a numeric string).
#[must_use]
pub fn decode_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::DoubleValue(v) => *v,
        Value::IntegerValue(s) | Value::StringValue(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}

/// Decode a category label.
///
/// Some screens store categories as one-element arrays; arrays are joined
/// with "," so multi-valued entries keep their stored text.
#[must_use]
pub fn decode_category(value: &Value) -> Option<String> {
    let label = match value {
        Value::StringValue(s) => s.clone(),
        Value::ArrayValue(arr) => arr
            .values
            .iter()
            .filter_map(|v| match v {
                Value::StringValue(s) if !s.is_empty() => Some(s.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(","),
        _ => return None,
    };
    (!label.is_empty()).then_some(label)
}

/// Why a document could not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingCategory,
    MissingAmount,
    NegativeAmount,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingCategory => write!(f, "missing or empty category"),
            SkipReason::MissingAmount => write!(f, "missing or non-numeric amount"),
            SkipReason::NegativeAmount => write!(f, "negative amount"),
        }
    }
}

/// Turn a stored document into a record.
///
/// An undecodable date is kept as `None`; a missing category or amount
/// rejects the document.
pub fn decode_record(kind: RecordKind, doc: &Document) -> Result<FinancialRecord, SkipReason> {
    let category = doc
        .fields
        .get("category")
        .and_then(decode_category)
        .ok_or(SkipReason::MissingCategory)?;
    let amount = doc
        .fields
        .get("amount")
        .and_then(decode_amount)
        .ok_or(SkipReason::MissingAmount)?;
    if amount < 0.0 {
        return Err(SkipReason::NegativeAmount);
    }

    Ok(FinancialRecord {
        id: doc.id().to_string(),
        kind,
        category,
        amount,
        date: doc.fields.get("date").and_then(decode_date),
        account_id: doc.string("accountId"),
        project_id: doc.string("projectId"),
        description: doc.string("description"),
    })
}

/// Encode a draft as document fields for a create or patch call.
#[must_use]
pub fn encode_draft(draft: &RecordDraft) -> Document {
    fn optional(v: &Option<String>) -> Value {
        match v {
            Some(s) if !s.is_empty() => Value::StringValue(s.clone()),
            _ => Value::NullValue(serde_json::Value::Null),
        }
    }

    let timestamp = draft.date.and_time(NaiveTime::default()).and_utc().to_rfc3339();

    let mut fields = HashMap::new();
    fields.insert("category".to_string(), Value::StringValue(draft.category.clone()));
    fields.insert("amount".to_string(), Value::DoubleValue(draft.amount));
    fields.insert("date".to_string(), Value::TimestampValue(timestamp));
    fields.insert("accountId".to_string(), optional(&draft.account_id));
    fields.insert("projectId".to_string(), optional(&draft.project_id));
    fields.insert("description".to_string(), optional(&draft.description));

    Document {
        name: String::new(),
        fields,
    }
}

/// Extract the `roles` array of a user document.
#[must_use]
pub fn decode_roles(doc: &Document) -> Vec<String> {
    match doc.fields.get("roles") {
        Some(Value::ArrayValue(arr)) => arr
            .values
            .iter()
            .filter_map(|v| match v {
                Value::StringValue(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
