//! Studio Records
//!
//! Typed records for the six studio sections and the helpers the list
//! manager uses to create and merge them from form data.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Debug};
use uuid::Uuid;

/// Field set submitted by a form: every editable field, never `id` or `createdAt`
pub type FormData = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Anything the list manager can hold: a serializable value with an
/// identifier and a creation timestamp.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Registry key of the section that owns this record type
    const RESOURCE_KEY: &'static str;

    fn id(&self) -> &RecordId;

    fn created_at(&self) -> &str;
}

/// Record identifier, kept in the JSON type the backend sent it as so that
/// a numeric id goes back out as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(i64),
    Text(String),
}

impl RecordId {
    /// Fresh client-side id for a record the backend has not seen yet
    pub fn generate() -> Self {
        RecordId::Text(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Num(value)
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        match self {
            RecordId::Num(n) => other.parse::<i64>().is_ok_and(|o| o == *n),
            RecordId::Text(s) => s == other,
        }
    }
}

/// Build a brand new record from form data with a fresh id and timestamp
pub fn new_record<R: Record>(fields: &FormData) -> Result<R> {
    let mut map = fields.clone();
    let id = serde_json::to_value(RecordId::generate()).context("Failed to serialize record id")?;
    map.insert(ID_FIELD.to_string(), id);
    map.insert(
        CREATED_AT_FIELD.to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    serde_json::from_value(Value::Object(map))
        .with_context(|| format!("Form data does not fit a {} record", R::RESOURCE_KEY))
}

/// Shallow merge: fields in `delta` overwrite, everything else is kept.
/// Identity fields are never overwritten.
pub fn merge_record<R: Record>(record: &R, delta: &FormData) -> Result<R> {
    let mut value = serde_json::to_value(record).context("Failed to serialize record")?;

    if let Value::Object(ref mut map) = value {
        for (key, field) in delta {
            if key == ID_FIELD || key == CREATED_AT_FIELD {
                continue;
            }
            map.insert(key.clone(), field.clone());
        }
    }

    serde_json::from_value(value)
        .with_context(|| format!("Form data does not fit a {} record", R::RESOURCE_KEY))
}

/// Serialize a record for display; falls back to `Null` on failure
pub fn to_json<R: Record>(record: &R) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

// =========================================================================
// Lenient field decoding
// =========================================================================

/// Money arrives as a number, a numeric string, or not at all
fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_f64().unwrap_or_default()),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("'{}' is not a number", s))),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!(
            "expected an amount, got {}",
            other
        ))),
    }
}

/// Text fields that some rows store as `null`
fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

// =========================================================================
// Section records
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_text")]
    pub created_at: String,
    #[serde(default, deserialize_with = "de_text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub email: String,
    #[serde(default, deserialize_with = "de_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "de_text")]
    pub location: String,
    #[serde(default, deserialize_with = "de_text")]
    pub package: String,
    #[serde(default, deserialize_with = "de_text")]
    pub subject: String,
    #[serde(default, deserialize_with = "de_text")]
    pub booking_type: String,
    #[serde(default, deserialize_with = "de_text")]
    pub message: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub booking_cost: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_cost: f64,
    #[serde(default, deserialize_with = "de_text")]
    pub payment_method: String,
    #[serde(default, deserialize_with = "de_text")]
    pub start_date: String,
    #[serde(default, deserialize_with = "de_text")]
    pub end_date: String,
    #[serde(default, deserialize_with = "de_text")]
    pub payment_status: String,
    #[serde(default, deserialize_with = "de_text")]
    pub status: String,
    /// Backend fields this console does not edit
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_text")]
    pub created_at: String,
    #[serde(default, deserialize_with = "de_text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub email: String,
    #[serde(default, deserialize_with = "de_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "de_text")]
    pub subject: String,
    #[serde(default, deserialize_with = "de_text")]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_text")]
    pub created_at: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub image_url: String,
    #[serde(default, deserialize_with = "de_text")]
    pub category: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_text")]
    pub created_at: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de_text")]
    pub payment_method: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expenditure {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_text")]
    pub created_at: String,
    #[serde(default, deserialize_with = "de_text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub title: String,
    #[serde(default, deserialize_with = "de_text")]
    pub details: String,
    #[serde(default, deserialize_with = "de_text")]
    pub note: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de_text")]
    pub method: String,
    #[serde(default, deserialize_with = "de_text")]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Other {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_text")]
    pub created_at: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub details: String,
    #[serde(default, deserialize_with = "de_text")]
    pub value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Booking {
    const RESOURCE_KEY: &'static str = "bookings";
    fn id(&self) -> &RecordId {
        &self.id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Record for Contact {
    const RESOURCE_KEY: &'static str = "contacts";
    fn id(&self) -> &RecordId {
        &self.id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Record for Photo {
    const RESOURCE_KEY: &'static str = "photos";
    fn id(&self) -> &RecordId {
        &self.id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Record for Collection {
    const RESOURCE_KEY: &'static str = "collections";
    fn id(&self) -> &RecordId {
        &self.id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Record for Expenditure {
    const RESOURCE_KEY: &'static str = "expenditures";
    fn id(&self) -> &RecordId {
        &self.id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Record for Other {
    const RESOURCE_KEY: &'static str = "others";
    fn id(&self) -> &RecordId {
        &self.id
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
}
