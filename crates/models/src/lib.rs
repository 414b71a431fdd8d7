use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical transaction record shared by every importer and exporter.
///
/// Sign convention is normalized at parse time: money leaving the
/// account/card is negative, money received is positive, regardless of
/// the source format's own convention. Transactions are transient value
/// objects with no identity; they are fully rebuilt on each re-import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    /// Filled by the alias-resolution pass from the alias table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// User-facing relabeled description, filled by the alias-resolution pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Transaction {
    pub fn new(date: DateTime<Utc>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            category: None,
            alias: None,
        }
    }
}

/// Persisted alias entry. `original` is the canonical (installment-stripped)
/// key for a family of descriptions; at most one record exists per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub id: u64,
    pub original: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub category: String,
}

/// Registry descriptor for an importer, used by selection UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImporterInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Accepted file extensions, for file-picker filtering only; never
    /// enforced as a parse-time precondition.
    pub extensions: &'static [&'static str],
}

/// Registry descriptor for an exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExporterInfo {
    pub name: &'static str,
    pub description: &'static str,
}
