use anyhow::{Context, Result};
use models::AliasRecord;
use std::fs;
use std::path::Path;

/// Partial update for an alias record; `None` fields are left untouched
/// on an existing record and default to empty on a new one.
#[derive(Debug, Default, Clone)]
pub struct AliasFields {
    pub alias: Option<String>,
    pub category: Option<String>,
}

/// Owned alias table keyed by canonical description.
///
/// Holds at most one record per distinct `original` value; `upsert` is
/// idempotent by that key. Bulk import goes through `replace_all`, which
/// swaps the whole dataset in one step instead of rebinding a shared
/// reference.
#[derive(Debug, Default)]
pub struct AliasStore {
    records: Vec<AliasRecord>,
    next_id: u64,
}

impl AliasStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    pub fn from_records(records: Vec<AliasRecord>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    /// Reads a JSON alias file. A missing file is an empty store, not an
    /// error, so first runs need no setup step.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading alias file {}", path.display()))?;
        let records: Vec<AliasRecord> = serde_json::from_str(&content)
            .with_context(|| format!("parsing alias file {}", path.display()))?;
        Ok(Self::from_records(records))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, content)
            .with_context(|| format!("writing alias file {}", path.display()))?;
        Ok(())
    }

    /// Creates or updates the record for `original` and returns the full
    /// list, mirroring what a selection UI needs to refresh its table.
    pub fn upsert(&mut self, original: &str, fields: AliasFields) -> Vec<AliasRecord> {
        match self.records.iter_mut().find(|r| r.original == original) {
            Some(record) => {
                if let Some(alias) = fields.alias {
                    record.alias = alias;
                }
                if let Some(category) = fields.category {
                    record.category = category;
                }
            }
            None => {
                self.records.push(AliasRecord {
                    id: self.next_id,
                    original: original.to_string(),
                    alias: fields.alias.unwrap_or_default(),
                    category: fields.category.unwrap_or_default(),
                });
                self.next_id += 1;
            }
        }
        self.records.clone()
    }

    pub fn list_all(&self) -> Vec<AliasRecord> {
        self.records.clone()
    }

    pub fn records(&self) -> &[AliasRecord] {
        &self.records
    }

    /// Atomically replaces the whole dataset (bulk import). Ids are
    /// reassigned store-side and duplicate `original` keys keep their
    /// first occurrence, preserving the one-record-per-key invariant.
    pub fn replace_all(&mut self, records: Vec<AliasRecord>) {
        let mut deduped: Vec<AliasRecord> = Vec::with_capacity(records.len());
        for mut record in records {
            if deduped.iter().any(|r| r.original == record.original) {
                continue;
            }
            record.id = deduped.len() as u64 + 1;
            deduped.push(record);
        }
        self.next_id = deduped.len() as u64 + 1;
        self.records = deduped;
    }

    /// Serializes the record list as a portable JSON blob.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Replaces the store contents from a blob produced by `export_json`.
    pub fn import_json(&mut self, blob: &str) -> Result<()> {
        let records: Vec<AliasRecord> =
            serde_json::from_str(blob).context("parsing alias import blob")?;
        self.replace_all(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_creates_then_updates_in_place() {
        let mut store = AliasStore::new();
        let list = store.upsert(
            "Store X",
            AliasFields {
                alias: Some("Mercado".to_string()),
                category: None,
            },
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].alias, "Mercado");
        assert_eq!(list[0].category, "");

        let list = store.upsert(
            "Store X",
            AliasFields {
                alias: None,
                category: Some("Alimentação".to_string()),
            },
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].alias, "Mercado");
        assert_eq!(list[0].category, "Alimentação");
        assert_eq!(list[0].id, 1);
    }

    #[test]
    fn test_replace_all_dedupes_and_reassigns_ids() {
        let mut store = AliasStore::new();
        store.upsert("Old", AliasFields::default());

        let record = |id, original: &str| AliasRecord {
            id,
            original: original.to_string(),
            alias: String::new(),
            category: String::new(),
        };
        store.replace_all(vec![record(7, "A"), record(9, "B"), record(11, "A")]);

        let list = store.list_all();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].original, "A");
        assert_eq!(list[0].id, 1);
        assert_eq!(list[1].id, 2);

        store.upsert("C", AliasFields::default());
        assert_eq!(store.list_all()[2].id, 3);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut store = AliasStore::new();
        store.upsert(
            "Store X",
            AliasFields {
                alias: Some("Mercado".to_string()),
                category: Some("Alimentação".to_string()),
            },
        );

        let blob = store.export_json().unwrap();
        let mut other = AliasStore::new();
        other.import_json(&blob).unwrap();
        assert_eq!(other.list_all(), store.list_all());
    }
}
