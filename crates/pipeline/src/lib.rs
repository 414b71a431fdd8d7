pub mod registry;

pub use crate::registry::{list_exporters, list_importers, Exporter, Importer};

use anyhow::Result;
use models::{AliasRecord, Transaction};
use std::io::Read;

/// Annotates each transaction with the category and display alias derived
/// from the alias table.
///
/// The table is read as an immutable snapshot: the pass is idempotent and
/// can be re-run after an alias edit without re-parsing the source file.
pub fn apply_aliases(importer: Importer, transactions: &mut [Transaction], aliases: &[AliasRecord]) {
    for transaction in transactions {
        let key = importer.canonical_key(&transaction.description);
        transaction.category = aliases
            .iter()
            .find(|a| a.original == key)
            .map(|a| a.category.clone())
            .filter(|c| !c.is_empty());

        let alias = importer.resolve_alias(&transaction.description, aliases);
        transaction.alias = if alias.is_empty() { None } else { Some(alias) };
    }
}

/// Full conversion: parse the raw statement, resolve aliases against the
/// table snapshot, and render the export document.
pub fn convert<R: Read>(
    importer: Importer,
    input: R,
    exporter: Exporter,
    account: Option<&str>,
    aliases: &[AliasRecord],
) -> Result<String> {
    let mut transactions = importer.parse(input)?;
    apply_aliases(importer, &mut transactions, aliases);
    Ok(exporter.generate(&transactions, account))
}
