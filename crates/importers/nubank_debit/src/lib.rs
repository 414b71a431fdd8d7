use anyhow::{Context, Result};
use csv::StringRecord;
use models::{AliasRecord, Transaction};
use std::io::Read;

pub const NAME: &str = "nubank-debit";
pub const DESCRIPTION: &str = "Nubank - Conta corrente";
pub const EXTENSIONS: &[&str] = &[".csv"];

const MAX_DESCRIPTION_CHARS: usize = 70;

const STRIPPED_PREFIXES: [&str; 3] = [
    "Transferência enviada pelo Pix - ",
    "Transferência recebida pelo Pix - ",
    "Compra no débito - ",
];

/// Nubank checking-account CSV: comma-delimited, `Data`/`Valor`/`Descrição`
/// columns. The source already signs amounts correctly, so they pass
/// through untouched; descriptions lose their boilerplate transfer/purchase
/// prefixes and are capped at 70 characters.
pub struct NubankDebitCsvParser;

impl NubankDebitCsvParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<Transaction>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers().context("Missing CSV headers")?.clone();
        let idx_date = find_col(&headers, "Data")?;
        let idx_amount = find_col(&headers, "Valor")?;
        let idx_description = find_col(&headers, "Descrição")?;

        let mut transactions = Vec::new();
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(err) => {
                    eprintln!("Skipping row {}: {}", row_idx, err);
                    continue;
                }
            };

            let (description_raw, date_raw, amount_raw) = match (
                record.get(idx_description),
                record.get(idx_date),
                record.get(idx_amount).filter(|a| !a.is_empty()),
            ) {
                (Some(d), Some(date), Some(amount)) => (d, date, amount),
                _ => continue,
            };

            let description = sanitize_description(description_raw);
            if description.is_empty() {
                continue;
            }

            transactions.push(Transaction::new(
                utils::day_start_utc(utils::parse_br_date(date_raw)),
                description,
                utils::parse_amount(amount_raw),
            ));
        }

        Ok(transactions)
    }
}

impl Default for NubankDebitCsvParser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn canonical_key(description: &str) -> String {
    utils::strip_installment_suffix(description)
}

pub fn resolve_alias(description: &str, aliases: &[AliasRecord]) -> String {
    utils::resolve_alias_with_suffix(description, aliases)
}

fn sanitize_description(description: &str) -> String {
    let mut cleaned = description.to_string();
    for prefix in STRIPPED_PREFIXES {
        cleaned = cleaned.replacen(prefix, "", 1);
    }
    cleaned.trim().chars().take(MAX_DESCRIPTION_CHARS).collect()
}

fn find_col(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("Missing CSV column '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Data,Valor,Identificador,Descrição
15/01/2024,-35.50,abc-1,Compra no débito - Padaria Central
16/01/2024,1500.00,abc-2,Transferência recebida pelo Pix - FULANO DE TAL
17/01/2024,,abc-3,Saldo do dia
";

    #[test]
    fn test_prefixes_are_stripped_and_sign_kept() {
        let transactions = NubankDebitCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(transactions.len(), 2);

        assert_eq!(transactions[0].description, "Padaria Central");
        assert_eq!(transactions[0].amount, -35.5);

        assert_eq!(transactions[1].description, "FULANO DE TAL");
        assert_eq!(transactions[1].amount, 1500.0);
    }

    #[test]
    fn test_empty_amount_rows_are_dropped() {
        let transactions = NubankDebitCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();
        assert!(transactions.iter().all(|t| t.description != "Saldo do dia"));
    }

    #[test]
    fn test_description_is_truncated_to_70_chars() {
        let long = "x".repeat(100);
        let sample = format!("Data,Valor,Descrição\n15/01/2024,10.00,{long}\n");
        let transactions = NubankDebitCsvParser::new()
            .parse_reader(sample.as_bytes())
            .unwrap();
        assert_eq!(transactions[0].description.chars().count(), 70);
    }
}
