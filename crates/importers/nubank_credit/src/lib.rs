use anyhow::{Context, Result};
use csv::StringRecord;
use models::{AliasRecord, Transaction};
use std::io::Read;

pub const NAME: &str = "nubank";
pub const DESCRIPTION: &str = "Nubank - Cartão de crédito";
pub const EXTENSIONS: &[&str] = &[".csv"];

/// Nubank credit-card invoice CSV: comma-delimited, `date`/`title`/`amount`
/// columns. Rows already carrying a negative marker are bill payments or
/// refunds and are dropped; remaining charges are negated.
pub struct NubankCreditCsvParser;

impl NubankCreditCsvParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<Transaction>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers().context("Missing CSV headers")?.clone();
        let idx_date = find_col(&headers, "date")?;
        let idx_title = find_col(&headers, "title")?;
        let idx_amount = find_col(&headers, "amount")?;

        let mut transactions = Vec::new();
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(err) => {
                    eprintln!("Skipping row {}: {}", row_idx, err);
                    continue;
                }
            };

            let (title, date_raw, amount_raw) = match (
                record.get(idx_title).filter(|t| !t.trim().is_empty()),
                record.get(idx_date),
                record.get(idx_amount).filter(|a| !a.is_empty()),
            ) {
                (Some(title), Some(date), Some(amount)) => (title, date, amount),
                _ => continue,
            };

            if amount_raw.contains('-') {
                continue;
            }

            let amount = utils::parse_amount(amount_raw);
            transactions.push(Transaction::new(
                utils::day_start_utc(utils::parse_br_date(date_raw)),
                title,
                if amount == 0.0 { 0.0 } else { -amount },
            ));
        }

        Ok(transactions)
    }
}

impl Default for NubankCreditCsvParser {
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

fn find_col(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("Missing CSV column '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const SAMPLE: &str = "\
date,title,amount
15/01/2024,Store X - Parcela 2/6,50.00
20/01/2024,Pagamento recebido,-1200.00
22/01/2024,Padaria Central,19.90
";

    #[test]
    fn test_negative_marker_rows_are_dropped() {
        let transactions = NubankCreditCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(transactions.len(), 2);
        assert!(transactions.iter().all(|t| t.amount < 0.0));
    }

    #[test]
    fn test_charges_are_negated_and_dated() {
        let transactions = NubankCreditCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();

        let first = &transactions[0];
        assert_eq!(first.description, "Store X - Parcela 2/6");
        assert_eq!(first.amount, -50.0);
        assert_eq!(
            (first.date.year(), first.date.month(), first.date.day()),
            (2024, 1, 15)
        );
    }

    #[test]
    fn test_empty_amount_rows_are_dropped() {
        let sample = "date,title,amount\n15/01/2024,Store X,\n";
        let transactions = NubankCreditCsvParser::new()
            .parse_reader(sample.as_bytes())
            .unwrap();
        assert!(transactions.is_empty());
    }
}
