use anyhow::{Context, Result};
use csv::StringRecord;
use models::{AliasRecord, Transaction};
use std::io::Read;

pub const NAME: &str = "c6-credit";
pub const DESCRIPTION: &str = "C6 - Cartão de crédito";
pub const EXTENSIONS: &[&str] = &[".csv"];

/// C6 credit-card invoice CSV: `;`-delimited with padded headers/values.
///
/// Bill-payment rows are dropped (they would cancel out the purchases they
/// pay for), installment purchases get a ` - Parcela N/M` marker appended,
/// and amounts are negated since the source lists charges as positive.
pub struct C6CreditCsvParser;

impl C6CreditCsvParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<Transaction>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers().context("Missing CSV headers")?.clone();
        let idx_date = find_col(&headers, "Data de Compra")?;
        let idx_description = find_col(&headers, "Descrição")?;
        let idx_amount = find_col(&headers, "Valor (em R$)")?;
        let idx_installment = find_optional_col(&headers, "Parcela");

        let mut transactions = Vec::new();
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(err) => {
                    eprintln!("Skipping row {}: {}", row_idx, err);
                    continue;
                }
            };

            let (description, date_raw, amount_raw) = match (
                record.get(idx_description).filter(|d| !d.is_empty()),
                record.get(idx_date),
                record.get(idx_amount),
            ) {
                (Some(d), Some(date), Some(amount)) => (d.to_string(), date, amount),
                _ => continue,
            };

            if description.to_lowercase().contains("pagamento fatura") {
                continue;
            }

            let mut description = description;
            if let Some(installment) = idx_installment.and_then(|idx| record.get(idx)) {
                if !installment.is_empty() && installment != "Única" {
                    description = format!("{description} - Parcela {installment}");
                }
            }

            let amount = utils::parse_amount(amount_raw);
            transactions.push(Transaction::new(
                utils::day_start_utc(utils::parse_br_date(date_raw)),
                description,
                if amount == 0.0 { 0.0 } else { -amount },
            ));
        }

        Ok(transactions)
    }
}

impl Default for C6CreditCsvParser {
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

fn find_optional_col(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const SAMPLE: &str = "\
Data de Compra;Nome no Cartão;Final do Cartão;Categoria;Descrição;Parcela;Valor (em R$)
15/01/2024;FULANO;1234;Supermercado;Store X;2/6;50,00
16/01/2024;FULANO;1234;-;Pagamento fatura;Única;1.200,00
17/01/2024;FULANO;1234;Restaurante;Padaria Central;Única;19,90
";

    #[test]
    fn test_bill_payment_rows_are_dropped() {
        let transactions = C6CreditCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(transactions.len(), 2);
        assert!(transactions
            .iter()
            .all(|t| !t.description.to_lowercase().contains("pagamento fatura")));
    }

    #[test]
    fn test_installment_marker_and_negation() {
        let transactions = C6CreditCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();

        let first = &transactions[0];
        assert_eq!(first.description, "Store X - Parcela 2/6");
        assert_eq!(first.amount, -50.0);
        assert_eq!(
            (first.date.year(), first.date.month(), first.date.day()),
            (2024, 1, 15)
        );
        assert_eq!(first.date.hour(), 0);

        // "Única" keeps the description untouched.
        assert_eq!(transactions[1].description, "Padaria Central");
        assert_eq!(transactions[1].amount, -19.9);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let sample = "\
Data de Compra;Descrição;Parcela;Valor (em R$)
Total da fatura
15/01/2024;Store X;Única;10,00
";
        let transactions = C6CreditCsvParser::new()
            .parse_reader(sample.as_bytes())
            .unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "Store X");
    }

    #[test]
    fn test_canonical_key_and_alias() {
        assert_eq!(canonical_key("Store X - Parcela 2/6"), "Store X");

        let table = vec![AliasRecord {
            id: 1,
            original: "Store X".to_string(),
            alias: "Mercado".to_string(),
            category: "Alimentação".to_string(),
        }];
        assert_eq!(
            resolve_alias("Store X - Parcela 2/6", &table),
            "Mercado - Parcela 2/6"
        );
        assert_eq!(resolve_alias("Outra Loja", &table), "");
    }
}
