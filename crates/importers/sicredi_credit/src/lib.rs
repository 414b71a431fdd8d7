use anyhow::{bail, Context, Result};
use csv::StringRecord;
use models::{AliasRecord, Transaction};
use std::io::Read;

pub const NAME: &str = "sicredi-credit";
pub const DESCRIPTION: &str = "Sicredi - Cartão de crédito";
pub const EXTENSIONS: &[&str] = &[".csv"];

/// Sicredi credit-card statement CSV: a free-text banner precedes the real
/// `;`-delimited header row (the one starting with `Data` and carrying a
/// `Descrição` column). Invoice-payment rows (`pag fat`) are dropped,
/// parenthesized installment fields become ` - Parcela N/M` markers, and
/// BRL amounts are normalized and negated.
pub struct SicrediCreditCsvParser;

impl SicrediCreditCsvParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Vec<Transaction>> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .context("reading Sicredi CSV")?;
        self.parse_text(&text)
    }

    pub fn parse_text(&self, text: &str) -> Result<Vec<Transaction>> {
        let table = slice_to_csv_table(text);
        let table = match table {
            Some(t) => t,
            None => bail!("Could not find Sicredi CSV header row starting with 'Data'"),
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(table.as_bytes());

        let headers = csv_reader.headers().context("Missing CSV headers")?.clone();
        let idx_date = find_col(&headers, "Data")?;
        let idx_description = find_col(&headers, "Descrição")?;
        let idx_amount = find_col(&headers, "Valor")?;
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

            if description.to_lowercase().contains("pag fat") {
                continue;
            }

            let mut description = description;
            if let Some(installment) = idx_installment.and_then(|idx| record.get(idx)) {
                if !installment.is_empty() {
                    let installment = installment.replace(['(', ')'], "");
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

impl Default for SicrediCreditCsvParser {
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

/// Drops the export banner and returns the CSV table from the header
/// row onward.
fn slice_to_csv_table(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let start = lines
        .iter()
        .position(|l| l.starts_with("Data") && l.contains("Descrição"))?;

    Some(lines[start..].join("\n"))
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
    use chrono::Datelike;

    const SAMPLE: &str = "\
Cooperativa de Crédito Sicredi
Fatura do cartão final 1234

Data;Descrição;Cidade;Parcela;Valor
15/01/2024;STORE X;PORTO ALEGRE;(02/06);R$ 50,00
16/01/2024;PAG FAT 123456;;;R$ 1.200,00
17/01/2024;PADARIA CENTRAL;PORTO ALEGRE;;R$ 19,90
";

    #[test]
    fn test_banner_is_skipped_and_rows_parsed() {
        let transactions = SicrediCreditCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(
            (
                transactions[0].date.year(),
                transactions[0].date.month(),
                transactions[0].date.day()
            ),
            (2024, 1, 15)
        );
    }

    #[test]
    fn test_invoice_payment_rows_are_dropped() {
        let transactions = SicrediCreditCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();
        assert!(transactions
            .iter()
            .all(|t| !t.description.to_lowercase().contains("pag fat")));
    }

    #[test]
    fn test_installment_parentheses_and_brl_amount() {
        let transactions = SicrediCreditCsvParser::new()
            .parse_reader(SAMPLE.as_bytes())
            .unwrap();

        assert_eq!(transactions[0].description, "STORE X - Parcela 02/06");
        assert_eq!(transactions[0].amount, -50.0);
        assert_eq!(transactions[1].description, "PADARIA CENTRAL");
        assert_eq!(transactions[1].amount, -19.9);
    }

    #[test]
    fn test_missing_header_row_is_a_hard_failure() {
        let result = SicrediCreditCsvParser::new().parse_reader("no table here".as_bytes());
        assert!(result.is_err());
    }
}
