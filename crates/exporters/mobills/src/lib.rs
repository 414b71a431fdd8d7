use models::Transaction;

pub const NAME: &str = "mobills";
pub const DESCRIPTION: &str = "Mobills";
pub const DEFAULT_ACCOUNT: &str = "Carteira";
pub const DEFAULT_CATEGORY: &str = "Outros";

/// Renders transactions as a Mobills import CSV.
///
/// Columns: `Data;Descrição;Valor;Conta;Categoria`. The alias is preferred
/// over the raw description when set, amounts are fixed two-decimal
/// strings, and every field is quote-wrapped with inner quotes doubled.
/// Input order is preserved and nothing is filtered out.
pub fn generate(transactions: &[Transaction], account: Option<&str>) -> String {
    let account = account.unwrap_or(DEFAULT_ACCOUNT);

    let mut lines = Vec::with_capacity(transactions.len() + 1);
    lines.push(render_row(
        ["Data", "Descrição", "Valor", "Conta", "Categoria"]
            .iter()
            .map(|s| s.to_string()),
    ));

    for transaction in transactions {
        let description = transaction
            .alias
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(&transaction.description);
        let category = transaction
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        lines.push(render_row(
            [
                transaction.date.format("%d/%m/%Y").to_string(),
                description.to_string(),
                format!("{:.2}", transaction.amount),
                account.to_string(),
                category.to_string(),
            ]
            .into_iter(),
        ));
    }

    lines.join("\n")
}

fn render_row(values: impl Iterator<Item = String>) -> String {
    values
        .map(|v| format!("\"{}\"", v.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use models::Transaction;

    fn transaction(description: &str, amount: f64) -> Transaction {
        Transaction::new(
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            description,
            amount,
        )
    }

    #[test]
    fn test_header_defaults_and_quoting() {
        let mut with_quote = transaction("Loja \"Boa\"", -10.0);
        with_quote.category = Some("Alimentação".to_string());

        let output = generate(&[transaction("Store X", -50.0), with_quote], None);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "\"Data\";\"Descrição\";\"Valor\";\"Conta\";\"Categoria\"");
        assert_eq!(
            lines[1],
            "\"15/01/2024\";\"Store X\";\"-50.00\";\"Carteira\";\"Outros\""
        );
        assert_eq!(
            lines[2],
            "\"15/01/2024\";\"Loja \"\"Boa\"\"\";\"-10.00\";\"Carteira\";\"Alimentação\""
        );
    }

    #[test]
    fn test_alias_preferred_over_description() {
        let mut aliased = transaction("STORE X - Parcela 2/6", -50.0);
        aliased.alias = Some("Mercado - Parcela 2/6".to_string());

        let output = generate(&[aliased], Some("Cartão"));
        assert!(output.contains("\"Mercado - Parcela 2/6\""));
        assert!(output.contains("\"Cartão\""));
        assert!(!output.contains("STORE X"));
    }

    #[test]
    fn test_round_trips_through_generic_csv_reader() {
        let input = vec![
            transaction("A", -50.0),
            transaction("B", 19.9),
            transaction("C", 0.0),
        ];
        let output = generate(&input, None);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(output.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), input.len());
        let amounts: Vec<&str> = rows.iter().map(|r| r.get(2).unwrap()).collect();
        assert_eq!(amounts, vec!["-50.00", "19.90", "0.00"]);
    }
}
