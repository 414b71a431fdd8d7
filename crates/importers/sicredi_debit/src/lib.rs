use anyhow::{bail, Context, Result};
use models::{AliasRecord, Transaction};
use regex::Regex;
use std::io::Read;

pub const NAME: &str = "sicredi-debit";
pub const DESCRIPTION: &str = "Sicredi - Débito";
pub const EXTENSIONS: &[&str] = &[".ofx"];

/// Sicredi checking-account OFX statement.
///
/// OFX 1.x is SGML-ish tag soup: values may or may not carry closing tags
/// and `<STMTTRN>` children arrive in any order, so each block is scanned
/// per tag instead of matched with one positional pattern. The memo field
/// is semi-structured free text padded to fixed widths; it goes through a
/// layered cleanup to recover the establishment name.
pub struct SicrediOfxParser;

impl SicrediOfxParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Vec<Transaction>> {
        let mut text = String::new();
        reader.read_to_string(&mut text).context("reading OFX")?;
        self.parse_text(&text)
    }

    pub fn parse_text(&self, text: &str) -> Result<Vec<Transaction>> {
        if !text.to_ascii_uppercase().contains("<BANKTRANLIST>") {
            bail!("Missing <BANKTRANLIST> section in OFX file");
        }

        let mut transactions = Vec::new();
        for (idx, block) in extract_blocks(text, "STMTTRN").into_iter().enumerate() {
            let dtposted = extract_tag_value(block, "DTPOSTED");
            let amount = extract_tag_value(block, "TRNAMT");
            let memo = extract_tag_value(block, "MEMO");

            match (dtposted, amount, memo) {
                (Some(dtposted), Some(amount), Some(memo)) => {
                    transactions.push(Transaction::new(
                        utils::parse_ofx_datetime(&dtposted),
                        extract_establishment_name(&memo),
                        utils::parse_amount(&amount),
                    ));
                }
                _ => eprintln!("Skipping <STMTTRN> block {}: incomplete fields", idx),
            }
        }

        Ok(transactions)
    }
}

impl Default for SicrediOfxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// OFX memos have no installment markers; the raw description is already
/// the canonical key.
pub fn canonical_key(description: &str) -> String {
    description.to_string()
}

pub fn resolve_alias(description: &str, aliases: &[AliasRecord]) -> String {
    aliases
        .iter()
        .find(|a| a.original == description)
        .map(|a| a.alias.clone())
        .unwrap_or_default()
}

const PIX_MARKERS: [&str; 4] = [
    "RECEBIMENTO PIX SICREDI-",
    "RECEBIMENTO PIX-PIX_CRED",
    "PAGAMENTO PIX SICREDI-",
    "PAGAMENTO PIX-PIX_DEB",
];

const PREFIX_PATTERNS: [&str; 4] = [
    r"(?i)^COMPRA\s+(DEBITO|CREDITO)\s+MASTER[-\s]*",
    r"(?i)^CM\d+\s+",
    r"(?i)^DEBITO\s+(CONVENIOS|CONTA)[-\s]*",
    r"(?i)ID\s+\d+\s+",
];

/// Layered memo cleanup: fixed prefixes first, then the PIX/boleto
/// rewrites, then the fixed-width fallback (first segment before a run of
/// two-or-more spaces). Each layer only applies when the previous one did
/// not already resolve a match. Never returns an empty string.
fn extract_establishment_name(memo: &str) -> String {
    let mut cleaned = memo.to_string();
    for pattern in PREFIX_PATTERNS {
        if let Ok(re) = Regex::new(pattern) {
            cleaned = re.replace(&cleaned, "").to_string();
        }
    }

    if PIX_MARKERS.iter().any(|m| cleaned.contains(m)) {
        for marker in PIX_MARKERS {
            cleaned = cleaned.replacen(marker, "PIX -", 1);
        }
        return cleaned.trim().to_string();
    }

    if cleaned.contains("LIQUIDACAO BOLETO-") {
        return cleaned
            .replacen("LIQUIDACAO BOLETO-", "Boleto -", 1)
            .trim()
            .to_string();
    }

    if let Ok(re) = Regex::new(r"\s{2,}") {
        if let Some(segment) = re.split(&cleaned).map(str::trim).find(|s| !s.is_empty()) {
            return segment.to_string();
        }
    }

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        memo.trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// All bodies of `<TAG>` elements, tolerating both closed (`</TAG>`) and
/// SGML-style unclosed elements (body runs to the next opening tag).
fn extract_blocks<'a>(text: &'a str, tag: &str) -> Vec<&'a str> {
    let upper = text.to_ascii_uppercase();
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(start) = upper[pos..].find(&open) {
        let body_start = pos + start + open.len();
        let next_open = upper[body_start..].find(&open).map(|i| body_start + i);
        let close_pos = upper[body_start..].find(&close).map(|i| body_start + i);

        let end = match (close_pos, next_open) {
            (Some(c), Some(n)) => c.min(n),
            (Some(c), None) => c,
            (None, Some(n)) => n,
            (None, None) => text.len(),
        };
        blocks.push(&text[body_start..end]);
        pos = end;
    }
    blocks
}

/// The value of the first `<TAG>` inside `block`: the text up to the next
/// tag or line break, trimmed. Empty values count as missing.
fn extract_tag_value(block: &str, tag: &str) -> Option<String> {
    let upper = block.to_ascii_uppercase();
    let open = format!("<{tag}>");
    let start = upper.find(&open)? + open.len();

    let rest = &block[start..];
    let end = rest.find('<').unwrap_or(rest.len());
    let value = rest[..end].lines().next().unwrap_or("").trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
