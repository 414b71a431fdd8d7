use models::AliasRecord;
use regex::Regex;

const SUFFIX_PATTERN: &str = r"(?i)-\s*Parcela\s*\d+/\d+";

/// Strips a trailing `- Parcela N/M` installment marker, recovering the
/// merchant's stable identity so every installment of one purchase maps
/// to the same alias record.
pub fn strip_installment_suffix(description: &str) -> String {
    match Regex::new(&format!(r"\s*{SUFFIX_PATTERN}")) {
        Ok(re) => re.replace(description, "").trim().to_string(),
        Err(_) => description.trim().to_string(),
    }
}

/// The `- Parcela N/M` marker carried by a description, if any.
pub fn installment_suffix(description: &str) -> Option<String> {
    Regex::new(SUFFIX_PATTERN)
        .ok()
        .and_then(|re| re.find(description).map(|m| m.as_str().trim().to_string()))
}

/// Looks up the alias whose `original` equals the canonical key of
/// `description`. No match yields an empty string (no alias applied);
/// a match re-appends the input's installment marker so per-installment
/// context survives the relabeling.
pub fn resolve_alias_with_suffix(description: &str, aliases: &[AliasRecord]) -> String {
    let base = strip_installment_suffix(description);
    let alias = aliases
        .iter()
        .find(|a| a.original == base)
        .map(|a| a.alias.as_str())
        .unwrap_or("");

    if alias.is_empty() {
        return String::new();
    }

    match installment_suffix(description) {
        Some(suffix) => format!("{alias} {suffix}"),
        None => alias.to_string(),
    }
}
