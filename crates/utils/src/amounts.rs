/// Parses a statement amount into a signed f64.
///
/// Accepts both Brazilian (`1.234,56`, `R$ 50,00`) and plain decimal
/// (`1234.56`, `-12.3`) notation; currency symbols and stray characters
/// are stripped. Parse failures normalize to 0.0 so one bad cell never
/// produces a NaN amount downstream.
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    // Comma present means Brazilian notation: dots are thousands separators.
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if is_dotted_thousands(&cleaned) {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    normalized.parse().unwrap_or(0.0)
}

/// `1.234` or `1.234.567`: dot groups of exactly three digits with no
/// comma cents are Brazilian thousands separators, not a decimal point.
fn is_dotted_thousands(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let mut groups = unsigned.split('.');

    let first = match groups.next() {
        Some(first) => first,
        None => return false,
    };
    if first.is_empty() || first.len() > 3 || !first.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let mut has_separator = false;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        has_separator = true;
    }
    has_separator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brazilian_notation() {
        assert_eq!(parse_amount("1.234,56"), 1234.56);
        assert_eq!(parse_amount("50,00"), 50.0);
        assert_eq!(parse_amount("R$ 19,90"), 19.9);
        assert_eq!(parse_amount("-1.000,00"), -1000.0);
    }

    #[test]
    fn test_plain_notation() {
        assert_eq!(parse_amount("1234.56"), 1234.56);
        assert_eq!(parse_amount("-12.3"), -12.3);
        assert_eq!(parse_amount("100"), 100.0);
    }

    #[test]
    fn test_dotted_thousands_without_cents() {
        assert_eq!(parse_amount("1.234"), 1234.0);
        assert_eq!(parse_amount("R$ 1.234"), 1234.0);
        assert_eq!(parse_amount("-1.234.567"), -1234567.0);
        // Two-digit cents stay a decimal point.
        assert_eq!(parse_amount("35.50"), 35.5);
        assert_eq!(parse_amount("1234.56"), 1234.56);
    }

    #[test]
    fn test_failures_become_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("--"), 0.0);
    }
}
