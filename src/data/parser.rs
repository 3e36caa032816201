use crate::data::error::ParseError;
use crate::data::replicates::ReplicateSet;

/// Spellings a spreadsheet cell uses for "no value".
const MISSING_MARKERS: [&str; 5] = ["NA", "N/A", "NaN", "nan", "null"];

/// Parse manually entered weights such as `"10.1, 9.9, 10.05"`.
///
/// Tokens are split on commas and trimmed; empty tokens are skipped.
/// A single bad token rejects the whole entry.
pub fn parse_manual(text: &str) -> Result<ReplicateSet, ParseError> {
    let values = text
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect::<Result<Vec<f64>, ParseError>>()?;

    ReplicateSet::new(values)
}

fn parse_token(token: &str) -> Result<f64, ParseError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidNumericToken(token.to_string())),
    }
}

/// Whether a tabular cell holds no value.
pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
}

/// Parse a non-missing tabular cell as a finite number.
pub fn parse_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn drops_empty_tokens() {
        let set = parse_manual("10.1, 9.9, , 10.05").unwrap();
        assert_eq!(set.values(), &[10.1, 9.9, 10.05]);
    }

    #[test]
    fn whole_batch_rejected_on_bad_token() {
        assert_eq!(
            parse_manual("10.1, abc"),
            Err(ParseError::InvalidNumericToken("abc".to_string()))
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(", ,,")]
    fn blank_entry_is_empty(#[case] text: &str) {
        assert_eq!(parse_manual(text), Err(ParseError::Empty));
    }

    #[rstest]
    #[case("10, inf")]
    #[case("NaN, 3")]
    #[case("1.2.3")]
    fn non_finite_or_malformed_tokens_rejected(#[case] text: &str) {
        assert!(matches!(
            parse_manual(text),
            Err(ParseError::InvalidNumericToken(_))
        ));
    }

    #[test]
    fn accepts_integers_and_exponents() {
        let set = parse_manual("10,1e1,\n 9.5 ").unwrap();
        assert_eq!(set.values(), &[10.0, 10.0, 9.5]);
    }

    #[rstest]
    #[case("", true)]
    #[case("  ", true)]
    #[case("NA", true)]
    #[case(" nan ", true)]
    #[case("0", false)]
    #[case("abc", false)]
    fn missing_cells(#[case] cell: &str, #[case] missing: bool) {
        assert_eq!(is_missing(cell), missing);
    }
}
