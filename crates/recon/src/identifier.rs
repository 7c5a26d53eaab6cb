//! Identifier keys used for record lookup.
//!
//! A key is the uppercase identifier with everything outside `[A-Z0-9]`
//! removed, so `"p-100"`, `"P 100"` and `"P100"` all share the key
//! `P100`. Keys are only used for lookup; reports show the raw value.

use crate::grid::Cell;

/// Key assigned to identifiers that normalize to nothing.
pub const MISSING_KEY: &str = "N/A";

/// Normalize a raw identifier into its lookup key.
///
/// The sentinel itself, in any ASCII case (`"N/A"`, `"n/a"`), maps to the
/// sentinel so that the function is idempotent. Other spellings such as
/// `"N/A."` or `"NA"` are ordinary identifiers and key as `"NA"`.
pub fn normalize_identifier(raw: &str) -> String {
    if raw.trim().eq_ignore_ascii_case(MISSING_KEY) {
        return MISSING_KEY.to_string();
    }
    let key: String = raw
        .chars()
        .flat_map(char::to_uppercase)
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if key.is_empty() {
        MISSING_KEY.to_string()
    } else {
        key
    }
}

/// Lookup key for a cell. Numeric cells go through the canonical display
/// form first, so `12345.0` keys as `12345`.
pub fn identifier_key(cell: Option<&Cell>) -> String {
    match cell {
        Some(cell) => normalize_identifier(&cell.display()),
        None => MISSING_KEY.to_string(),
    }
}

/// Fallback key: the raw identifier with `.` removed, then normalized.
///
/// The primary key already drops dots, so this equals
/// `normalize_identifier(raw)` for every identifier except a dotted
/// sentinel such as `"N/.A"`. The second lookup pass is kept so the
/// matcher's two-pass contract holds if the primary key ever changes.
pub fn secondary_key(raw: &str) -> String {
    normalize_identifier(&raw.replace('.', ""))
}

pub fn is_missing(key: &str) -> bool {
    key == MISSING_KEY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_uppercases() {
        assert_eq!(normalize_identifier("abc-123"), "ABC123");
        assert_eq!(normalize_identifier("ABC123"), "ABC123");
        assert_eq!(normalize_identifier(" p.100 / rev "), "P100REV");
    }

    #[test]
    fn empty_becomes_sentinel() {
        assert_eq!(normalize_identifier(""), MISSING_KEY);
        assert_eq!(normalize_identifier(" -./ "), MISSING_KEY);
        assert_eq!(normalize_identifier("料号"), MISSING_KEY);
        assert_eq!(normalize_identifier("N/A"), MISSING_KEY);
    }

    #[test]
    fn numeric_cells_key_canonically() {
        assert_eq!(identifier_key(Some(&Cell::Number(12345.0))), "12345");
        assert_eq!(identifier_key(Some(&Cell::Empty)), MISSING_KEY);
        assert_eq!(identifier_key(None), MISSING_KEY);
    }

    #[test]
    fn secondary_key_drops_dots() {
        assert_eq!(secondary_key("P.100"), "P100");
    }

    #[test]
    fn secondary_key_matches_primary_for_ordinary_identifiers() {
        for raw in ["P.100", "p-100", "A.B.C 12", "12345", " x.y ", ""] {
            assert_eq!(secondary_key(raw), normalize_identifier(raw), "raw = {raw:?}");
        }
        assert_eq!(normalize_identifier("N/.A"), "NA");
        assert_eq!(secondary_key("N/.A"), MISSING_KEY);
    }

    #[test]
    fn sentinel_is_case_insensitive() {
        assert_eq!(normalize_identifier("n/a"), MISSING_KEY);
        assert_eq!(normalize_identifier(" N/a "), MISSING_KEY);
        assert_eq!(normalize_identifier("N/A."), "NA");
        assert_eq!(normalize_identifier("NA"), "NA");
    }
}
