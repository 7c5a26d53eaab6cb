use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    HeaderNotFound,
    MissingIdentifierColumnInSheet,
    MissingIdentifier,
    NoMatchingReference,
    FieldMismatchNumeric,
    FieldMismatchText,
    MissingAuxKey,
    NoMatchingAuxRecord,
    InvalidAuxCodeFormat,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        Self::HeaderNotFound,
        Self::MissingIdentifierColumnInSheet,
        Self::MissingIdentifier,
        Self::NoMatchingReference,
        Self::FieldMismatchNumeric,
        Self::FieldMismatchText,
        Self::MissingAuxKey,
        Self::NoMatchingAuxRecord,
        Self::InvalidAuxCodeFormat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeaderNotFound => "header_not_found",
            Self::MissingIdentifierColumnInSheet => "missing_identifier_column_in_sheet",
            Self::MissingIdentifier => "missing_identifier",
            Self::NoMatchingReference => "no_matching_reference",
            Self::FieldMismatchNumeric => "field_mismatch_numeric",
            Self::FieldMismatchText => "field_mismatch_text",
            Self::MissingAuxKey => "missing_aux_key",
            Self::NoMatchingAuxRecord => "no_matching_aux_record",
            Self::InvalidAuxCodeFormat => "invalid_aux_code_format",
        }
    }

    /// Sheet-level findings carry no row number.
    pub fn is_sheet_level(&self) -> bool {
        matches!(self, Self::HeaderNotFound | Self::MissingIdentifierColumnInSheet)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding, in the order it was discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub sheet: String,
    /// 1-based spreadsheet row; `None` for sheet-level findings.
    pub row: Option<usize>,
    pub identifier: String,
    pub category: ErrorKind,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Append-only, ordered collection of findings. No deduplication.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<ValidationError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.entries.push(error);
    }

    pub fn entries(&self) -> &[ValidationError] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn counts(&self) -> BTreeMap<ErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.entries {
            *counts.entry(e.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> ErrorSummary {
        let by_category = self
            .counts()
            .into_iter()
            .map(|(kind, n)| (kind.to_string(), n))
            .collect();
        ErrorSummary {
            total: self.entries.len(),
            sheet_level: self.entries.iter().filter(|e| e.row.is_none()).count(),
            by_category,
        }
    }

    pub fn into_entries(self) -> Vec<ValidationError> {
        self.entries
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    pub total: usize,
    pub sheet_level: usize,
    pub by_category: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(sheet: &str, row: Option<usize>, category: ErrorKind) -> ValidationError {
        ValidationError {
            sheet: sheet.into(),
            row,
            identifier: "P-1".into(),
            category,
            message: "x".into(),
        }
    }

    #[test]
    fn keeps_discovery_order_and_duplicates() {
        let mut log = ErrorLog::new();
        log.push(finding("B", Some(4), ErrorKind::NoMatchingReference));
        log.push(finding("A", Some(2), ErrorKind::NoMatchingReference));
        log.push(finding("A", Some(2), ErrorKind::NoMatchingReference));
        let sheets: Vec<&str> = log.entries().iter().map(|e| e.sheet.as_str()).collect();
        assert_eq!(sheets, vec!["B", "A", "A"]);
        assert_eq!(log.counts()[&ErrorKind::NoMatchingReference], 3);
    }

    #[test]
    fn summary_counts() {
        let mut log = ErrorLog::new();
        log.push(finding("A", None, ErrorKind::HeaderNotFound));
        log.push(finding("B", Some(3), ErrorKind::FieldMismatchText));
        log.push(finding("B", Some(5), ErrorKind::FieldMismatchText));
        let summary = log.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.sheet_level, 1);
        assert_eq!(summary.by_category["field_mismatch_text"], 2);
        assert_eq!(summary.by_category["header_not_found"], 1);
    }

    #[test]
    fn serialized_category_matches_as_str() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
        let json = serde_json::to_value(finding("A", None, ErrorKind::HeaderNotFound)).unwrap();
        assert_eq!(json["row"], serde_json::Value::Null);
    }

    #[test]
    fn sheet_level_kinds() {
        let sheet_level: Vec<ErrorKind> = ErrorKind::ALL
            .into_iter()
            .filter(ErrorKind::is_sheet_level)
            .collect();
        assert_eq!(
            sheet_level,
            vec![ErrorKind::HeaderNotFound, ErrorKind::MissingIdentifierColumnInSheet]
        );
    }
}
