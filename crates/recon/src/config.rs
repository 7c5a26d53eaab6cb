use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::compare::{
    CompareOptions, DEFAULT_COMPARED_FIELDS, DEFAULT_NUMERIC_TOLERANCE, DEFAULT_TEXT_SIMILARITY,
};
use crate::error::ReconError;
use crate::extract::ExtractOptions;
use crate::header::{Concept, DEFAULT_QUORUM, DEFAULT_WINDOW};
use crate::schema::CanonicalField;
use crate::sheets::DEFAULT_SHEET_SIMILARITY;

/// Packing-list sheets in the reference workbook are not shipment data.
pub const DEFAULT_EXCLUDE_SHEET_PATTERN: &str = r"(?i)\bPL\b";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run settings. Every section and field is optional; an empty document
/// gives the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconConfig {
    pub header: HeaderConfig,
    pub sheets: SheetConfig,
    pub compare: CompareConfig,
    pub reference: ReferenceConfig,
    pub input: InputConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Leading rows scanned for the header.
    pub window: usize,
    /// Concepts a row must mention to count as the header.
    pub quorum: usize,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            quorum: DEFAULT_QUORUM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Sheet names pair only when their similarity is strictly above this.
    pub similarity: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            similarity: DEFAULT_SHEET_SIMILARITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompareConfig {
    pub fields: Vec<CanonicalField>,
    pub numeric_tolerance: f64,
    pub text_similarity: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_COMPARED_FIELDS.to_vec(),
            numeric_tolerance: DEFAULT_NUMERIC_TOLERANCE,
            text_similarity: DEFAULT_TEXT_SIMILARITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Reference sheets whose name matches are skipped.
    pub exclude_sheet_pattern: String,
    /// Keep only reference rows whose item number starts with a digit.
    pub numeric_item_numbers: bool,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            exclude_sheet_pattern: DEFAULT_EXCLUDE_SHEET_PATTERN.to_string(),
            numeric_item_numbers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Split `…-PART NO …-MODEL NO …` descriptions.
    pub split_descriptions: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            split_descriptions: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigSerialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.header.window == 0 {
            return Err(ReconError::ConfigValidation(
                "header.window must be at least 1".into(),
            ));
        }

        let concepts = Concept::ALL.len();
        if self.header.quorum == 0 || self.header.quorum > concepts {
            return Err(ReconError::ConfigValidation(format!(
                "header.quorum must be between 1 and {concepts}, got {}",
                self.header.quorum
            )));
        }

        check_unit("sheets.similarity", self.sheets.similarity)?;
        check_unit("compare.text_similarity", self.compare.text_similarity)?;

        if !(self.compare.numeric_tolerance >= 0.0) {
            return Err(ReconError::ConfigValidation(format!(
                "compare.numeric_tolerance must be non-negative, got {}",
                self.compare.numeric_tolerance
            )));
        }

        self.exclude_pattern()?;
        Ok(())
    }

    /// Compiled reference-sheet exclusion pattern. An empty pattern
    /// excludes nothing.
    pub fn exclude_pattern(&self) -> Result<Option<Regex>, ReconError> {
        let pattern = &self.reference.exclude_sheet_pattern;
        if pattern.is_empty() {
            return Ok(None);
        }
        Regex::new(pattern)
            .map(Some)
            .map_err(|source| ReconError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
    }

    pub fn input_options(&self) -> ExtractOptions {
        ExtractOptions {
            window: self.header.window,
            quorum: self.header.quorum,
            split_descriptions: self.input.split_descriptions,
            numeric_item_numbers: false,
        }
    }

    pub fn reference_options(&self) -> ExtractOptions {
        ExtractOptions {
            window: self.header.window,
            quorum: self.header.quorum,
            split_descriptions: false,
            numeric_item_numbers: self.reference.numeric_item_numbers,
        }
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            numeric_tolerance: self.compare.numeric_tolerance,
            text_similarity: self.compare.text_similarity,
        }
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), ReconError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ReconError::ConfigValidation(format!(
            "{name} must be between 0 and 1, got {value}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config, ReconConfig::default());
        assert_eq!(config.header.window, 5);
        assert_eq!(config.header.quorum, 3);
        assert_eq!(config.compare.fields.len(), 6);
        assert!(config.reference.numeric_item_numbers);
        assert!(config.input.split_descriptions);
    }

    #[test]
    fn partial_sections() {
        let config = ReconConfig::from_toml(
            r#"
[header]
window = 8

[compare]
fields = ["quantity", "amount"]
numeric_tolerance = 0.005
"#,
        )
        .unwrap();
        assert_eq!(config.header.window, 8);
        assert_eq!(config.header.quorum, 3);
        assert_eq!(
            config.compare.fields,
            vec![CanonicalField::Quantity, CanonicalField::Amount]
        );
        assert_eq!(config.compare.text_similarity, 0.85);
    }

    #[test]
    fn unknown_field_name_is_a_parse_error() {
        let err = ReconConfig::from_toml("[compare]\nfields = [\"colour\"]\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn out_of_range_values() {
        let err = ReconConfig::from_toml("[header]\nquorum = 5\n").unwrap_err();
        assert!(err.to_string().contains("header.quorum"));

        let err = ReconConfig::from_toml("[sheets]\nsimilarity = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("sheets.similarity"));

        let err = ReconConfig::from_toml("[compare]\nnumeric_tolerance = -0.1\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn bad_exclusion_pattern() {
        let err = ReconConfig::from_toml("[reference]\nexclude_sheet_pattern = \"(\"\n").unwrap_err();
        assert!(matches!(err, ReconError::InvalidPattern { .. }));
    }

    #[test]
    fn default_pattern_excludes_packing_lists() {
        let re = ReconConfig::default().exclude_pattern().unwrap().unwrap();
        assert!(re.is_match("PL-1"));
        assert!(re.is_match("Invoice pl"));
        assert!(!re.is_match("Supplies"));
    }

    #[test]
    fn toml_round_trip_of_defaults() {
        let text = ReconConfig::default().to_toml().unwrap();
        assert!(text.contains("[header]"));
        assert_eq!(ReconConfig::from_toml(&text).unwrap(), ReconConfig::default());
    }
}
