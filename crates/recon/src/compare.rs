use serde::Serialize;

use crate::grid::Cell;
use crate::model::Record;
use crate::schema::CanonicalField;
use crate::similarity::ratio;

pub const DEFAULT_NUMERIC_TOLERANCE: f64 = 0.01;
pub const DEFAULT_TEXT_SIMILARITY: f64 = 0.85;

/// Fields compared between an input record and its reference record.
pub const DEFAULT_COMPARED_FIELDS: [CanonicalField; 6] = [
    CanonicalField::ItemNumber,
    CanonicalField::ModelNumber,
    CanonicalField::Description,
    CanonicalField::Quantity,
    CanonicalField::UnitPrice,
    CanonicalField::Amount,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareOptions {
    /// Relative tolerance for numeric values.
    pub numeric_tolerance: f64,
    /// Minimum similarity ratio for text values.
    pub text_similarity: f64,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            numeric_tolerance: DEFAULT_NUMERIC_TOLERANCE,
            text_similarity: DEFAULT_TEXT_SIMILARITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMismatch {
    pub field: CanonicalField,
    pub kind: MismatchKind,
    pub input: String,
    pub reference: String,
    /// Similarity ratio for text mismatches.
    pub ratio: Option<f64>,
}

impl FieldMismatch {
    pub fn message(&self) -> String {
        match self.kind {
            MismatchKind::Numeric => format!(
                "Value mismatch in column {}: {} vs {}",
                self.field, self.input, self.reference
            ),
            MismatchKind::Text => format!(
                "Text similarity low in column {}: {} vs {}",
                self.field, self.input, self.reference
            ),
        }
    }
}

/// Relative closeness: `|a - b| <= tol * max(|a|, |b|)`.
pub fn numbers_agree(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    // float slack at the boundary
    let eps = f64::EPSILON * scale * 16.0;
    (a - b).abs() <= tolerance * scale + eps
}

/// Compare one field. Missing values compare as empty; two missing values
/// are not compared at all.
pub fn compare_field(
    field: CanonicalField,
    input: Option<&Cell>,
    reference: Option<&Cell>,
    options: &CompareOptions,
) -> Option<FieldMismatch> {
    if input.is_none() && reference.is_none() {
        return None;
    }
    let display = |cell: Option<&Cell>| cell.map(Cell::display).unwrap_or_default();

    if let (Some(a), Some(b)) = (
        input.and_then(Cell::as_number),
        reference.and_then(Cell::as_number),
    ) {
        if numbers_agree(a, b, options.numeric_tolerance) {
            return None;
        }
        return Some(FieldMismatch {
            field,
            kind: MismatchKind::Numeric,
            input: display(input),
            reference: display(reference),
            ratio: None,
        });
    }

    let left = display(input).trim().to_lowercase();
    let right = display(reference).trim().to_lowercase();
    let score = ratio(&left, &right);
    if score >= options.text_similarity {
        return None;
    }
    Some(FieldMismatch {
        field,
        kind: MismatchKind::Text,
        input: display(input),
        reference: display(reference),
        ratio: Some(score),
    })
}

/// Compare every configured field of a matched pair, in field order.
pub fn compare_records(
    input: &Record,
    reference: &Record,
    fields: &[CanonicalField],
    options: &CompareOptions,
) -> Vec<FieldMismatch> {
    fields
        .iter()
        .filter_map(|field| compare_field(*field, input.get(*field), reference.get(*field), options))
        .collect()
}
