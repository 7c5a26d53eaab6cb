//! Splitting of composite invoice descriptions.
//!
//! Supplier invoices often pack the part and model numbers into the
//! description cell: `BEARING ASSY-PART NO 6204-2RS-MODEL NO BRG-77`.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::grid::Cell;
use crate::schema::CanonicalField;

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)-\s*(PART|MODEL)\s*NO\b").expect("static marker pattern"));
static PART_NO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)PART\s*NO\.?\s*(.+?)\s*(?:-\s*MODEL\s*NO\b|-?\s*$)").expect("static part pattern")
});
static MODEL_NO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)MODEL\s*NO\.?\s*([\w.\-]+?)\s*-?\s*$").expect("static model pattern")
});
static PLUS_MINUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\+OR-\s*").expect("static plus-minus pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDescription {
    pub base: String,
    pub part_number: Option<String>,
    pub model_number: Option<String>,
}

/// `+OR-` → `±`, surrounding whitespace and trailing hyphens trimmed.
pub fn clean_description(raw: &str) -> String {
    let replaced = PLUS_MINUS.replace_all(raw, "±");
    replaced.trim().trim_end_matches('-').trim_end().to_string()
}

/// Split a composite description. Returns `None` when the text carries no
/// `PART NO` / `MODEL NO` marker.
pub fn split_description(raw: &str) -> Option<SplitDescription> {
    let marker = MARKER.find(raw)?;
    let base = clean_description(&raw[..marker.start()]);
    let part_number = PART_NO
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());
    let model_number = MODEL_NO
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty());
    Some(SplitDescription {
        base,
        part_number,
        model_number,
    })
}

/// First hyphen-separated segment of a base description.
pub fn item_name_of(base: &str) -> Option<String> {
    let head = base.split('-').next()?.trim();
    (!head.is_empty()).then(|| head.to_string())
}

fn missing(fields: &BTreeMap<CanonicalField, Cell>, field: CanonicalField) -> bool {
    fields.get(&field).map_or(true, Cell::is_blank)
}

/// Rewrite a row's description in place, filling model number and item
/// name from it where the row has none of its own. The identifier is never
/// derived: a row without a P/N must stay unmatchable.
pub fn apply(fields: &mut BTreeMap<CanonicalField, Cell>) {
    let Some(Cell::Text(raw)) = fields.get(&CanonicalField::Description).cloned() else {
        return;
    };
    let Some(split) = split_description(&raw) else {
        fields.insert(CanonicalField::Description, Cell::text(clean_description(&raw)));
        return;
    };

    if missing(fields, CanonicalField::ModelNumber) {
        if let Some(model) = &split.model_number {
            fields.insert(CanonicalField::ModelNumber, Cell::text(model.clone()));
        }
    }
    if missing(fields, CanonicalField::ItemName) {
        if let Some(name) = item_name_of(&split.base) {
            fields.insert(CanonicalField::ItemName, Cell::text(name));
        }
    }
    fields.insert(CanonicalField::Description, Cell::text(split.base));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_part_and_model() {
        let split = split_description("BEARING ASSY-PART NO 6204-2RS-MODEL NO BRG-77").unwrap();
        assert_eq!(split.base, "BEARING ASSY");
        assert_eq!(split.part_number.as_deref(), Some("6204-2RS"));
        assert_eq!(split.model_number.as_deref(), Some("BRG-77"));
    }

    #[test]
    fn model_only_description() {
        let split = split_description("GASKET 3MM-MODEL NO. G-3-").unwrap();
        assert_eq!(split.base, "GASKET 3MM");
        assert_eq!(split.part_number, None);
        assert_eq!(split.model_number.as_deref(), Some("G-3"));
    }

    #[test]
    fn plain_description_is_not_split() {
        assert_eq!(split_description("Bearing Assembly"), None);
    }

    #[test]
    fn plus_minus_and_trailing_hyphen() {
        assert_eq!(clean_description("RESISTOR 10K +OR- 5%-"), "RESISTOR 10K±5%");
    }

    #[test]
    fn item_name_is_first_segment() {
        assert_eq!(item_name_of("MOTOR-AC-220V").as_deref(), Some("MOTOR"));
        assert_eq!(item_name_of("-X"), None);
    }

    #[test]
    fn apply_fills_only_missing_fields() {
        let mut fields = BTreeMap::new();
        fields.insert(
            CanonicalField::Description,
            Cell::text("PUMP-SEAL-PART NO PS-9-MODEL NO M1"),
        );
        fields.insert(CanonicalField::ModelNumber, Cell::text("M-OWN"));
        apply(&mut fields);

        assert_eq!(fields[&CanonicalField::Description], Cell::text("PUMP-SEAL"));
        assert_eq!(fields[&CanonicalField::ModelNumber], Cell::text("M-OWN"));
        assert!(!fields.contains_key(&CanonicalField::Identifier));
        assert_eq!(fields[&CanonicalField::ItemName], Cell::text("PUMP"));
    }
}
