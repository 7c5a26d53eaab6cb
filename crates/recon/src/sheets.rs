use serde::Serialize;

use crate::similarity::{normalize_sheet_name, ratio};

pub const DEFAULT_SHEET_SIMILARITY: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPair {
    pub input: String,
    pub reference: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetMatchOutput {
    pub pairs: Vec<SheetPair>,
    /// Input sheets with no reference sheet above the threshold.
    pub unmatched: Vec<String>,
}

/// Pair each input sheet with the reference sheet whose normalized name is
/// most similar. A candidate must score strictly above `threshold`; ties
/// keep the first reference sheet encountered. Several input sheets may
/// pair with the same reference sheet.
pub fn match_sheets(input: &[&str], reference: &[&str], threshold: f64) -> SheetMatchOutput {
    let normalized_refs: Vec<String> = reference.iter().map(|n| normalize_sheet_name(n)).collect();
    let mut output = SheetMatchOutput::default();

    for name in input {
        let wanted = normalize_sheet_name(name);
        let mut best: Option<(usize, f64)> = None;
        for (idx, candidate) in normalized_refs.iter().enumerate() {
            let score = ratio(&wanted, candidate);
            if score > threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }
        match best {
            Some((idx, similarity)) => output.pairs.push(SheetPair {
                input: name.to_string(),
                reference: reference[idx].to_string(),
                similarity,
            }),
            None => output.unmatched.push(name.to_string()),
        }
    }

    output
}
