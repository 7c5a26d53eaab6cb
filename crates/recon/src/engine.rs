use tracing::{debug, info, warn};

use crate::aggregate::ErrorKind;
use crate::compare::{compare_records, CompareOptions, MismatchKind};
use crate::config::ReconConfig;
use crate::context::{RunContext, Verbosity};
use crate::duty::{cross_reference, CrossRefOutcome, DutyTable};
use crate::error::ReconError;
use crate::extract::SheetRecords;
use crate::matcher::{MatchPass, ReferenceIndex, Resolution};
use crate::model::{ReconInput, ReconMeta, ReconResult, Record, SheetReport};
use crate::normalize::{normalize_duty, normalize_input, normalize_reference};
use crate::schema::CanonicalField;
use crate::sheets::match_sheets;

/// Run one reconciliation: normalize the three sources, pair sheets, then
/// validate every input record against its reference record and the duty
/// table. Only configuration problems are errors; everything found in the
/// data is returned as findings.
pub fn run(
    config: &ReconConfig,
    input: &ReconInput,
    verbosity: Verbosity,
) -> Result<ReconResult, ReconError> {
    config.validate()?;
    let exclude = config.exclude_pattern()?;
    let mut ctx = RunContext::new(verbosity);

    let inputs = normalize_input(input.input, &config.input_options(), &mut ctx);
    let references = normalize_reference(
        input.reference,
        &config.reference_options(),
        exclude.as_ref(),
        &mut ctx,
    );
    let duty = normalize_duty(input.duty, &ctx);
    if duty.is_empty() {
        warn!("duty table has no rows; skipping HS code cross-reference");
    }

    let input_names: Vec<&str> = inputs.names.iter().map(String::as_str).collect();
    let reference_names: Vec<&str> = references.names.iter().map(String::as_str).collect();
    let pairing = match_sheets(&input_names, &reference_names, config.sheets.similarity);
    for name in &pairing.unmatched {
        warn!(sheet = %name, "no matching reference sheet");
    }

    let validator = Validator {
        fields: &config.compare.fields,
        options: config.compare_options(),
        duty: (!duty.is_empty()).then_some(&duty),
    };

    let mut sheets = Vec::new();
    for pair in &pairing.pairs {
        let Some(input_sheet) = inputs.sheet(&pair.input) else {
            continue;
        };
        let Some(reference_sheet) = references.sheet(&pair.reference) else {
            warn!(
                input = %pair.input,
                reference = %pair.reference,
                "reference sheet could not be extracted; skipping pair"
            );
            continue;
        };
        info!(
            input = %pair.input,
            reference = %pair.reference,
            similarity = pair.similarity,
            "validating sheet"
        );
        let matched = validator.validate_sheet(input_sheet, reference_sheet, &mut ctx);
        sheets.push(SheetReport {
            input_sheet: pair.input.clone(),
            reference_sheet: pair.reference.clone(),
            similarity: pair.similarity,
            records: input_sheet.records.len(),
            matched,
        });
    }

    let errors = ctx.into_errors();
    let summary = errors.summary();
    info!(errors = summary.total, sheets = sheets.len(), "reconciliation finished");

    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            input_sheets: input.input.sheets().len(),
            reference_sheets: input.reference.sheets().len(),
            duty_rows: duty.len(),
        },
        summary,
        sheets,
        unmatched_sheets: pairing.unmatched,
        errors: errors.into_entries(),
    })
}

struct Validator<'a> {
    fields: &'a [CanonicalField],
    options: CompareOptions,
    duty: Option<&'a DutyTable>,
}

impl Validator<'_> {
    /// Validate every record of one paired sheet. Returns how many records
    /// resolved to a reference record.
    fn validate_sheet(
        &self,
        input: &SheetRecords,
        reference: &SheetRecords,
        ctx: &mut RunContext,
    ) -> usize {
        let index = ReferenceIndex::build(&reference.records);
        let mut matched = 0;

        for record in &input.records {
            let identifier = record.identifier();
            match index.resolve(record) {
                Resolution::MissingIdentifier => {
                    ctx.report(
                        record.sheet(),
                        record.row(),
                        identifier,
                        ErrorKind::MissingIdentifier,
                        "Missing P/N in input row",
                    );
                }
                Resolution::Unmatched { key } => {
                    debug!(sheet = record.sheet(), row = record.row(), %key, "no reference row");
                    ctx.report(
                        record.sheet(),
                        record.row(),
                        identifier,
                        ErrorKind::NoMatchingReference,
                        "No matching shipping entry for P/N",
                    );
                }
                Resolution::Matched { reference, via } => {
                    matched += 1;
                    if via == MatchPass::Secondary {
                        debug!(sheet = record.sheet(), row = record.row(), "matched on secondary key");
                    }
                    self.validate_pair(record, reference, ctx);
                }
            }
        }

        matched
    }

    fn validate_pair(&self, record: &Record, reference: &Record, ctx: &mut RunContext) {
        let identifier = record.identifier();

        for mismatch in compare_records(record, reference, self.fields, &self.options) {
            let kind = match mismatch.kind {
                MismatchKind::Numeric => ErrorKind::FieldMismatchNumeric,
                MismatchKind::Text => ErrorKind::FieldMismatchText,
            };
            ctx.report(record.sheet(), record.row(), identifier.clone(), kind, mismatch.message());
        }

        let Some(duty) = self.duty else {
            return;
        };
        let (kind, message) = match cross_reference(record, duty) {
            CrossRefOutcome::Valid { .. } => return,
            CrossRefOutcome::MissingItemName => {
                (ErrorKind::MissingAuxKey, "Missing item name".to_string())
            }
            CrossRefOutcome::NoMatchingDutyRow { .. } => {
                (ErrorKind::NoMatchingAuxRecord, "No matching duty rate found".to_string())
            }
            CrossRefOutcome::InvalidCode { code } => (
                ErrorKind::InvalidAuxCodeFormat,
                format!(
                    "Invalid HS Code format: {code} (accepts numbers, decimals, or hyphenated formats)"
                ),
            ),
        };
        ctx.report(record.sheet(), record.row(), identifier, kind, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{RawGrid, Workbook};

    fn invoice(rows: &[&[&str]]) -> RawGrid {
        let header: &[&str] = &[
            "Item Nos.",
            "Model Nos.",
            "P/N",
            "Description",
            "Quantity PCS",
            "Unit Price USD",
            "Amount USD",
            "Item name",
            "India HS code",
        ];
        let mut all = vec![header];
        all.extend_from_slice(rows);
        RawGrid::from_strs(&all)
    }

    fn duty() -> RawGrid {
        RawGrid::from_strs(&[
            &["Item name", "India HS code", "Duty"],
            &["Bearing", "8482.10", "7.5%"],
        ])
    }

    fn run_default(input: &Workbook, reference: &Workbook, duty: &RawGrid) -> ReconResult {
        let recon_input = ReconInput {
            input,
            reference,
            duty,
        };
        run(&ReconConfig::default(), &recon_input, Verbosity::Normal).unwrap()
    }

    #[test]
    fn clean_run_has_no_findings() {
        let row: &[&str] = &["1", "BRG-77", "P-100", "Bearing Assembly", "10", "2.5", "25", "Bearing", "8482.10"];
        let input = Workbook::new().with_sheet("Invoice", invoice(&[row]));
        let reference = Workbook::new().with_sheet("Invoice", invoice(&[row]));
        let result = run_default(&input, &reference, &duty());

        assert!(result.is_clean(), "unexpected findings: {:?}", result.errors);
        assert_eq!(result.sheets.len(), 1);
        assert_eq!(result.sheets[0].matched, 1);
        assert_eq!(result.meta.duty_rows, 1);
    }

    #[test]
    fn each_row_failure_is_reported_once() {
        let input = Workbook::new().with_sheet(
            "Invoice",
            invoice(&[
                &["1", "BRG-77", "", "Bearing Assembly", "10", "2.5", "25", "Bearing", "8482.10"],
                &["2", "G-3", "P-999", "Gasket", "5", "1", "5", "Gasket", "8484"],
                &["1", "BRG-77", "P-100", "Bearing Assembly", "10", "2.5", "30", "Bearing", "ABCDE"],
            ]),
        );
        let reference = Workbook::new().with_sheet(
            "Invoice",
            invoice(&[&["1", "BRG-77", "P100", "Bearing Assembly", "10", "2.5", "25", "", ""]]),
        );
        let result = run_default(&input, &reference, &duty());

        let found: Vec<(Option<usize>, ErrorKind)> =
            result.errors.iter().map(|e| (e.row, e.category)).collect();
        assert_eq!(
            found,
            vec![
                (Some(2), ErrorKind::MissingIdentifier),
                (Some(3), ErrorKind::NoMatchingReference),
                (Some(4), ErrorKind::FieldMismatchNumeric),
                (Some(4), ErrorKind::InvalidAuxCodeFormat),
            ]
        );
        assert_eq!(
            result.errors[2].message,
            "Value mismatch in column Amount USD: 30 vs 25"
        );
    }

    #[test]
    fn part_number_in_description_does_not_stand_in_for_blank_pn() {
        let input = Workbook::new().with_sheet(
            "Invoice",
            invoice(&[&["1", "M", "", "PUMP-PART NO P100-MODEL NO M", "1", "2", "2", "", ""]]),
        );
        let reference = Workbook::new().with_sheet(
            "Invoice",
            invoice(&[&["1", "M", "P100", "PUMP", "1", "2", "2", "", ""]]),
        );
        let result = run_default(&input, &reference, &duty());

        let kinds: Vec<ErrorKind> = result.errors.iter().map(|e| e.category).collect();
        assert_eq!(kinds, vec![ErrorKind::MissingIdentifier]);
        assert_eq!(result.sheets[0].matched, 0);
    }

    #[test]
    fn empty_duty_table_skips_cross_reference() {
        let row: &[&str] = &["1", "BRG-77", "P-100", "Bearing Assembly", "10", "2.5", "25", "", ""];
        let input = Workbook::new().with_sheet("Invoice", invoice(&[row]));
        let reference = Workbook::new().with_sheet("Invoice", invoice(&[row]));
        let result = run_default(&input, &reference, &RawGrid::default());

        assert!(result.is_clean());
        assert_eq!(result.meta.duty_rows, 0);
    }

    #[test]
    fn unmatched_sheets_are_listed_not_reported() {
        let row: &[&str] = &["1", "BRG-77", "P-100", "Bearing Assembly", "10", "2.5", "25", "Bearing", "8482.10"];
        let input = Workbook::new()
            .with_sheet("Invoice", invoice(&[row]))
            .with_sheet("Zebra", invoice(&[row]));
        let reference = Workbook::new().with_sheet("Invoice", invoice(&[row]));
        let result = run_default(&input, &reference, &duty());

        assert_eq!(result.unmatched_sheets, vec!["Zebra".to_string()]);
        assert!(result.is_clean());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let mut config = ReconConfig::default();
        config.header.quorum = 0;
        let wb = Workbook::new();
        let grid = RawGrid::default();
        let recon_input = ReconInput {
            input: &wb,
            reference: &wb,
            duty: &grid,
        };
        assert!(matches!(
            run(&config, &recon_input, Verbosity::Normal),
            Err(ReconError::ConfigValidation(_))
        ));
    }
}
