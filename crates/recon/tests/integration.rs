use shipcheck_recon::engine::run;
use shipcheck_recon::{
    Cell, ErrorKind, RawGrid, ReconConfig, ReconInput, ReconResult, Verbosity, Workbook,
};

fn invoice_sheet() -> RawGrid {
    RawGrid::new(vec![
        vec![Cell::text("ACME TRADING CO."), Cell::Empty],
        vec![Cell::text("COMMERCIAL INVOICE No. 2024-118")],
        vec![
            Cell::text("Item Nos."),
            Cell::text("Model Nos."),
            Cell::text("P/N"),
            Cell::text("Description"),
            Cell::text("Quantity\nPCS"),
            Cell::text("Unit Price USD"),
            Cell::text("Amount USD"),
            Cell::text("India HS code"),
        ],
        vec![
            Cell::Number(1.0),
            Cell::text("BRG-77"),
            Cell::text("P-100"),
            Cell::text("BEARING ASSY-PART NO 6204-MODEL NO BRG-77"),
            Cell::Number(10.0),
            Cell::Number(2.5),
            Cell::Number(25.0),
            Cell::Number(8482.1),
        ],
        vec![
            Cell::Number(2.0),
            Cell::text("G-3"),
            Cell::text("p.200"),
            Cell::text("GASKET-PART NO G3"),
            Cell::Number(5.0),
            Cell::Number(1.0),
            Cell::Number(5.0),
            Cell::text("12-34"),
        ],
        vec![Cell::Empty; 8],
        vec![
            Cell::Number(3.0),
            Cell::text("SH-1"),
            Cell::text("P-300"),
            Cell::text("SHAFT-PART NO SH1"),
            Cell::Number(1.0),
            Cell::Number(40.0),
            Cell::Number(40.0),
            Cell::text("ABCDE"),
        ],
        vec![
            Cell::Number(4.0),
            Cell::text("M-9"),
            Cell::text("P-404"),
            Cell::text("MOTOR-PART NO M9"),
            Cell::Number(1.0),
            Cell::Number(90.0),
            Cell::Number(90.0),
            Cell::Number(8501.0),
        ],
    ])
}

fn shipping_sheet() -> RawGrid {
    RawGrid::from_strs(&[
        &["Shipping list", "", "", "", "", "", ""],
        &["Item No.", "Model No.", "Part No", "Description", "Quantity PCS", "Unit Price USD", "Amount USD"],
        &["1", "BRG-77", "P100", "Bearing Assy", "10", "2.5", "25"],
        &["2", "G-3", "P200", "Gasket", "5", "1", "5.04"],
        &["3", "SH-1", "P300", "Shaft", "1", "40", "48"],
        &["TOTAL", "", "", "", "16", "", "78"],
    ])
}

fn duty_sheet() -> RawGrid {
    RawGrid::from_strs(&[
        &["Duty rates FY24"],
        &["Item name", "India HS code", "Duty", "Welfare", "IGST"],
        &["Bearing Assy", "8482.10", "7.5%", "10%", "18%"],
        &["Gasket", "8484", "10%", "10%", "18%"],
        &["Shaft", "8483", "7.5%", "10%", "18%"],
    ])
}

fn reconcile(input: &Workbook, reference: &Workbook, duty: &RawGrid) -> ReconResult {
    let config = ReconConfig::default();
    let recon_input = ReconInput {
        input,
        reference,
        duty,
    };
    run(&config, &recon_input, Verbosity::Normal).unwrap()
}

fn findings(result: &ReconResult) -> Vec<(String, Option<usize>, ErrorKind)> {
    result
        .errors
        .iter()
        .map(|e| (e.sheet.clone(), e.row, e.category))
        .collect()
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn sheet_names_and_identifiers_are_normalized() {
    let input = Workbook::new().with_sheet("Invoice-A", invoice_sheet());
    let reference = Workbook::new()
        .with_sheet("INVOICE_A ", shipping_sheet())
        .with_sheet("PL", RawGrid::from_strs(&[&["gross weight"]]));
    let result = reconcile(&input, &reference, &duty_sheet());

    assert_eq!(result.sheets.len(), 1);
    assert_eq!(result.sheets[0].reference_sheet, "INVOICE_A ");
    assert_eq!(result.sheets[0].records, 4);
    assert_eq!(result.sheets[0].matched, 3);
    assert!(result.unmatched_sheets.is_empty());

    assert_eq!(
        findings(&result),
        vec![
            ("Invoice-A".to_string(), Some(7), ErrorKind::FieldMismatchNumeric),
            ("Invoice-A".to_string(), Some(7), ErrorKind::InvalidAuxCodeFormat),
            ("Invoice-A".to_string(), Some(8), ErrorKind::NoMatchingReference),
        ]
    );

    let amount = &result.errors[0];
    assert_eq!(amount.identifier, "P-300");
    assert_eq!(amount.message, "Value mismatch in column Amount USD: 40 vs 48");
    assert_eq!(
        result.errors[1].message,
        "Invalid HS Code format: ABCDE (accepts numbers, decimals, or hyphenated formats)"
    );
    assert_eq!(result.errors[2].message, "No matching shipping entry for P/N");
}

#[test]
fn findings_summary_by_category() {
    let input = Workbook::new().with_sheet("Invoice-A", invoice_sheet());
    let reference = Workbook::new().with_sheet("INVOICE_A", shipping_sheet());
    let result = reconcile(&input, &reference, &duty_sheet());

    assert_eq!(result.summary.total, 3);
    assert_eq!(result.summary.sheet_level, 0);
    assert_eq!(result.summary.by_category["no_matching_reference"], 1);
    assert_eq!(result.summary.by_category["field_mismatch_numeric"], 1);
}

#[test]
fn sheet_without_identifier_column_does_not_affect_others() {
    let broken = RawGrid::from_strs(&[
        &["Item No.", "Model No.", "Quantity PCS", "Remarks"],
        &["1", "BRG-77", "10", "urgent"],
    ]);
    let input = Workbook::new()
        .with_sheet("Invoice-A", invoice_sheet())
        .with_sheet("Invoice-B", broken);
    let reference = Workbook::new()
        .with_sheet("INVOICE_A", shipping_sheet())
        .with_sheet("INVOICE_B", shipping_sheet());
    let result = reconcile(&input, &reference, &duty_sheet());

    let sheet_level: Vec<_> = result.errors.iter().filter(|e| e.row.is_none()).collect();
    assert_eq!(sheet_level.len(), 1);
    assert_eq!(sheet_level[0].sheet, "Invoice-B");
    assert_eq!(sheet_level[0].category, ErrorKind::MissingIdentifierColumnInSheet);

    let row_level = result.errors.iter().filter(|e| e.row.is_some()).count();
    assert_eq!(row_level, 3);
    assert_eq!(result.sheets.len(), 1);
}

#[test]
fn header_below_window_is_reported() {
    let mut rows = vec![vec![Cell::text("title")]; 5];
    rows.extend(shipping_sheet().rows().iter().skip(1).cloned());
    let input = Workbook::new().with_sheet("Invoice-A", RawGrid::new(rows));
    let reference = Workbook::new().with_sheet("INVOICE_A", shipping_sheet());
    let result = reconcile(&input, &reference, &duty_sheet());

    assert_eq!(
        findings(&result),
        vec![("Invoice-A".to_string(), None, ErrorKind::HeaderNotFound)]
    );
}

#[test]
fn item_name_missing_and_unknown() {
    let input = RawGrid::from_strs(&[
        &["Item No.", "Model No.", "P/N", "Quantity PCS", "Item name", "HS Code"],
        &["1", "A", "X1", "1", "", "8482"],
        &["2", "B", "X2", "1", "Flux capacitor", "8482"],
    ]);
    let reference = RawGrid::from_strs(&[
        &["Item No.", "Model No.", "P/N", "Quantity PCS"],
        &["1", "A", "X1", "1"],
        &["2", "B", "X2", "1"],
    ]);
    let result = reconcile(
        &Workbook::new().with_sheet("Sheet1", input),
        &Workbook::new().with_sheet("Sheet1", reference),
        &duty_sheet(),
    );

    let kinds: Vec<ErrorKind> = result.errors.iter().map(|e| e.category).collect();
    assert_eq!(kinds, vec![ErrorKind::MissingAuxKey, ErrorKind::NoMatchingAuxRecord]);
    assert_eq!(result.errors[0].message, "Missing item name");
    assert_eq!(result.errors[1].message, "No matching duty rate found");
}

#[test]
fn description_splitting_can_be_disabled() {
    let config = ReconConfig::from_toml("[input]\nsplit_descriptions = false\n").unwrap();
    let input = Workbook::new().with_sheet("Invoice-A", invoice_sheet());
    let reference = Workbook::new().with_sheet("INVOICE_A", shipping_sheet());
    let duty = duty_sheet();
    let recon_input = ReconInput {
        input: &input,
        reference: &reference,
        duty: &duty,
    };
    let result = run(&config, &recon_input, Verbosity::Quiet).unwrap();

    // Raw composite descriptions no longer resemble the shipping list, and
    // without a derived item name the duty lookup has nothing to search for.
    let text = result
        .errors
        .iter()
        .filter(|e| e.category == ErrorKind::FieldMismatchText)
        .count();
    assert_eq!(text, 3);
    let missing_names = result
        .errors
        .iter()
        .filter(|e| e.category == ErrorKind::MissingAuxKey)
        .count();
    assert_eq!(missing_names, 3);
}
