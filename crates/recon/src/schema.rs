use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

// ---------------------------------------------------------------------------
// Canonical fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Identifier,
    ItemNumber,
    ModelNumber,
    Description,
    Quantity,
    UnitPrice,
    Amount,
    AuxCode,
    DutyRate,
    Welfare,
    Igst,
    ItemName,
}

impl CanonicalField {
    /// Every field, in synonym-lookup order.
    pub const ALL: [CanonicalField; 12] = [
        Self::Identifier,
        Self::ItemNumber,
        Self::ModelNumber,
        Self::Description,
        Self::Quantity,
        Self::UnitPrice,
        Self::Amount,
        Self::AuxCode,
        Self::DutyRate,
        Self::Welfare,
        Self::Igst,
        Self::ItemName,
    ];

    /// Column label used in reports and relabeled headers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Identifier => "P/N",
            Self::ItemNumber => "Item Nos",
            Self::ModelNumber => "Model Nos",
            Self::Description => "Description",
            Self::Quantity => "Quantity PCS",
            Self::UnitPrice => "Unit Price USD",
            Self::Amount => "Amount USD",
            Self::AuxCode => "India HS code",
            Self::DutyRate => "Duty",
            Self::Welfare => "Welfare",
            Self::Igst => "IGST",
            Self::ItemName => "Item name",
        }
    }

    /// Known header spellings, compared after [`clean_label`] and
    /// case-folding.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Identifier => &["P/N", "PN", "Part Number", "Part No", "Part No.", "PartNo", "料号"],
            Self::ItemNumber => &["Item Nos", "Item Nos.", "Item No", "Item No.", "Item Number", "项目编号"],
            Self::ModelNumber => &["Model Nos", "Model Nos.", "Model No", "Model No.", "Model Number", "Model", "型号"],
            Self::Description => &["Description", "Desc", "Item Description", "产品描述"],
            Self::Quantity => &["Quantity PCS", "Quantity", "QTY", "数量"],
            Self::UnitPrice => &["Unit Price USD", "Unit Price", "Price", "单价"],
            Self::Amount => &["Amount USD", "Amount", "Total Amount", "Value Amt", "总金额"],
            Self::AuxCode => &["India HS code", "HS Code", "HSN Code", "HSN"],
            Self::DutyRate => &["Duty", "Duty Rate", "税率"],
            Self::Welfare => &["Welfare", "Welfare Tax", "福利税"],
            Self::Igst => &["IGST", "GST", "综合税"],
            Self::ItemName => &["Item name", "Category", "品名"],
        }
    }

    /// Resolve a raw header label to a canonical field, if any synonym matches.
    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = clean_label(raw).to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|field| {
            field
                .synonyms()
                .iter()
                .any(|syn| syn.to_lowercase() == wanted)
        })
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Flatten embedded line breaks to spaces, collapse whitespace runs and trim.
pub fn clean_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Header map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnLabel {
    Field(CanonicalField),
    Raw(String),
}

impl ColumnLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Field(field) => field.label(),
            Self::Raw(label) => label,
        }
    }
}

/// Column position → label for one sheet. A canonical field is claimed by
/// at most one column; the first column to match keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<ColumnLabel>,
}

impl HeaderMap {
    pub fn from_header_row(cells: &[Cell]) -> Self {
        let mut columns = Vec::with_capacity(cells.len());
        let mut claimed: Vec<CanonicalField> = Vec::new();
        for cell in cells {
            let raw = clean_label(&cell.display());
            let label = match CanonicalField::from_label(&raw) {
                Some(field) if !claimed.contains(&field) => {
                    claimed.push(field);
                    ColumnLabel::Field(field)
                }
                _ => ColumnLabel::Raw(raw),
            };
            columns.push(label);
        }
        Self { columns }
    }

    pub fn position(&self, field: CanonicalField) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| *c == ColumnLabel::Field(field))
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.position(field).is_some()
    }

    pub fn columns(&self) -> &[ColumnLabel] {
        &self.columns
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.columns.iter().filter_map(|c| match c {
            ColumnLabel::Field(f) => Some(*f),
            ColumnLabel::Raw(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
