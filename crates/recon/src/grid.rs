use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One untyped cell as delivered by the loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from text; the empty string becomes `Cell::Empty`.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }

    /// Empty, or text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Display form: text as-is, numbers in canonical decimal form.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
        }
    }

    /// Numeric view of the cell. Text is accepted when it reads as a
    /// financial number (`$1,200.50`, `(45)`).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_financial_number(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Canonical decimal rendering: `12345.0` → `"12345"`, `8501.1` → `"8501.1"`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let fixed = format!("{n:.10}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Currency codes that may lead or trail an amount on an invoice.
const CURRENCY_CODES: [&str; 4] = ["USD", "INR", "RMB", "CNY"];

/// Parse an amount as typed on an invoice: currency symbols and codes,
/// thousands separators and parenthesized negatives are accepted, so
/// `"USD 1,200.50"`, `"$1,200.50"` and `"(45)"` all parse. Anything else
/// that is not plainly numeric is `None`.
pub fn parse_financial_number(s: &str) -> Option<f64> {
    let mut text = s.trim();
    let negated = match text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => {
            text = inner;
            true
        }
        None => false,
    };
    for code in CURRENCY_CODES {
        text = text
            .strip_prefix(code)
            .or_else(|| text.strip_suffix(code))
            .unwrap_or(text)
            .trim();
    }

    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | '¥' | '€' | '₹' | ',') && !c.is_whitespace())
        .collect();
    let unsigned = match digits.strip_prefix(&['-', '+'][..]) {
        Some(_) if negated => return None,
        Some(rest) => rest,
        None => digits.as_str(),
    };
    if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let value: f64 = digits.parse().ok()?;
    Some(if negated { -value } else { value })
}

// ---------------------------------------------------------------------------
// RawGrid + Workbook
// ---------------------------------------------------------------------------

/// Rows of untyped cells, in source order. Row `i` is spreadsheet row `i + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Convenience constructor from string literals. Empty strings become
    /// empty cells.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| Cell::from(*s)).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub grid: RawGrid,
}

/// Named grids in the source file's sheet order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, grid: RawGrid) {
        self.sheets.push(Sheet {
            name: name.into(),
            grid,
        });
    }

    pub fn with_sheet(mut self, name: impl Into<String>, grid: RawGrid) -> Self {
        self.push(name, grid);
        self
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn first(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
