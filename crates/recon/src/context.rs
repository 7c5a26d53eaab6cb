use tracing::debug;

use crate::aggregate::{ErrorKind, ErrorLog, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// State threaded through one run: how chatty to be, and the findings
/// collected so far.
#[derive(Debug, Default)]
pub struct RunContext {
    verbosity: Verbosity,
    errors: ErrorLog,
}

impl RunContext {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            errors: ErrorLog::new(),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Emit per-sheet diagnostics (sample keys, row counts).
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Record a row-level finding.
    pub fn report(
        &mut self,
        sheet: &str,
        row: usize,
        identifier: impl Into<String>,
        category: ErrorKind,
        message: impl Into<String>,
    ) {
        self.push(sheet, Some(row), identifier.into(), category, message.into());
    }

    /// Record a finding about a whole sheet.
    pub fn report_sheet(&mut self, sheet: &str, category: ErrorKind, message: impl Into<String>) {
        self.push(sheet, None, String::new(), category, message.into());
    }

    fn push(
        &mut self,
        sheet: &str,
        row: Option<usize>,
        identifier: String,
        category: ErrorKind,
        message: String,
    ) {
        debug!(sheet, row = ?row, %category, identifier = %identifier, "{message}");
        self.errors.push(ValidationError {
            sheet: sheet.to_string(),
            row,
            identifier,
            category,
            message,
        });
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn into_errors(self) -> ErrorLog {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn findings_are_collected_in_order() {
        let mut ctx = RunContext::new(Verbosity::Normal);
        ctx.report_sheet("Notes", ErrorKind::HeaderNotFound, "Could not find header row");
        ctx.report("Invoice", 7, "P-9", ErrorKind::NoMatchingReference, "No match");

        let entries = ctx.errors().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].row, None);
        assert_eq!(entries[0].identifier, "");
        assert_eq!(entries[1].row, Some(7));
        assert_eq!(entries[1].identifier, "P-9");
    }

    #[test]
    fn verbosity_flag() {
        assert!(RunContext::new(Verbosity::Verbose).is_verbose());
        assert!(!RunContext::default().is_verbose());
    }
}
