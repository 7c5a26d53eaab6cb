use std::collections::HashMap;

use serde::Serialize;

use crate::identifier::is_missing;
use crate::model::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// Input identifier normalized to the missing-key sentinel.
    MissingIdentifier,
    /// Neither lookup pass found the key.
    Unmatched { key: String },
    Matched {
        reference: &'a Record,
        via: MatchPass,
    },
}

/// Reference records keyed by identifier key. When two rows share a key
/// the later row wins.
#[derive(Debug, Default)]
pub struct ReferenceIndex<'a> {
    by_key: HashMap<String, &'a Record>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn build(records: &'a [Record]) -> Self {
        let mut by_key = HashMap::with_capacity(records.len());
        for record in records {
            by_key.insert(record.identifier_key(), record);
        }
        Self { by_key }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&'a Record> {
        self.by_key.get(key).copied()
    }

    pub fn resolve(&self, record: &Record) -> Resolution<'a> {
        let key = record.identifier_key();
        if is_missing(&key) {
            return Resolution::MissingIdentifier;
        }
        if let Some(reference) = self.get(&key) {
            return Resolution::Matched {
                reference,
                via: MatchPass::Primary,
            };
        }
        if let Some(reference) = self.get(&record.secondary_key()) {
            return Resolution::Matched {
                reference,
                via: MatchPass::Secondary,
            };
        }
        Resolution::Unmatched { key }
    }
}
