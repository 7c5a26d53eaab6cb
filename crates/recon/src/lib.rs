//! `shipcheck-recon` — shipment reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded grids (invoice, shipping list,
//! duty table) and returns the ordered list of findings. No file IO.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod context;
pub mod describe;
pub mod duty;
pub mod engine;
pub mod error;
pub mod extract;
pub mod grid;
pub mod header;
pub mod identifier;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod schema;
pub mod sheets;
pub mod similarity;

pub use aggregate::{ErrorKind, ErrorLog, ErrorSummary, ValidationError};
pub use config::ReconConfig;
pub use context::{RunContext, Verbosity};
pub use engine::run;
pub use error::ReconError;
pub use grid::{Cell, RawGrid, Workbook};
pub use model::{ReconInput, ReconResult, Record};
pub use schema::CanonicalField;
