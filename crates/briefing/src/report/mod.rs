//! Report assembly and on-disk report store

pub mod assembler;
pub mod markdown;
pub mod store;

pub use assembler::{GeneratedReport, ReportGenerator};
pub use store::{DeleteOutcome, LoadedReport, ReportStore};
