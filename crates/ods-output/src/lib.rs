//! CSV report writer.

pub mod csv_report;
pub mod error;

pub use csv_report::{DEFAULT_OUTPUT_FILE, ReportLayout, write_report, write_report_to};
pub use error::{OutputError, Result};
