//! Flat CSV export of the deduplicated result set.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use ods_model::ResultRow;

use crate::error::{OutputError, Result};

/// Report file written when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "brighton_sub_icb_orgs.csv";

const ODS_CODE: &str = "ODS Code";
const NAME: &str = "Name";
const POSTCODE: &str = "Postcode";

/// Column set of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportLayout {
    /// `ODS Code, Name, Postcode, Role`.
    Legacy,
    /// `ODS Code, Name, Postcode, Role Type, Role Names`.
    #[default]
    Filterable,
}

impl ReportLayout {
    /// Header row for this layout.
    #[must_use]
    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Legacy => &[ODS_CODE, NAME, POSTCODE, "Role"],
            Self::Filterable => &[ODS_CODE, NAME, POSTCODE, "Role Type", "Role Names"],
        }
    }

    fn record(self, row: &ResultRow) -> Vec<&str> {
        let mut fields = vec![
            row.ods_code.as_str(),
            row.name.as_str(),
            row.postcode.as_str(),
            row.role_type.as_str(),
        ];
        if self == Self::Filterable {
            fields.push(row.role_names.as_str());
        }
        fields
    }
}

/// Write the report to `path`, replacing any existing file.
///
/// Returns the number of data rows written.
pub fn write_report<'a>(
    path: &Path,
    layout: ReportLayout,
    rows: impl IntoIterator<Item = &'a ResultRow>,
) -> Result<usize> {
    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let written = write_report_to(file, layout, rows)?;
    debug!(path = %path.display(), rows = written, "report written");
    Ok(written)
}

/// Write the report to any writer.
pub fn write_report_to<'a, W: Write>(
    writer: W,
    layout: ReportLayout,
    rows: impl IntoIterator<Item = &'a ResultRow>,
) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(layout.headers())?;
    let mut written = 0;
    for row in rows {
        csv.write_record(layout.record(row))?;
        written += 1;
    }
    csv.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn row(code: &str, name: &str, role_type: &str, role_names: &str) -> ResultRow {
        ResultRow {
            ods_code: code.to_string(),
            name: name.to_string(),
            postcode: "BN1 1AA".to_string(),
            role_type: role_type.to_string(),
            role_names: role_names.to_string(),
        }
    }

    fn render(layout: ReportLayout, rows: &[ResultRow]) -> String {
        let mut buffer = Vec::new();
        write_report_to(&mut buffer, layout, rows).expect("write report");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn filterable_layout_has_role_names() {
        let rows = vec![row("A1", "Test Org", "ICB", "ICB")];
        assert_snapshot!(render(ReportLayout::Filterable, &rows), @r"
        ODS Code,Name,Postcode,Role Type,Role Names
        A1,Test Org,BN1 1AA,ICB,ICB
        ");
    }

    #[test]
    fn legacy_layout_has_four_columns() {
        let rows = vec![row(
            "A1",
            "Test Org",
            "SUB ICB LOCATION",
            "NHS SUB ICB LOCATION",
        )];
        assert_snapshot!(render(ReportLayout::Legacy, &rows), @r"
        ODS Code,Name,Postcode,Role
        A1,Test Org,BN1 1AA,SUB ICB LOCATION
        ");
    }

    #[test]
    fn fields_with_delimiters_and_quotes_are_quoted() {
        let rows = vec![row(
            "Q1",
            "Smith, Jones \"and\" Partners",
            "Active",
            "GP PRACTICE, PRESCRIBING COST CENTRE",
        )];
        let output = render(ReportLayout::Filterable, &rows);
        let data = output.lines().nth(1).expect("data row");
        assert_eq!(
            data,
            "Q1,\"Smith, Jones \"\"and\"\" Partners\",BN1 1AA,Active,\"GP PRACTICE, PRESCRIBING COST CENTRE\""
        );
    }

    #[test]
    fn empty_result_writes_header_only() {
        let output = render(ReportLayout::Filterable, &[]);
        assert_eq!(output, "ODS Code,Name,Postcode,Role Type,Role Names\n");
    }

    #[test]
    fn existing_file_is_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.csv");
        let stale = "stale contents that are longer than the new report\n".repeat(10);
        std::fs::write(&path, stale).expect("seed file");

        let rows = vec![row("A1", "Test Org", "ICB", "ICB")];
        let written = write_report(&path, ReportLayout::Legacy, &rows).expect("write");

        assert_eq!(written, 1);
        let contents = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(contents, "ODS Code,Name,Postcode,Role\nA1,Test Org,BN1 1AA,ICB\n");
    }

    #[test]
    fn missing_directory_is_a_create_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("report.csv");
        let err = write_report(&path, ReportLayout::Filterable, std::iter::empty())
            .expect_err("should fail");
        assert!(matches!(err, OutputError::Create { .. }));
    }
}
