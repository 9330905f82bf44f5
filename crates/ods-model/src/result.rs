//! Report rows and the deduplicated result set.

use std::collections::BTreeMap;

use crate::filter::RoleMatch;
use crate::record::OrganisationRecord;

/// One exported organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// ODS code.
    pub ods_code: String,
    pub name: String,
    pub postcode: String,
    /// Matched role, or `Active` when no role filter was applied.
    pub role_type: String,
    /// Every role of the organisation, joined with `", "`.
    pub role_names: String,
}

impl ResultRow {
    #[must_use]
    pub fn from_match(record: &OrganisationRecord, role: RoleMatch) -> Self {
        Self {
            ods_code: record.id.clone(),
            name: record.name.clone(),
            postcode: record.postcode.clone(),
            role_type: role.label,
            role_names: record.joined_roles(),
        }
    }
}

/// Rows collapsed to one per ODS code.
///
/// Later rows overwrite earlier rows with the same code, so the organisation
/// keeps the postcode captured by the most recent search. Iteration is in
/// ascending ODS code order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    rows: BTreeMap<String, ResultRow>,
}

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse accumulated rows, last write wins.
    #[must_use]
    pub fn dedupe<'a>(rows: impl IntoIterator<Item = &'a ResultRow>) -> Self {
        let mut set = Self::new();
        for row in rows {
            set.insert(row.clone());
        }
        set
    }

    /// Insert a row, returning the row it replaced.
    pub fn insert(&mut self, row: ResultRow) -> Option<ResultRow> {
        self.rows.insert(row.ods_code.clone(), row)
    }

    #[must_use]
    pub fn get(&self, ods_code: &str) -> Option<&ResultRow> {
        self.rows.get(ods_code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.values()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultRow;
    type IntoIter = std::collections::btree_map::Values<'a, String, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, postcode: &str) -> ResultRow {
        ResultRow {
            ods_code: code.to_string(),
            name: "Org".to_string(),
            postcode: postcode.to_string(),
            role_type: "ICB".to_string(),
            role_names: "ICB".to_string(),
        }
    }

    #[test]
    fn last_write_wins() {
        let rows = vec![row("ODS123", "BN1 1AA"), row("ODS123", "BN2 2BB")];
        let set = ResultSet::dedupe(&rows);
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get("ODS123").map(|r| r.postcode.as_str()),
            Some("BN2 2BB")
        );
    }

    #[test]
    fn dedupe_is_idempotent() {
        let rows = vec![
            row("B2", "BN2"),
            row("A1", "BN1"),
            row("B2", "BN3"),
            row("C3", "BN4"),
        ];
        let first = ResultSet::dedupe(&rows);
        let second = ResultSet::dedupe(&rows);
        assert_eq!(first, second);
        let again = ResultSet::dedupe(first.iter());
        assert_eq!(first, again);
    }

    #[test]
    fn iteration_is_ordered_by_code() {
        let rows = vec![row("Z9", "BN1"), row("A1", "BN2"), row("M5", "BN3")];
        let set = ResultSet::dedupe(&rows);
        let codes: Vec<&str> = set.iter().map(|r| r.ods_code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "M5", "Z9"]);
    }

    #[test]
    fn insert_returns_replaced_row() {
        let mut set = ResultSet::new();
        assert!(set.insert(row("A1", "BN1")).is_none());
        let replaced = set.insert(row("A1", "BN2")).expect("replaced");
        assert_eq!(replaced.postcode, "BN1");
    }
}
