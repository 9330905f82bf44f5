//! Wire types for the ODS organisation general search endpoint.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::ser::Formatter;

use crate::error::{ModelError, Result};

/// Offset sent with every search; results are never paged.
pub const SEARCH_OFFSET: u32 = 0;

/// Batch size large enough to return every match for a postcode prefix.
pub const DEFAULT_BATCH_SIZE: u32 = 2000;

/// Status value an organisation must carry to be reported.
pub const ACTIVE_STATUS: &str = "Active";

/// Request body for one postcode search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text search term, here a postcode prefix such as `BN1` or `RH15 0`.
    pub search_query_general: String,
    pub offset: u32,
    pub batch_size: u32,
}

impl SearchRequest {
    /// Build a single-page request for a postcode prefix.
    #[must_use]
    pub fn new(postcode: impl Into<String>, batch_size: u32) -> Self {
        Self {
            search_query_general: postcode.into(),
            offset: SEARCH_OFFSET,
            batch_size,
        }
    }

    /// The postcode prefix this request searches for.
    #[must_use]
    pub fn postcode(&self) -> &str {
        &self.search_query_general
    }
}

/// One organisation as returned in `orgArray`.
///
/// Every field is optional and loosely typed on the wire. Scalar `id`,
/// `name` and `postcode` values are kept as text, a non-string `status` is
/// treated as missing, and non-string role entries are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub postcode: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_roles")]
    pub role_name: Vec<Option<String>>,
}

impl OrganisationRecord {
    /// Whether the record's status is exactly `Active`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_STATUS)
    }

    /// Non-null role labels in response order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.role_name.iter().filter_map(Option::as_deref)
    }

    /// Role labels joined for the `Role Names` report column.
    #[must_use]
    pub fn joined_roles(&self) -> String {
        self.roles().collect::<Vec<_>>().join(", ")
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_roles<'de, D>(deserializer: D) -> std::result::Result<Vec<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect())
}

/// An `orgArray` element that could not be read as an organisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position in `orgArray`.
    pub index: usize,
    pub reason: String,
}

/// Organisations carried by a response, if the response carried any list at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgArray {
    /// `orgArray` was present and an array (possibly empty).
    Present {
        records: Vec<OrganisationRecord>,
        /// Elements that were not organisation objects.
        skipped: Vec<SkippedEntry>,
    },
    /// `orgArray` was missing or not an array.
    Absent,
}

/// Parsed response body of a search.
///
/// The raw JSON is kept so callers can log a sample of it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    body: Value,
}

impl SearchResponse {
    /// Field holding the list of matching organisations.
    pub const ORG_ARRAY_FIELD: &'static str = "orgArray";

    #[must_use]
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Parse a response body from its text form.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let body = serde_json::from_str(text).map_err(ModelError::InvalidJson)?;
        Ok(Self { body })
    }

    /// Body serialized with `", "` and `": "` separators, cut to at most
    /// `max_chars` characters.
    #[must_use]
    pub fn sample(&self, max_chars: usize) -> String {
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, SpacedFormatter);
        if self.body.serialize(&mut serializer).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&buffer)
            .chars()
            .take(max_chars)
            .collect()
    }

    /// Decode `orgArray` into records.
    ///
    /// A missing or non-array field is [`OrgArray::Absent`]. Elements that are
    /// not organisation objects are reported in `skipped` and do not affect
    /// their neighbours.
    #[must_use]
    pub fn organisations(&self) -> OrgArray {
        let Some(Value::Array(items)) = self.body.get(Self::ORG_ARRAY_FIELD) else {
            return OrgArray::Absent;
        };
        let mut records = Vec::with_capacity(items.len());
        let mut skipped = Vec::new();
        for (index, item) in items.iter().enumerate() {
            if !item.is_object() {
                skipped.push(SkippedEntry {
                    index,
                    reason: format!("expected an organisation object, found {item}"),
                });
                continue;
            }
            match OrganisationRecord::deserialize(item) {
                Ok(record) => records.push(record),
                Err(error) => skipped.push(SkippedEntry {
                    index,
                    reason: error.to_string(),
                }),
            }
        }
        OrgArray::Present { records, skipped }
    }
}

/// Compact JSON with a space after every `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(response: &SearchResponse) -> (Vec<OrganisationRecord>, Vec<SkippedEntry>) {
        match response.organisations() {
            OrgArray::Present { records, skipped } => (records, skipped),
            OrgArray::Absent => panic!("expected orgArray"),
        }
    }

    #[test]
    fn request_serializes_with_camel_case_fields() {
        let request = SearchRequest::new("RH15 0", DEFAULT_BATCH_SIZE);
        let value = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(
            value,
            json!({"searchQueryGeneral": "RH15 0", "offset": 0, "batchSize": 2000})
        );
        assert_eq!(request.postcode(), "RH15 0");
    }

    #[test]
    fn record_tolerates_missing_and_null_fields() {
        let record: OrganisationRecord =
            serde_json::from_value(json!({"id": "X1", "name": null, "roleName": null}))
                .expect("decode record");
        assert_eq!(record.id, "X1");
        assert_eq!(record.name, "");
        assert_eq!(record.postcode, "");
        assert!(record.status.is_none());
        assert!(record.role_name.is_empty());
        assert!(!record.is_active());
    }

    #[test]
    fn record_tolerates_off_type_fields() {
        let record: OrganisationRecord = serde_json::from_value(json!({
            "id": 12345,
            "name": true,
            "status": 1,
            "roleName": "ICB"
        }))
        .expect("decode record");
        assert_eq!(record.id, "12345");
        assert_eq!(record.name, "true");
        assert!(record.status.is_none());
        assert!(record.role_name.is_empty());
    }

    #[test]
    fn roles_skip_null_entries() {
        let record: OrganisationRecord = serde_json::from_value(json!({
            "id": "X2",
            "status": "Active",
            "roleName": ["GP PRACTICE", null, 7, "PRESCRIBING COST CENTRE"],
            "lastChangeDate": "2024-01-01"
        }))
        .expect("decode record");
        assert!(record.is_active());
        assert_eq!(
            record.joined_roles(),
            "GP PRACTICE, PRESCRIBING COST CENTRE"
        );
    }

    #[test]
    fn status_comparison_is_exact() {
        let record = OrganisationRecord {
            status: Some("active".to_string()),
            ..OrganisationRecord::default()
        };
        assert!(!record.is_active());
    }

    #[test]
    fn missing_org_array_is_absent() {
        let response = SearchResponse::new(json!({"totalCount": 0}));
        assert_eq!(response.organisations(), OrgArray::Absent);
    }

    #[test]
    fn non_array_org_array_is_absent() {
        let response = SearchResponse::new(json!({"orgArray": "none"}));
        assert_eq!(response.organisations(), OrgArray::Absent);
    }

    #[test]
    fn empty_org_array_is_present() {
        let response = SearchResponse::new(json!({"orgArray": []}));
        let (records, skipped) = decode(&response);
        assert!(records.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn off_type_record_does_not_drop_its_neighbours() {
        let response = SearchResponse::new(json!({"orgArray": [
            {"id": "A1", "name": "Test Org", "status": "Active", "roleName": ["ICB"]},
            {"id": 12345, "status": "Inactive", "roleName": ["ICB"]},
        ]}));
        let (records, skipped) = decode(&response);
        assert_eq!(records.len(), 2);
        assert!(skipped.is_empty());
        assert!(records[0].is_active());
        assert_eq!(records[1].id, "12345");
        assert!(!records[1].is_active());
    }

    #[test]
    fn non_object_entries_are_skipped_with_their_index() {
        let response = SearchResponse::new(json!({"orgArray": [{"id": "A"}, 42, {"id": "B"}]}));
        let (records, skipped) = decode(&response);
        assert_eq!(records.len(), 2);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].index, 1);
        assert!(skipped[0].reason.contains("42"));
    }

    #[test]
    fn sample_uses_spaced_separators_and_truncates_by_characters() {
        let response =
            SearchResponse::from_json_str(r#"{"orgArray":[{"id":"A1"},{"id":"B2"}],"total":2}"#)
                .expect("parse");
        assert_eq!(
            response.sample(500),
            r#"{"orgArray": [{"id": "A1"}, {"id": "B2"}], "total": 2}"#
        );
        assert_eq!(response.sample(5), "{\"org");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            SearchResponse::from_json_str("<html>"),
            Err(ModelError::InvalidJson(_))
        ));
    }
}
