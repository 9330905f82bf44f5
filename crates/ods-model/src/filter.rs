//! Role filtering for active organisations.
//!
//! A record qualifies only when its status is exactly `Active`. Beyond that
//! the configured [`RoleFilter`] decides whether its roles match and which
//! label the report row carries.

use std::fmt;

use crate::record::OrganisationRecord;

/// Role group that also accepts organisations whose role is exactly `ICB`.
pub const SUB_ICB_LOCATION: &str = "SUB ICB LOCATION";

/// Exact role accepted alongside [`SUB_ICB_LOCATION`].
pub const ICB: &str = "ICB";

/// Label used when no role filter is configured.
pub const UNFILTERED_LABEL: &str = "Active";

/// Which roles qualify an active organisation for the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoleFilter {
    /// Every active organisation qualifies.
    #[default]
    None,
    /// `SUB ICB LOCATION` roles, plus organisations holding the exact role `ICB`.
    SubIcbLocation,
    /// Any role containing the text, compared case-insensitively.
    Substring(String),
}

impl RoleFilter {
    /// Build a filter from a free-text role name.
    ///
    /// Input is trimmed. Empty input disables filtering and
    /// `sub icb location` in any casing selects the ICB role group.
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self::None
        } else if trimmed.eq_ignore_ascii_case(SUB_ICB_LOCATION) {
            Self::SubIcbLocation
        } else {
            Self::Substring(trimmed.to_string())
        }
    }

    /// Short description used in log lines and the summary.
    #[must_use]
    pub fn describe(&self) -> &str {
        match self {
            Self::None => "all active organisations",
            Self::SubIcbLocation => SUB_ICB_LOCATION,
            Self::Substring(text) => text,
        }
    }

    /// Decide whether `record` qualifies and, if so, which label it gets.
    #[must_use]
    pub fn evaluate(&self, record: &OrganisationRecord) -> Option<RoleMatch> {
        if !record.is_active() {
            return None;
        }
        match self {
            Self::None => Some(RoleMatch::new(UNFILTERED_LABEL)),
            Self::SubIcbLocation => match_sub_icb(record),
            Self::Substring(text) => match_substring(record, text),
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Outcome of a successful filter evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMatch {
    /// Value for the role-type column.
    pub label: String,
}

impl RoleMatch {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

fn match_sub_icb(record: &OrganisationRecord) -> Option<RoleMatch> {
    let is_sub_icb = record
        .roles()
        .any(|role| role.to_uppercase().contains(SUB_ICB_LOCATION));
    let is_icb = record.roles().any(|role| role.to_uppercase() == ICB);
    // ICB wins the label when both apply.
    if is_icb {
        Some(RoleMatch::new(ICB))
    } else if is_sub_icb {
        Some(RoleMatch::new(SUB_ICB_LOCATION))
    } else {
        None
    }
}

fn match_substring(record: &OrganisationRecord, text: &str) -> Option<RoleMatch> {
    let needle = text.to_uppercase();
    record
        .roles()
        .find(|role| role.to_uppercase().contains(&needle))
        .map(RoleMatch::new)
}
