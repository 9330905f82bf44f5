//! Data model for ODS organisation searches.
//!
//! Wire types for the search endpoint, the role filter that selects
//! organisations for the report, and the deduplicated result set.

pub mod error;
pub mod filter;
pub mod record;
pub mod result;

pub use error::{ModelError, Result};
pub use filter::{ICB, RoleFilter, RoleMatch, SUB_ICB_LOCATION, UNFILTERED_LABEL};
pub use record::{
    ACTIVE_STATUS, DEFAULT_BATCH_SIZE, OrgArray, OrganisationRecord, SearchRequest,
    SearchResponse, SkippedEntry,
};
pub use result::{ResultRow, ResultSet};
