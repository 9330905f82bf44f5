//! Search pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Query**: one search per postcode prefix, failures contained per postcode
//! 2. **Filter**: keep active organisations matching the role filter
//! 3. **Accumulate**: collect a row per match, duplicates included
//! 4. **Dedup**: collapse rows to one per ODS code, last write wins
//! 5. **Write**: export the result set as CSV
//!
//! Every stage runs on the calling thread; the only wait is the fixed pause
//! after each request.

use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use ods_model::{OrgArray, OrganisationRecord, ResultRow, ResultSet, RoleFilter, SearchRequest};
use ods_output::write_report;
use ods_search::OrganisationSearch;

use crate::config::{RESPONSE_SAMPLE_CHARS, RunConfig};

// ============================================================================
// Stage 1: Query
// ============================================================================

/// What one postcode search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The response carried an organisation list (possibly empty).
    Found(Vec<OrganisationRecord>),
    /// The response had no organisation list.
    NoneFound,
    /// The request failed or the body was not JSON; counts as zero results.
    Failed { reason: String },
}

impl QueryOutcome {
    /// Records to filter, empty for anything but [`QueryOutcome::Found`].
    #[must_use]
    pub fn records(&self) -> &[OrganisationRecord] {
        match self {
            Self::Found(records) => records,
            Self::NoneFound | Self::Failed { .. } => &[],
        }
    }

    /// Why the search failed, if it did.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason),
            Self::Found(_) | Self::NoneFound => None,
        }
    }
}

/// Search a single postcode prefix.
///
/// Request and body errors never escape: they are logged with the postcode
/// and returned as [`QueryOutcome::Failed`]. Unreadable `orgArray` entries are
/// logged and skipped; the rest of the response is kept. When `sample_chars`
/// is set, the start of the raw response is logged.
pub fn query_postcode<S>(
    search: &S,
    postcode: &str,
    batch_size: u32,
    sample_chars: Option<usize>,
) -> QueryOutcome
where
    S: OrganisationSearch + ?Sized,
{
    let request = SearchRequest::new(postcode, batch_size);
    let response = match search.search(&request) {
        Ok(response) => response,
        Err(error) => {
            warn!(postcode, error = %error, "Error fetching {postcode}: {error}");
            return QueryOutcome::Failed {
                reason: error.to_string(),
            };
        }
    };

    if let Some(limit) = sample_chars {
        info!(
            "Example API response for {postcode}: {}...",
            response.sample(limit)
        );
    }

    match response.organisations() {
        OrgArray::Present { records, skipped } => {
            for entry in &skipped {
                warn!(
                    postcode,
                    index = entry.index,
                    "Skipping orgArray entry {} for {postcode}: {}",
                    entry.index,
                    entry.reason
                );
            }
            let count = records.len();
            info!(count, "Found {count} organisations for {postcode}");
            QueryOutcome::Found(records)
        }
        OrgArray::Absent => {
            info!("No organisations found for {postcode}");
            QueryOutcome::NoneFound
        }
    }
}

// ============================================================================
// Stages 2-3: Filter and accumulate
// ============================================================================

/// Per-postcode counts for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcodeStats {
    pub postcode: String,
    /// Organisations returned by the search.
    pub returned: usize,
    /// Organisations that passed the filter.
    pub matched: usize,
    /// Failure reason when the search failed.
    pub error: Option<String>,
    /// Whether the response carried an organisation list.
    pub had_results: bool,
}

/// Rows accumulated across every postcode, before deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRun {
    /// Matching rows in encounter order, duplicates included.
    pub rows: Vec<ResultRow>,
    pub postcodes: Vec<PostcodeStats>,
}

impl SearchRun {
    /// Matches found, counting an organisation once per postcode it appeared under.
    #[must_use]
    pub fn total_found(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn failed_postcodes(&self) -> usize {
        self.postcodes.iter().filter(|s| s.error.is_some()).count()
    }

    /// Collapse the accumulated rows to one per ODS code.
    #[must_use]
    pub fn dedupe(&self) -> ResultSet {
        ResultSet::dedupe(&self.rows)
    }

    /// Filter one postcode's records and append the matches.
    pub fn accumulate(&mut self, postcode: &str, outcome: &QueryOutcome, filter: &RoleFilter) {
        let mut matched = 0;
        for record in outcome.records() {
            let Some(role) = filter.evaluate(record) else {
                continue;
            };
            info!(
                ods_code = %record.id,
                "  Found {}: {} (ODS: {})",
                role.label,
                record.name,
                record.id
            );
            self.rows.push(ResultRow::from_match(record, role));
            matched += 1;
        }
        self.postcodes.push(PostcodeStats {
            postcode: postcode.to_string(),
            returned: outcome.records().len(),
            matched,
            error: outcome.failure_reason().map(str::to_string),
            had_results: matches!(outcome, QueryOutcome::Found(_)),
        });
    }
}

/// Query every configured postcode in order and accumulate the matches.
pub fn search_postcodes<S>(search: &S, config: &RunConfig) -> SearchRun
where
    S: OrganisationSearch + ?Sized,
{
    let span = info_span!(
        "search",
        postcodes = config.postcodes.len(),
        filter = %config.role_filter
    );
    let _guard = span.enter();
    info!(
        "Searching for {} in {} postcodes...",
        config.role_filter,
        config.postcodes.len()
    );

    let mut run = SearchRun::default();
    for (index, postcode) in config.postcodes.iter().enumerate() {
        let postcode_span = info_span!("postcode", postcode = %postcode);
        let _postcode_guard = postcode_span.enter();
        info!("Searching postcode: {postcode}");

        let sample = (index == 0).then_some(RESPONSE_SAMPLE_CHARS);
        let outcome = query_postcode(search, postcode, config.batch_size, sample);
        run.accumulate(postcode, &outcome, &config.role_filter);

        thread::sleep(config.request_delay);
    }
    run
}

// ============================================================================
// Stages 4-5: Dedup and write
// ============================================================================

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run: SearchRun,
    pub unique: ResultSet,
    pub output_path: PathBuf,
    pub role_filter: RoleFilter,
}

/// Run the whole pipeline and write the report file.
///
/// Per-postcode failures are contained in the returned report; only a
/// failure to write the output file is an error.
pub fn run<S>(search: &S, config: &RunConfig) -> Result<RunReport>
where
    S: OrganisationSearch + ?Sized,
{
    let run = search_postcodes(search, config);
    let unique = run.dedupe();
    write_report(&config.output_path, config.layout, &unique)
        .with_context(|| format!("write report to {}", config.output_path.display()))?;
    info!(
        found = run.total_found(),
        unique = unique.len(),
        failed = run.failed_postcodes(),
        "report written"
    );
    Ok(RunReport {
        run,
        unique,
        output_path: config.output_path.clone(),
        role_filter: config.role_filter.clone(),
    })
}
