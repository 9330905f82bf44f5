//! Run configuration with the built-in Brighton defaults.

use std::path::PathBuf;
use std::time::Duration;

use ods_model::{DEFAULT_BATCH_SIZE, RoleFilter};
use ods_output::{DEFAULT_OUTPUT_FILE, ReportLayout};
use ods_search::DEFAULT_API_URL;

/// Pause between consecutive searches.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(200);

/// Characters of the first raw response echoed to the log.
pub const RESPONSE_SAMPLE_CHARS: usize = 500;

/// Brighton and surrounding postcode prefixes, formatted the way the search API expects.
pub const DEFAULT_POSTCODES: &[&str] = &[
    "BN1", "BN2", "BN3", "BN4", "BN5", "BN6", "BN7", "BN8", "BN9", "BN10 7", "BN10 8", "BN10 9",
    "BN11 2", "BN14 0", "BN14 7", "BN14 8", "BN14 9", "BN15 0", "BN15 5", "BN15 8", "BN15 9",
    "BN21 4", "BN25 2", "BN26 5", "BN26 6", "BN41 1", "BN41 2", "BN41 9", "BN42 4", "BN43 5",
    "BN43 6", "BN43 9", "BN44 3", "BN44 4", "BN45 7", "BN50 8", "BN50 9", "BN51 9", "BN52 9",
    "BN88 1", "BN88 3", "BN88 4", "BN95 1", "BN99 6", "BN99 8", "BN99 9", "PO22 7", "RH11 9",
    "RH13 8", "RH15 0", "RH15 5", "RH15 8", "RH15 9", "RH16 4", "RH17 5", "RH17 6", "RH17 7",
    "TN22 5",
];

/// Everything a single run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Search endpoint.
    pub api_url: String,
    /// Postcode prefixes, searched in order.
    pub postcodes: Vec<String>,
    /// `batchSize` sent with every request.
    pub batch_size: u32,
    /// Fixed pause after every request.
    pub request_delay: Duration,
    pub output_path: PathBuf,
    pub role_filter: RoleFilter,
    pub layout: ReportLayout,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            postcodes: DEFAULT_POSTCODES.iter().map(ToString::to_string).collect(),
            batch_size: DEFAULT_BATCH_SIZE,
            request_delay: DEFAULT_REQUEST_DELAY,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            role_filter: RoleFilter::default(),
            layout: ReportLayout::default(),
        }
    }
}

impl RunConfig {
    /// The original fixed report: SUB ICB LOCATION and ICB organisations in
    /// the four-column layout.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            role_filter: RoleFilter::SubIcbLocation,
            layout: ReportLayout::Legacy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_postcodes<I, S>(mut self, postcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.postcodes = postcodes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_role_filter(mut self, filter: RoleFilter) -> Self {
        self.role_filter = filter;
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    #[must_use]
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: ReportLayout) -> Self {
        self.layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_brighton_report() {
        let config = RunConfig::default();
        assert_eq!(config.postcodes.len(), 58);
        assert_eq!(config.postcodes.first().map(String::as_str), Some("BN1"));
        assert_eq!(config.postcodes.last().map(String::as_str), Some("TN22 5"));
        assert_eq!(config.batch_size, 2000);
        assert_eq!(config.request_delay, Duration::from_millis(200));
        assert_eq!(config.output_path, PathBuf::from("brighton_sub_icb_orgs.csv"));
        assert_eq!(config.role_filter, RoleFilter::None);
        assert_eq!(config.layout, ReportLayout::Filterable);
    }

    #[test]
    fn legacy_uses_sub_icb_filter_and_four_columns() {
        let config = RunConfig::legacy();
        assert_eq!(config.role_filter, RoleFilter::SubIcbLocation);
        assert_eq!(config.layout, ReportLayout::Legacy);
        assert_eq!(config.postcodes.len(), DEFAULT_POSTCODES.len());
    }

    #[test]
    fn builders_override_fields() {
        let config = RunConfig::default()
            .with_postcodes(["BN1", "BN2"])
            .with_request_delay(Duration::ZERO)
            .with_output_path("out.csv");
        assert_eq!(config.postcodes, vec!["BN1".to_string(), "BN2".to_string()]);
        assert_eq!(config.request_delay, Duration::ZERO);
        assert_eq!(config.output_path, PathBuf::from("out.csv"));
    }
}
