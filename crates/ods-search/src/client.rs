//! HTTP client for the ODS organisation general search endpoint.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::debug;

use ods_model::{SearchRequest, SearchResponse};

use crate::error::{Result, SearchError};

/// Organisation general search endpoint of the ODS data search and export service.
pub const DEFAULT_API_URL: &str =
    "https://www.odsdatasearchandexport.nhs.uk/api/search/organisationGeneralSearch";

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("ods-finder/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in [`SearchError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Something that can run an organisation search.
///
/// The pipeline only talks to this trait, so runs can be driven by a
/// fixture instead of the live service.
pub trait OrganisationSearch {
    /// Run one search and return the parsed response body.
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// Blocking client for the live search endpoint.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: Client,
    api_url: String,
}

impl HttpSearchClient {
    /// Create a client for the given endpoint.
    ///
    /// The request timeout is left at the transport default.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|err| SearchError::ClientBuild(err.to_string()))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl OrganisationSearch for HttpSearchClient {
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        debug!(postcode = request.postcode(), url = %self.api_url, "posting search");

        let response = self
            .client
            .post(&self.api_url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        debug!(bytes = text.len(), "search response received");
        Ok(SearchResponse::from_json_str(&text)?)
    }
}
