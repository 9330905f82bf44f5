//! Query executor for the ODS organisation search API.
//!
//! One blocking `POST` per postcode prefix; no paging, retries or caching.

pub mod client;
pub mod error;

pub use client::{DEFAULT_API_URL, HttpSearchClient, OrganisationSearch};
pub use error::{Result, SearchError};
