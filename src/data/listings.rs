//! Listings API client
//!
//! Fetches an organization's listing page and single-property details from
//! the realty API, then hands the raw payloads to the [`Normalizer`].

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::raw::{ApiErrorCode, ListingsResponse, RawListing};
use super::{ListingPage, Normalizer, PropertyDetails};
use crate::config::ApiConfig;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://realty-in-ca1.p.rapidapi.com";

/// Default value of the host header
pub const DEFAULT_API_HOST: &str = "realty-in-ca1.p.rapidapi.com";

const LISTINGS_PATH: &str = "/agents/get-listings";
const DETAILS_PATH: &str = "/properties/detail";

/// English
const CULTURE_ID: &str = "1";

/// Square feet
const MEASUREMENT_UNIT: &str = "1";

/// Errors that can occur when fetching listings
#[derive(Debug, Error)]
pub enum ListingsError {
    /// Request never produced a response
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status, or an error code embedded in the payload
    #[error("API request failed: {}", format_api_error(.status, .description))]
    ApiRequest {
        status: Option<u16>,
        description: String,
    },

    /// Response body is not valid JSON
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}

fn format_api_error(status: &Option<u16>, description: &str) -> String {
    match status {
        Some(code) => format!("{} {}", code, description),
        None => description.to_string(),
    }
}

/// Query parameters for the listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub records_per_page: u32,
    /// `A` or `D`
    pub sort_order: String,
    pub sort_by: u32,
    /// Organization id
    pub source_id: u64,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            records_per_page: 50,
            sort_order: "D".to_string(),
            sort_by: 1,
            source_id: 56031,
        }
    }
}

impl ListingQuery {
    /// Query for the configured organization and page size
    pub fn from_config(api: &ApiConfig) -> Self {
        Self {
            records_per_page: api.records_per_page,
            sort_order: api.sort_order.clone(),
            sort_by: api.sort_by,
            source_id: api.organization_id,
        }
    }

    /// Same query with a different page size
    pub fn with_records_per_page(mut self, records_per_page: u32) -> Self {
        self.records_per_page = records_per_page;
        self
    }
}

/// Client for the listings API
#[derive(Debug, Clone)]
pub struct ListingsClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
    /// Value of the `x-rapidapi-host` header
    api_host: String,
    /// Value of the `x-rapidapi-key` header
    api_key: String,
    normalizer: Normalizer,
}

impl ListingsClient {
    /// Creates a client for the public API with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_key: api_key.into(),
            normalizer: Normalizer::default(),
        }
    }

    /// Creates a client from configuration
    pub fn from_config(api: &ApiConfig, normalizer: Normalizer) -> Self {
        Self {
            http_client: Client::new(),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_host: api.host.clone(),
            api_key: api.key.clone(),
            normalizer,
        }
    }

    /// Points the client at another server (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Fetches one page of the organization's listings
    pub async fn fetch_listings(&self, query: &ListingQuery) -> Result<ListingPage, ListingsError> {
        let request = self
            .get(LISTINGS_PATH)
            .query(&[
                ("RecordsPerPage", query.records_per_page.to_string()),
                ("SortOrder", query.sort_order.clone()),
                ("SortBy", query.sort_by.to_string()),
                ("CultureId", CULTURE_ID.to_string()),
                ("OrganizationId", query.source_id.to_string()),
            ]);

        let response: ListingsResponse = self.send(request).await.map_err(|e| {
            log::error!("Error fetching listings: {}", e);
            e
        })?;
        check_error_code(response.error_code.as_ref()).map_err(|e| {
            log::error!("Error fetching listings: {}", e);
            e
        })?;

        let listings = self.normalizer.listings(&response.results);
        let total_records = response
            .paging
            .and_then(|paging| paging.total_records)
            .and_then(|total| u64::try_from(total).ok())
            .unwrap_or(listings.len() as u64);

        log::debug!(
            "Fetched {} listings ({} total)",
            listings.len(),
            total_records
        );
        Ok(ListingPage {
            listings,
            total_records,
        })
    }

    /// Fetches the full record of one property
    pub async fn fetch_details(
        &self,
        property_id: &str,
        reference_number: &str,
    ) -> Result<PropertyDetails, ListingsError> {
        let request = self.get(DETAILS_PATH).query(&[
            ("PropertyID", property_id),
            ("ReferenceNumber", reference_number),
            ("PreferedMeasurementUnit", MEASUREMENT_UNIT),
            ("CultureId", CULTURE_ID),
        ]);

        let raw: RawListing = self.send(request).await.map_err(|e| {
            log::error!("Error fetching property details for {}: {}", property_id, e);
            e
        })?;
        check_error_code(raw.error_code.as_ref()).map_err(|e| {
            log::error!("Error fetching property details for {}: {}", property_id, e);
            e
        })?;

        Ok(self.normalizer.details(&raw))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http_client
            .get(format!("{}{}", self.base_url, path))
            .header("x-rapidapi-host", &self.api_host)
            .header("x-rapidapi-key", &self.api_key)
            .header(ACCEPT, "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ListingsError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ListingsError::ApiRequest {
                status: Some(status.as_u16()),
                description: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Maps an embedded error code other than 200 to an error
fn check_error_code(error_code: Option<&ApiErrorCode>) -> Result<(), ListingsError> {
    match error_code {
        Some(code) if !code.is_success() => Err(ListingsError::ApiRequest {
            status: None,
            description: code
                .description
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        }),
        _ => Ok(()),
    }
}
