//! Cached access to listings
//!
//! `ListingService` ties the API client to the cache: it serves fresh cache
//! entries, fetches and stores on a miss, and falls back to the bundled sample
//! listings when the listing page cannot be loaded.

use chrono::{DateTime, Local};

use crate::cache::{CacheStore, KeyValueStorage};
use crate::config::{CacheConfig, Config};
use crate::data::sample::sample_page;
use crate::data::{
    ListingPage, ListingQuery, ListingsClient, ListingsError, Normalizer, PropertyDetails,
    PropertyListing,
};
use crate::featured::{hour_seed, select_featured};

/// Cache key of the listing page
pub const LISTINGS_CACHE_KEY: &str = "property_listings";

/// Cache key of the featured pick
pub const FEATURED_CACHE_KEY: &str = "featured_property";

/// Cache key of one property's details
pub fn details_cache_key(property_id: &str) -> String {
    format!("property_details_{}", property_id)
}

/// Where a listing page came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    Cache,
    Network,
    /// Bundled sample data, served because the fetch failed
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedListings {
    pub page: ListingPage,
    pub source: ListingSource,
}

/// Cache lifetimes in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLifetimes {
    pub listings: u64,
    pub featured: u64,
    pub details: u64,
}

impl Default for CacheLifetimes {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for CacheLifetimes {
    fn from(config: &CacheConfig) -> Self {
        Self {
            listings: config.listings_ttl_minutes,
            featured: config.featured_ttl_minutes,
            details: config.details_ttl_minutes,
        }
    }
}

pub struct ListingService<S> {
    client: ListingsClient,
    cache: CacheStore<S>,
    lifetimes: CacheLifetimes,
    query: ListingQuery,
    /// Page size used for featured selection without a cached page
    featured_records: u32,
}

impl<S: KeyValueStorage> ListingService<S> {
    pub fn new(client: ListingsClient, cache: CacheStore<S>) -> Self {
        Self {
            client,
            cache,
            lifetimes: CacheLifetimes::default(),
            query: ListingQuery::default(),
            featured_records: 100,
        }
    }

    /// Builds the client, cache and settings from configuration
    pub fn from_config(config: &Config, storage: S) -> Self {
        let normalizer = Normalizer::new(config.branding.clone());
        Self {
            client: ListingsClient::from_config(&config.api, normalizer),
            cache: CacheStore::with_namespace(storage, config.cache.namespace.clone()),
            lifetimes: CacheLifetimes::from(&config.cache),
            query: ListingQuery::from_config(&config.api),
            featured_records: config.api.featured_records_per_page,
        }
    }

    pub fn with_lifetimes(mut self, lifetimes: CacheLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    pub fn with_query(mut self, query: ListingQuery) -> Self {
        self.query = query;
        self
    }

    pub fn client(&self) -> &ListingsClient {
        &self.client
    }

    pub fn cache(&self) -> &CacheStore<S> {
        &self.cache
    }

    /// Loads the listing page; never fails
    pub async fn load_listings(&self) -> LoadedListings {
        if let Some(page) = self.cache.get::<ListingPage>(LISTINGS_CACHE_KEY) {
            log::info!("Loading {} listings from cache", page.listings.len());
            return LoadedListings {
                page,
                source: ListingSource::Cache,
            };
        }

        log::info!("Fetching listings from API");
        match self.client.fetch_listings(&self.query).await {
            Ok(page) => {
                self.cache
                    .set(LISTINGS_CACHE_KEY, &page, self.lifetimes.listings);
                LoadedListings {
                    page,
                    source: ListingSource::Network,
                }
            }
            Err(e) => {
                log::warn!("Failed to fetch listings, showing sample listings: {}", e);
                LoadedListings {
                    page: sample_page(),
                    source: ListingSource::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Featured listing for the current local hour
    pub async fn featured_listing(&self) -> Result<Option<PropertyListing>, ListingsError> {
        self.featured_listing_at(Local::now()).await
    }

    /// Featured listing for the hour containing `now`
    ///
    /// A fresh cached pick wins even if `now` falls in a later hour.
    pub async fn featured_listing_at(
        &self,
        now: DateTime<Local>,
    ) -> Result<Option<PropertyListing>, ListingsError> {
        if let Some(listing) = self.cache.get::<PropertyListing>(FEATURED_CACHE_KEY) {
            log::info!("Loading featured listing from cache");
            return Ok(Some(listing));
        }

        log::info!("Selecting new featured listing");
        let listings = match self.cache.get::<ListingPage>(LISTINGS_CACHE_KEY) {
            Some(page) => {
                log::debug!("Using cached listings for featured selection");
                page.listings
            }
            None => {
                log::debug!("Fetching listings for featured selection");
                let query = self.query.clone().with_records_per_page(self.featured_records);
                self.client.fetch_listings(&query).await?.listings
            }
        };

        let selected = select_featured(&listings, hour_seed(&now)).cloned();
        if let Some(listing) = &selected {
            self.cache
                .set(FEATURED_CACHE_KEY, listing, self.lifetimes.featured);
        }
        Ok(selected)
    }

    /// Full record of one property
    pub async fn details(
        &self,
        property_id: &str,
        reference_number: &str,
    ) -> Result<PropertyDetails, ListingsError> {
        let key = details_cache_key(property_id);
        if let Some(details) = self.cache.get::<PropertyDetails>(&key) {
            log::debug!("Loading details for {} from cache", property_id);
            return Ok(details);
        }

        let details = self
            .client
            .fetch_details(property_id, reference_number)
            .await?;
        self.cache.set(&key, &details, self.lifetimes.details);
        Ok(details)
    }
}
