//! Core data models for property listings
//!
//! This module contains the normalized record types produced from the listings
//! API, plus the client that fetches them and the rules that build them.
//! Field names serialize in camelCase so cached entries keep the same shape the
//! web front end reads.

pub mod listings;
pub mod normalize;
pub mod raw;
pub mod sample;

pub use listings::{ListingQuery, ListingsClient, ListingsError};
pub use normalize::Normalizer;

use serde::{Deserialize, Serialize};

/// Price text used when a listing has no advertised price
pub const CONTACT_FOR_PRICE: &str = "Contact for Price";

/// A listing agent or office contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAgent {
    pub name: String,
    /// Formatted as `(area) number`
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Summary record used for list views, filtering and featured selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    pub id: String,
    pub mls_number: String,
    pub title: String,
    /// Display price, or [`CONTACT_FOR_PRICE`]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_value: Option<u64>,
    pub location: String,
    pub city: String,
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    /// Interior or land size as reported, `N/A` when unknown
    pub sqft: String,
    /// Marketing category (Waterfront, Farm, Vacant Land, Residential)
    #[serde(rename = "type")]
    pub category: String,
    pub description: String,
    pub features: Vec<String>,
    pub image: String,
    pub agent_name: String,
    pub agent_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_email: Option<String>,
    pub agents: Vec<PropertyAgent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Building-type label (Residential, Townhouse, Condo)
    #[serde(rename = "propertyType")]
    pub building_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spaces: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_on_market: Option<String>,
}

impl PropertyListing {
    /// Numeric asking price, `None` for "Contact for Price" listings
    pub fn numeric_price(&self) -> Option<u64> {
        self.price_value.filter(|price| *price > 0)
    }
}

/// One page of listings as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(rename = "properties")]
    pub listings: Vec<PropertyListing>,
    /// Server-side total, which may exceed `listings.len()`
    pub total_records: u64,
}

/// Full record for a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub id: String,
    pub mls_number: String,
    pub title: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_value: Option<u64>,
    pub description: String,
    pub address: Address,
    pub property: PropertyFacts,
    pub features: Vec<String>,
    pub images: Vec<PropertyImage>,
    pub agents: Vec<PropertyAgent>,
    pub financials: Financials,
    pub dates: ListingDates,
    pub rooms: Vec<Room>,
    pub utilities: Utilities,
    pub additional: AdditionalInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Building and lot facts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFacts {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_baths: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exterior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub list_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<String>,
    /// `$<n>/sqft`, present when both price and interior size are numeric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_sqft: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_on_market: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<String>,
}
