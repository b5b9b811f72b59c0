//! Normalization of raw API records
//!
//! Turns [`RawListing`] payloads into [`PropertyListing`] summaries and
//! [`PropertyDetails`] records. Everything here is pure: missing or malformed
//! fields fall back to defaults and never produce an error.

use once_cell::sync::Lazy;
use regex::Regex;

use super::raw::{RawBuilding, RawIndividual, RawLand, RawListing, RawProperty};
use super::{
    AdditionalInfo, Address, Financials, ListingDates, PropertyAgent, PropertyDetails,
    PropertyFacts, PropertyImage, PropertyListing, Room, Utilities, CONTACT_FOR_PRICE,
};
use crate::config::Branding;

/// City and location text used when an address cannot be parsed
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Size text used when neither interior nor lot size is known
pub const UNKNOWN_SIZE: &str = "N/A";

/// Trailing Canadian postal code such as ` K0G 1V0` or ` K7A1A1`
static POSTAL_CODE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+[A-Z]\d[A-Z]\s*\d[A-Z]\d$").expect("postal code pattern is valid")
});

/// First number in free text, with optional thousands separators and decimals
static NUMBER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("number pattern is valid"));

/// Marketing category used by the type filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Waterfront,
    Farm,
    VacantLand,
    Residential,
}

impl Category {
    /// Returns every category in classification order
    pub fn all() -> &'static [Category] {
        &[
            Category::Waterfront,
            Category::Farm,
            Category::VacantLand,
            Category::Residential,
        ]
    }

    /// Display label, also the value stored in `PropertyListing::category`
    pub fn label(&self) -> &'static str {
        match self {
            Category::Waterfront => "Waterfront",
            Category::Farm => "Farm",
            Category::VacantLand => "Vacant Land",
            Category::Residential => "Residential",
        }
    }
}

/// Description keywords per category, checked in order; first hit wins
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Waterfront, &["waterfront", "lake"]),
    (Category::Farm, &["farm", "barn", "acre"]),
    (Category::VacantLand, &["vacant", "lot", "land"]),
];

/// Raw building-type keywords mapped to a coarse label, checked in order
const BUILDING_TYPE_RULES: &[(&[&str], &str)] = &[
    (&["house", "single family"], "Residential"),
    (&["row", "townhouse"], "Townhouse"),
    (&["condo", "apartment"], "Condo"),
];

const DEFAULT_BUILDING_TYPE: &str = "Residential";

/// A feature label and the lowercase words that imply it
#[derive(Debug, Clone, Copy)]
pub struct FeatureKeyword {
    pub keywords: &'static [&'static str],
    pub label: &'static str,
}

/// Vocabulary scanned in descriptions and amenity text
pub const FEATURE_VOCABULARY: &[FeatureKeyword] = &[
    FeatureKeyword { keywords: &["waterfront", "lake"], label: "Waterfront" },
    FeatureKeyword { keywords: &["garage"], label: "Garage" },
    FeatureKeyword { keywords: &["fireplace"], label: "Fireplace" },
    FeatureKeyword { keywords: &["basement"], label: "Basement" },
    FeatureKeyword { keywords: &["deck", "porch"], label: "Deck/Porch" },
    FeatureKeyword { keywords: &["pool"], label: "Pool" },
    FeatureKeyword { keywords: &["barn"], label: "Barn" },
    FeatureKeyword { keywords: &["workshop"], label: "Workshop" },
    FeatureKeyword { keywords: &["private"], label: "Private" },
    FeatureKeyword { keywords: &["updated", "renovated"], label: "Updated" },
];

/// Classifies a listing from its description
pub fn classify_category(description: &str) -> Category {
    let description = description.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| description.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Residential)
}

/// Maps the API's building type to Residential, Townhouse or Condo
pub fn building_type_label(raw_type: Option<&str>) -> &'static str {
    let Some(raw_type) = raw_type else {
        return DEFAULT_BUILDING_TYPE;
    };
    let raw_type = raw_type.to_lowercase();
    BUILDING_TYPE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| raw_type.contains(k)))
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_BUILDING_TYPE)
}

/// City and cleaned location text from an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLocation {
    pub city: String,
    pub location: String,
}

/// Parses `street|City, Province Postal` address text
///
/// The part after `|` (or the whole text when there is no `|`) is the
/// location. The city is whatever precedes its first comma, unless what
/// follows the comma starts with a digit or a postal-code-like token.
pub fn extract_location(address_text: Option<&str>) -> ParsedLocation {
    let Some(address_text) = address_text else {
        return ParsedLocation {
            city: UNKNOWN_LOCATION.to_string(),
            location: UNKNOWN_LOCATION.to_string(),
        };
    };

    let location_part = address_text.split('|').nth(1).unwrap_or(address_text);

    let city = location_part
        .split_once(',')
        .and_then(|(city, rest)| {
            let city = city.trim();
            let rest = rest.trim_start();
            if city.is_empty() || rest.is_empty() || starts_with_postal_token(rest) {
                None
            } else {
                Some(city.to_string())
            }
        })
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

    let location = POSTAL_CODE_SUFFIX.replace(location_part, "").trim().to_string();

    ParsedLocation { city, location }
}

/// True for text starting with a digit or a letter-digit pair like `K0G`
fn starts_with_postal_token(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(first), _) if first.is_ascii_digit() => true,
        (Some(first), Some(second)) => first.is_ascii_alphabetic() && second.is_ascii_digit(),
        _ => false,
    }
}

/// Scans free text against [`FEATURE_VOCABULARY`]; labels are unique
pub fn extract_features<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut features = Vec::new();
    for text in texts {
        let text = text.to_lowercase();
        for entry in FEATURE_VOCABULARY {
            if entry.keywords.iter().any(|k| text.contains(k)) {
                push_unique(&mut features, entry.label.to_string());
            }
        }
    }
    features
}

fn push_unique(features: &mut Vec<String>, feature: String) {
    if !feature.is_empty() && !features.contains(&feature) {
        features.push(feature);
    }
}

/// Display price, or "Contact for Price" when none is advertised
pub fn format_price(price: Option<&str>) -> String {
    match price {
        Some(price) if !is_contact_price(price) => price.to_string(),
        _ => CONTACT_FOR_PRICE.to_string(),
    }
}

fn is_contact_price(price: &str) -> bool {
    let lower = price.trim().to_lowercase();
    lower.is_empty() || lower.contains("contact") || lower.contains("call")
}

/// Title for a summary listing
///
/// `"<street>, <city>"`, then `"<type> in <city>"`, then
/// `"Beautiful <type> in <region>"`.
pub fn generate_title(address_text: Option<&str>, raw_type: Option<&str>, region: &str) -> String {
    let city = extract_location(address_text).city;
    let property_type = raw_type.unwrap_or("Property");
    let street = address_text
        .and_then(|address| address.split('|').next())
        .unwrap_or("")
        .trim();

    let city_known = city != UNKNOWN_LOCATION;
    if !street.is_empty() && city_known {
        format!("{}, {}", street, city)
    } else if city_known {
        format!("{} in {}", property_type, city)
    } else {
        format!("Beautiful {} in {}", property_type, region)
    }
}

/// Integer part of the first number in text (`"$1,234,567.50"` → 1234567)
///
/// Unit text after the number is ignored, so `"2,250 sq. ft."` is 2250.
pub fn parse_whole_number(text: &str) -> Option<u64> {
    let number = NUMBER_RUN.find(text)?.as_str().replace(',', "");
    let value: f64 = number.parse().ok()?;
    if value.is_finite() && value >= 0.0 && value < u64::MAX as f64 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}

/// Room or space count; `"3 + 1"` counts as 4
pub fn parse_count(text: &str) -> Option<u32> {
    let parts: Vec<u64> = text.split('+').filter_map(parse_whole_number).collect();
    if parts.is_empty() {
        return None;
    }
    u32::try_from(parts.iter().sum::<u64>()).ok()
}

/// Latitude or longitude, keeping sign and decimal point
pub fn parse_coordinate(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Splits comma-separated amenity text into trimmed, non-empty items
fn split_list(text: Option<&str>) -> impl Iterator<Item = String> + '_ {
    text.into_iter()
        .flat_map(|t| t.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

/// Builds normalized records, filling gaps from office branding
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    branding: Branding,
}

impl Normalizer {
    pub fn new(branding: Branding) -> Self {
        Self { branding }
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    /// Office contact used when a record lists no agents
    pub fn fallback_agent(&self) -> PropertyAgent {
        PropertyAgent {
            name: self.branding.office_name.clone(),
            phone: self.branding.office_phone.clone(),
            email: None,
            position: Some("Sales Team".to_string()),
        }
    }

    /// Maps raw contacts to agents; never returns an empty list
    pub fn agents(&self, individuals: &[RawIndividual]) -> Vec<PropertyAgent> {
        let agents: Vec<PropertyAgent> = individuals.iter().map(|i| self.agent(i)).collect();
        if agents.is_empty() {
            vec![self.fallback_agent()]
        } else {
            agents
        }
    }

    fn agent(&self, individual: &RawIndividual) -> PropertyAgent {
        let phone = individual
            .phones
            .first()
            .and_then(|phone| {
                let number = phone.phone_number.as_deref()?;
                Some(match phone.area_code.as_deref() {
                    Some(area) => format!("({}) {}", area, number),
                    None => number.to_string(),
                })
            })
            .unwrap_or_else(|| self.branding.office_phone.clone());

        let email = individual
            .emails
            .first()
            .and_then(|email| email.contact_id.as_ref())
            .map(|_| self.branding.agent_email.clone());

        PropertyAgent {
            name: individual
                .name
                .clone()
                .unwrap_or_else(|| self.branding.office_name.clone()),
            phone,
            email,
            position: individual.position.clone(),
        }
    }

    /// Normalizes every record of a results page
    pub fn listings(&self, raw: &[RawListing]) -> Vec<PropertyListing> {
        raw.iter().map(|r| self.listing(r)).collect()
    }

    /// Builds a summary listing
    pub fn listing(&self, raw: &RawListing) -> PropertyListing {
        let property = raw.property.as_ref();
        let building = raw.building();
        let land = raw.land();
        let address_text = raw.address().and_then(|a| a.address_text.as_deref());
        let raw_type = property.and_then(|p| p.kind.as_deref());
        let remarks = raw.public_remarks.as_deref();

        let ParsedLocation { city, location } = extract_location(address_text);
        let agents = self.agents(&raw.individual);
        let primary = agents[0].clone();

        let amenities = building.and_then(|b| b.amenities.as_deref());
        let features = extract_features(remarks.into_iter().chain(amenities));

        let price = format_price(property.and_then(|p| p.price.as_deref()));
        let price_value = listing_price_value(property, &price);

        let sqft = building
            .and_then(|b| b.floor_area_measurements.first())
            .and_then(|area| area.area_unformatted.clone())
            .or_else(|| land.and_then(|l| l.size_total.clone()))
            .unwrap_or_else(|| UNKNOWN_SIZE.to_string());

        let image = property
            .and_then(|p| p.photo.first())
            .and_then(|photo| photo.best_url())
            .map(str::to_string)
            .unwrap_or_else(|| self.branding.fallback_image.clone());

        PropertyListing {
            id: raw.id.clone().unwrap_or_default(),
            mls_number: raw.mls_number.clone().unwrap_or_default(),
            title: generate_title(address_text, raw_type, &self.branding.region),
            price,
            price_value,
            location,
            city,
            province: self.branding.province.clone(),
            bedrooms: building.and_then(|b| b.bedrooms.as_deref()).and_then(parse_count),
            bathrooms: building
                .and_then(|b| b.bathroom_total.as_deref())
                .and_then(parse_count),
            sqft,
            category: classify_category(remarks.unwrap_or("")).label().to_string(),
            description: remarks
                .map(str::to_string)
                .unwrap_or_else(|| self.branding.default_description.clone()),
            features,
            image,
            agent_name: primary.name,
            agent_phone: primary.phone,
            agent_email: primary.email,
            agents,
            latitude: raw
                .address()
                .and_then(|a| a.latitude.as_deref())
                .and_then(parse_coordinate),
            longitude: raw
                .address()
                .and_then(|a| a.longitude.as_deref())
                .and_then(parse_coordinate),
            building_type: building_type_label(raw_type).to_string(),
            parking_spaces: property
                .and_then(|p| p.parking_space_total.as_deref())
                .and_then(parse_count),
            land_size: land.and_then(|l| l.size_total.clone()),
            time_on_market: raw.time_on_realtor.clone(),
        }
    }

    /// Builds a full detail record
    pub fn details(&self, raw: &RawListing) -> PropertyDetails {
        let empty_property = RawProperty::default();
        let empty_building = RawBuilding::default();
        let empty_land = RawLand::default();
        let property = raw.property.as_ref().unwrap_or(&empty_property);
        let building = raw.building().unwrap_or(&empty_building);
        let land = raw.land().unwrap_or(&empty_land);
        let address = property.address.clone().unwrap_or_default();

        let price = format_price(property.price.as_deref());
        let price_value = if price == CONTACT_FOR_PRICE {
            None
        } else {
            property
                .price
                .as_deref()
                .and_then(parse_whole_number)
                .filter(|v| *v > 0)
        };
        let sqft_value = building.size_interior.as_deref().and_then(parse_whole_number);
        let price_per_sqft = match (price_value, sqft_value) {
            (Some(price), Some(sqft)) if sqft > 0 => {
                Some(format!("${}/sqft", (price as f64 / sqft as f64).round() as u64))
            }
            _ => None,
        };

        let images = property
            .photo
            .iter()
            .filter_map(|photo| {
                photo.best_url().map(|url| PropertyImage {
                    url: url.to_string(),
                    description: photo.description.clone(),
                })
            })
            .collect();

        let rooms = building
            .rooms
            .iter()
            .map(|room| Room {
                kind: room.kind.clone().unwrap_or_else(|| "Room".to_string()),
                level: room.level.clone(),
                dimensions: room.dimension.clone(),
                description: room.description.clone(),
            })
            .collect();

        let street = format!(
            "{} {}",
            address.street_number.as_deref().unwrap_or(""),
            address.street_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string();

        PropertyDetails {
            id: raw.id.clone().unwrap_or_default(),
            mls_number: raw.mls_number.clone().unwrap_or_default(),
            title: format!(
                "{} in {}",
                building.kind.as_deref().unwrap_or("Property"),
                address
                    .city
                    .as_deref()
                    .unwrap_or(&self.branding.region_short)
            ),
            price: price.clone(),
            price_value,
            description: raw
                .public_remarks
                .clone()
                .unwrap_or_else(|| self.branding.default_description.clone()),
            address: Address {
                street,
                city: address.city.clone().unwrap_or_default(),
                province: address
                    .province
                    .clone()
                    .unwrap_or_else(|| self.branding.province.clone()),
                postal_code: address.postal_code.clone().unwrap_or_default(),
                latitude: address.latitude.as_deref().and_then(parse_coordinate),
                longitude: address.longitude.as_deref().and_then(parse_coordinate),
            },
            property: PropertyFacts {
                kind: building
                    .kind
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BUILDING_TYPE.to_string()),
                sub_type: building.style.clone(),
                bedrooms: building.bedrooms.as_deref().and_then(parse_count),
                bathrooms: building.bathroom_total.as_deref().and_then(parse_count),
                half_baths: building.bathroom_half.as_deref().and_then(parse_count),
                sqft: building.size_interior.clone(),
                lot_size: land.size_total.clone(),
                year_built: building.year_built.as_deref().and_then(parse_count),
                stories: building.stories_total.as_deref().and_then(parse_count),
                parking: property
                    .parking_space_total
                    .as_ref()
                    .map(|spaces| format!("{} spaces", spaces)),
                basement: building.basement_type.clone(),
                heating: building.heating_type.clone(),
                cooling: building.cooling_type.clone(),
                exterior: building.exterior_finish.clone(),
                roof: building.roof_material.clone(),
            },
            features: detail_features(raw.public_remarks.as_deref(), property, building, land),
            images,
            agents: self.agents(&raw.individual),
            financials: Financials {
                list_price: price,
                taxes: property.tax_annual_amount.clone(),
                fees: property.maintenance_fee_amount.clone(),
                price_per_sqft,
            },
            dates: ListingDates {
                listed: property.listing_contract_date.clone(),
                updated: raw.last_updated.clone(),
                time_on_market: raw.time_on_realtor.clone(),
            },
            rooms,
            utilities: Utilities {
                water: property.water_type.clone(),
                sewer: property.sewer_type.clone(),
                electricity: property.hydro.clone(),
                gas: property.gas.clone(),
                internet: property.internet.clone(),
            },
            additional: AdditionalInfo {
                zoning: land.zoning.clone(),
                possession: property.possession_date.clone(),
                restrictions: property.restrictions.clone(),
                inclusions: property.inclusions.clone(),
                exclusions: property.exclusions.clone(),
            },
        }
    }
}

/// Numeric price for a summary listing
///
/// Prefers the unformatted value and falls back to digits in the display
/// price. "Contact for Price" listings and zero prices have none.
fn listing_price_value(property: Option<&RawProperty>, display_price: &str) -> Option<u64> {
    if display_price == CONTACT_FOR_PRICE {
        return None;
    }
    let property = property?;
    property
        .price_unformatted_value
        .as_deref()
        .and_then(parse_whole_number)
        .or_else(|| property.price.as_deref().and_then(parse_whole_number))
        .filter(|v| *v > 0)
}

/// Features for a detail record: structured amenity lists, labelled
/// single-value fields, then the description vocabulary
fn detail_features(
    remarks: Option<&str>,
    property: &RawProperty,
    building: &RawBuilding,
    land: &RawLand,
) -> Vec<String> {
    let mut features = Vec::new();

    let lists = [
        building.amenities.as_deref(),
        building.appliances.as_deref(),
        building.kitchen_features.as_deref(),
        building.interior_features.as_deref(),
    ];
    for item in lists.into_iter().flat_map(split_list) {
        push_unique(&mut features, item);
    }

    let labelled = [
        ("Architecture", building.architectural_style.as_deref()),
        ("Flooring", building.flooring_type.as_deref()),
        ("Windows", building.window_features.as_deref()),
    ];
    for (label, value) in labelled {
        if let Some(value) = value {
            push_unique(&mut features, format!("{}: {}", label, value));
        }
    }

    for item in split_list(property.accessibility_features.as_deref()) {
        push_unique(&mut features, item);
    }
    if let Some(pool) = property.pool_features.as_deref() {
        push_unique(&mut features, format!("Pool: {}", pool));
    }
    if let Some(fireplace) = property.fireplace_features.as_deref() {
        push_unique(&mut features, format!("Fireplace: {}", fireplace));
    }
    let land_lists = [
        property.security_features.as_deref(),
        land.amenities.as_deref(),
        land.landscape_features.as_deref(),
    ];
    for item in land_lists.into_iter().flat_map(split_list) {
        push_unique(&mut features, item);
    }

    for item in extract_features(remarks) {
        push_unique(&mut features, item);
    }

    features
}
