//! Raw payload types for the listings API
//!
//! The API is loose about types: counts arrive as strings, prices as numbers
//! or strings, and whole objects are sometimes missing. Every field here is
//! optional and goes through a lenient deserializer, so a surprising value
//! turns into an absent field instead of a failed record.

use serde::Deserialize;

/// Embedded status block returned alongside results
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ApiErrorCode {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub description: Option<String>,
}

impl ApiErrorCode {
    /// The API reports success as code 200
    pub fn is_success(&self) -> bool {
        self.id.map_or(true, |id| id == 200)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Paging {
    #[serde(deserialize_with = "lenient::integer")]
    pub total_records: Option<i64>,
}

/// Response of the listings collection endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListingsResponse {
    #[serde(deserialize_with = "lenient::value")]
    pub error_code: Option<ApiErrorCode>,
    #[serde(deserialize_with = "lenient::value")]
    pub paging: Option<Paging>,
    #[serde(deserialize_with = "lenient::list")]
    pub results: Vec<RawListing>,
}

/// One property as returned by either endpoint
///
/// The detail endpoint nests `Building` and `Land` under `Property`; the
/// collection endpoint puts them at the top level. Both placements are read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawListing {
    #[serde(deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub mls_number: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub public_remarks: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub building: Option<RawBuilding>,
    #[serde(deserialize_with = "lenient::list")]
    pub individual: Vec<RawIndividual>,
    #[serde(deserialize_with = "lenient::value")]
    pub property: Option<RawProperty>,
    #[serde(deserialize_with = "lenient::value")]
    pub land: Option<RawLand>,
    #[serde(deserialize_with = "lenient::string")]
    pub time_on_realtor: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub last_updated: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub error_code: Option<ApiErrorCode>,
}

impl RawListing {
    /// Building block, preferring the top-level placement
    pub fn building(&self) -> Option<&RawBuilding> {
        self.building
            .as_ref()
            .or_else(|| self.property.as_ref().and_then(|p| p.building.as_ref()))
    }

    /// Land block, preferring the top-level placement
    pub fn land(&self) -> Option<&RawLand> {
        self.land
            .as_ref()
            .or_else(|| self.property.as_ref().and_then(|p| p.land.as_ref()))
    }

    /// Address block of the property
    pub fn address(&self) -> Option<&RawAddress> {
        self.property.as_ref().and_then(|p| p.address.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawBuilding {
    #[serde(deserialize_with = "lenient::string")]
    pub bathroom_total: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub bathroom_half: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub bedrooms: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub size_interior: Option<String>,
    #[serde(rename = "Type", deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub style: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub stories_total: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub year_built: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub floor_area_measurements: Vec<RawFloorArea>,
    #[serde(deserialize_with = "lenient::string")]
    pub basement_type: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub heating_type: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub cooling_type: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub exterior_finish: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub roof_material: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub rooms: Vec<RawRoom>,
    #[serde(deserialize_with = "lenient::string")]
    pub amenities: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub appliances: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub kitchen_features: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub interior_features: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub architectural_style: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub flooring_type: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub window_features: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawFloorArea {
    #[serde(deserialize_with = "lenient::string")]
    pub area_unformatted: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawRoom {
    #[serde(rename = "Type", deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub level: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub dimension: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawIndividual {
    #[serde(deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub position: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub phones: Vec<RawPhone>,
    #[serde(deserialize_with = "lenient::list")]
    pub emails: Vec<RawEmail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawPhone {
    #[serde(deserialize_with = "lenient::string")]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub area_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawEmail {
    #[serde(deserialize_with = "lenient::string")]
    pub contact_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawProperty {
    #[serde(deserialize_with = "lenient::string")]
    pub price: Option<String>,
    #[serde(rename = "Type", deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub price_unformatted_value: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub address: Option<RawAddress>,
    #[serde(deserialize_with = "lenient::list")]
    pub photo: Vec<RawPhoto>,
    #[serde(deserialize_with = "lenient::string")]
    pub parking_space_total: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub building: Option<RawBuilding>,
    #[serde(deserialize_with = "lenient::value")]
    pub land: Option<RawLand>,
    #[serde(deserialize_with = "lenient::string")]
    pub tax_annual_amount: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub maintenance_fee_amount: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub listing_contract_date: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub water_type: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub sewer_type: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub hydro: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub gas: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub internet: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub possession_date: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub restrictions: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub inclusions: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub exclusions: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub accessibility_features: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub pool_features: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub fireplace_features: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub security_features: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawAddress {
    #[serde(deserialize_with = "lenient::string")]
    pub address_text: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub longitude: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub latitude: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub street_number: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub street_name: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub province: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawPhoto {
    #[serde(deserialize_with = "lenient::string")]
    pub low_res_path: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub med_res_path: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub high_res_path: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub description: Option<String>,
}

impl RawPhoto {
    /// Best available resolution
    pub fn best_url(&self) -> Option<&str> {
        self.high_res_path
            .as_deref()
            .or(self.med_res_path.as_deref())
            .or(self.low_res_path.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RawLand {
    #[serde(deserialize_with = "lenient::string")]
    pub size_total: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub zoning: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub amenities: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub landscape_features: Option<String>,
}

/// Deserializers that coerce instead of failing
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings pass through; numbers and booleans become their text.
    /// Empty strings, nulls, arrays and objects become `None`.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Integers, or strings holding an integer
    pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Any nested structure; a value of the wrong shape becomes `None`
    pub fn value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }

    /// Arrays of structures; malformed elements are dropped, non-arrays are empty
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
