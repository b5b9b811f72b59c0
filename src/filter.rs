//! Listing filters
//!
//! Every criterion is optional and criteria combine with AND. Sentinel labels
//! such as "All Types" turn a criterion off. Filters never reorder listings.

use crate::data::PropertyListing;

pub const ALL_TYPES: &str = "All Types";
pub const ALL_LOCATIONS: &str = "All Locations";
pub const ALL_PRICES: &str = "All Prices";
pub const ALL_AGENTS: &str = "All Agents";
pub const ANY_BEDROOMS: &str = "Any Bedrooms";
pub const ANY_BATHROOMS: &str = "Any Bathrooms";
pub const ANY_SIZE: &str = "Any Size";

/// Type options offered by the listings view
pub const PROPERTY_TYPES: &[&str] = &[
    ALL_TYPES,
    "Waterfront",
    "Farm",
    "Residential",
    "Vacant Land",
    "Townhouse",
    "Condo",
];

const MILLION: u64 = 1_000_000;

/// Asking-price brackets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    Under500K,
    From500KTo750K,
    From750KTo1M,
    Over1M,
    Over1500K,
}

impl PriceRange {
    pub fn all() -> &'static [PriceRange] {
        &[
            PriceRange::Under500K,
            PriceRange::From500KTo750K,
            PriceRange::From750KTo1M,
            PriceRange::Over1M,
            PriceRange::Over1500K,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::Under500K => "Under $500K",
            PriceRange::From500KTo750K => "$500K - $750K",
            PriceRange::From750KTo1M => "$750K - $1M",
            PriceRange::Over1M => "Over $1M",
            PriceRange::Over1500K => "Over $1.5M",
        }
    }

    /// Parses a bracket label; `None` for sentinels and unknown labels
    pub fn from_label(label: &str) -> Option<PriceRange> {
        Self::all().iter().copied().find(|r| r.label() == label.trim())
    }

    /// Whether `price` falls in the bracket
    ///
    /// With `tiered` set, "Over $1M" stops at $1.5M so it does not overlap
    /// "Over $1.5M".
    pub fn contains(&self, price: u64, tiered: bool) -> bool {
        match self {
            PriceRange::Under500K => price < 500_000,
            PriceRange::From500KTo750K => (500_000..=750_000).contains(&price),
            PriceRange::From750KTo1M => price > 750_000 && price <= MILLION,
            PriceRange::Over1M if tiered => price > MILLION && price <= 1_500_000,
            PriceRange::Over1M => price > MILLION,
            PriceRange::Over1500K => price > 1_500_000,
        }
    }
}

/// Bedroom or bathroom requirement: `N` exactly or `N+` at least
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCount {
    Exactly(u32),
    AtLeast(u32),
}

impl RoomCount {
    /// Options from 1 up to `max`, each as exact and at-least
    pub fn all(max: u32) -> Vec<RoomCount> {
        (1..=max)
            .flat_map(|n| [RoomCount::Exactly(n), RoomCount::AtLeast(n)])
            .collect()
    }

    pub fn label(&self) -> String {
        match self {
            RoomCount::Exactly(n) => n.to_string(),
            RoomCount::AtLeast(n) => format!("{}+", n),
        }
    }

    pub fn from_label(label: &str) -> Option<RoomCount> {
        let label = label.trim();
        match label.strip_suffix('+') {
            Some(min) => min.trim().parse().ok().map(RoomCount::AtLeast),
            None => label.parse().ok().map(RoomCount::Exactly),
        }
    }

    pub fn matches(&self, count: u32) -> bool {
        match self {
            RoomCount::Exactly(n) => count == *n,
            RoomCount::AtLeast(n) => count >= *n,
        }
    }
}

/// Interior size buckets in square feet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRange {
    Under1000,
    From1000To1500,
    From1500To2000,
    From2000To2500,
    From2500To3000,
    Over3000,
}

impl SizeRange {
    pub fn all() -> &'static [SizeRange] {
        &[
            SizeRange::Under1000,
            SizeRange::From1000To1500,
            SizeRange::From1500To2000,
            SizeRange::From2000To2500,
            SizeRange::From2500To3000,
            SizeRange::Over3000,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeRange::Under1000 => "Under 1,000 sqft",
            SizeRange::From1000To1500 => "1,000-1,500 sqft",
            SizeRange::From1500To2000 => "1,500-2,000 sqft",
            SizeRange::From2000To2500 => "2,000-2,500 sqft",
            SizeRange::From2500To3000 => "2,500-3,000 sqft",
            SizeRange::Over3000 => "Over 3,000 sqft",
        }
    }

    pub fn from_label(label: &str) -> Option<SizeRange> {
        Self::all().iter().copied().find(|r| r.label() == label.trim())
    }

    pub fn contains(&self, sqft: u64) -> bool {
        match self {
            SizeRange::Under1000 => sqft < 1000,
            SizeRange::From1000To1500 => (1000..=1500).contains(&sqft),
            SizeRange::From1500To2000 => (1500..=2000).contains(&sqft),
            SizeRange::From2000To2500 => (2000..=2500).contains(&sqft),
            SizeRange::From2500To3000 => (2500..=3000).contains(&sqft),
            SizeRange::Over3000 => sqft > 3000,
        }
    }
}

/// First run of digits in a size string, ignoring thousands separators
///
/// `"1,850 sqft"` → 1850, `"N/A"` → `None`.
pub fn leading_sqft(size: &str) -> Option<u64> {
    let cleaned = size.replace(',', "");
    let digits: String = cleaned
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Criteria of the basic filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Matched against title, location, city, description and features
    pub search_term: Option<String>,
    /// Exact category, or [`ALL_TYPES`]
    pub category: Option<String>,
    /// Substring of city or location, or [`ALL_LOCATIONS`]
    pub location: Option<String>,
    /// A [`PriceRange`] label, or [`ALL_PRICES`]
    pub price_range: Option<String>,
}

/// Criteria of the full listings view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedCriteria {
    pub base: FilterCriteria,
    /// Comma-separated; any one keyword matching is enough
    pub keywords: Option<String>,
    /// Exact agent name, or [`ALL_AGENTS`]
    pub agent: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    /// A [`SizeRange`] label, or [`ANY_SIZE`]
    pub sqft: Option<String>,
}

/// Returns the criterion value unless it is empty or the sentinel
fn active<'a>(value: &'a Option<String>, sentinel: &str) -> Option<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty() && *v != sentinel)
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn matches_search(listing: &PropertyListing, term: &str, include_agent: bool) -> bool {
    let term = term.to_lowercase();
    contains_ci(&listing.title, &term)
        || contains_ci(&listing.location, &term)
        || contains_ci(&listing.city, &term)
        || contains_ci(&listing.description, &term)
        || listing.features.iter().any(|f| contains_ci(f, &term))
        || (include_agent
            && (contains_ci(&listing.agent_name, &term) || contains_ci(&listing.mls_number, &term)))
}

fn matches_location(listing: &PropertyListing, location: &str) -> bool {
    let location = location.to_lowercase();
    contains_ci(&listing.city, &location) || contains_ci(&listing.location, &location)
}

/// Listings without a numeric price pass every bracket
fn matches_price(listing: &PropertyListing, range: PriceRange, tiered: bool) -> bool {
    listing
        .numeric_price()
        .map_or(true, |price| range.contains(price, tiered))
}

fn matches_base(listing: &PropertyListing, criteria: &FilterCriteria, advanced: bool) -> bool {
    if let Some(term) = criteria.search_term.as_deref().filter(|t| !t.is_empty()) {
        if !matches_search(listing, term, advanced) {
            return false;
        }
    }
    if let Some(category) = active(&criteria.category, ALL_TYPES) {
        if listing.category != category {
            return false;
        }
    }
    if let Some(location) = active(&criteria.location, ALL_LOCATIONS) {
        if !matches_location(listing, location) {
            return false;
        }
    }
    if let Some(range) = active(&criteria.price_range, ALL_PRICES).and_then(PriceRange::from_label)
    {
        if !matches_price(listing, range, advanced) {
            return false;
        }
    }
    true
}

/// Applies the basic filter
pub fn filter_listings(listings: &[PropertyListing], criteria: &FilterCriteria) -> Vec<PropertyListing> {
    listings
        .iter()
        .filter(|listing| matches_base(listing, criteria, false))
        .cloned()
        .collect()
}

fn keyword_list(keywords: &str) -> Vec<String> {
    keywords
        .to_lowercase()
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn matches_keywords(listing: &PropertyListing, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| {
        contains_ci(&listing.description, keyword)
            || listing.features.iter().any(|f| contains_ci(f, keyword))
            || contains_ci(&listing.title, keyword)
    })
}

/// Listings without a count never match
fn matches_rooms(count: Option<u32>, requirement: RoomCount) -> bool {
    count.map_or(false, |count| requirement.matches(count))
}

fn matches_size(listing: &PropertyListing, range: SizeRange) -> bool {
    leading_sqft(&listing.sqft).map_or(false, |sqft| range.contains(sqft))
}

/// Applies the full listings-view filter
pub fn filter_listings_advanced(
    listings: &[PropertyListing],
    criteria: &AdvancedCriteria,
) -> Vec<PropertyListing> {
    let keywords = criteria
        .keywords
        .as_deref()
        .map(keyword_list)
        .unwrap_or_default();
    let agent = active(&criteria.agent, ALL_AGENTS);
    let bedrooms = active(&criteria.bedrooms, ANY_BEDROOMS).and_then(RoomCount::from_label);
    let bathrooms = active(&criteria.bathrooms, ANY_BATHROOMS).and_then(RoomCount::from_label);
    let size = active(&criteria.sqft, ANY_SIZE).and_then(SizeRange::from_label);

    listings
        .iter()
        .filter(|listing| {
            matches_base(listing, &criteria.base, true)
                && (keywords.is_empty() || matches_keywords(listing, &keywords))
                && agent.map_or(true, |agent| listing.agent_name == agent)
                && bedrooms.map_or(true, |req| matches_rooms(listing.bedrooms, req))
                && bathrooms.map_or(true, |req| matches_rooms(listing.bathrooms, req))
                && size.map_or(true, |range| matches_size(listing, range))
        })
        .cloned()
        .collect()
}

/// "All Agents" followed by each primary agent name in first-seen order
pub fn available_agents(listings: &[PropertyListing]) -> Vec<String> {
    let mut agents = vec![ALL_AGENTS.to_string()];
    for listing in listings {
        if !listing.agent_name.is_empty() && !agents.contains(&listing.agent_name) {
            agents.push(listing.agent_name.clone());
        }
    }
    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::sample_listings;
    use crate::data::CONTACT_FOR_PRICE;

    fn listing(id: &str, price: Option<u64>, category: &str) -> PropertyListing {
        let mut listing = sample_listings().remove(0);
        listing.id = id.to_string();
        listing.price_value = price;
        listing.price = match price {
            Some(p) => format!("${}", p),
            None => CONTACT_FOR_PRICE.to_string(),
        };
        listing.category = category.to_string();
        listing
    }

    fn fixture() -> Vec<PropertyListing> {
        vec![
            listing("1", Some(750_000), "Waterfront"),
            listing("2", Some(450_000), "Farm"),
            listing("3", Some(350_000), "Condo"),
            listing("4", None, "Residential"),
        ]
    }

    fn ids(listings: &[PropertyListing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    fn price(label: &str) -> FilterCriteria {
        FilterCriteria {
            price_range: Some(label.to_string()),
            ..FilterCriteria::default()
        }
    }

    #[test]
    fn test_price_brackets_include_contact_for_price() {
        let listings = fixture();
        assert_eq!(ids(&filter_listings(&listings, &price("Under $500K"))), vec!["2", "3", "4"]);
        assert_eq!(ids(&filter_listings(&listings, &price("$500K - $750K"))), vec!["1", "4"]);
        assert_eq!(ids(&filter_listings(&listings, &price("Over $1M"))), vec!["4"]);
    }

    #[test]
    fn test_type_and_price_combine() {
        let criteria = FilterCriteria {
            category: Some("Waterfront".to_string()),
            price_range: Some("$500K - $750K".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_listings(&fixture(), &criteria)), vec!["1"]);
    }

    #[test]
    fn test_sentinels_return_input_unchanged() {
        let listings = fixture();
        let criteria = FilterCriteria {
            search_term: Some(String::new()),
            category: Some(ALL_TYPES.to_string()),
            location: Some(ALL_LOCATIONS.to_string()),
            price_range: Some(ALL_PRICES.to_string()),
        };
        assert_eq!(filter_listings(&listings, &criteria), listings);
        assert_eq!(filter_listings(&listings, &FilterCriteria::default()), listings);
    }

    #[test]
    fn test_unknown_price_label_bypasses() {
        let listings = fixture();
        assert_eq!(filter_listings(&listings, &price("Cheap")), listings);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let listings = sample_listings();
        let criteria = FilterCriteria {
            search_term: Some("lake".to_string()),
            price_range: Some("$750K - $1M".to_string()),
            ..FilterCriteria::default()
        };
        let once = filter_listings(&listings, &criteria);
        let twice = filter_listings(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_search_term_fields() {
        let listings = sample_listings();
        let search = |term: &str| FilterCriteria {
            search_term: Some(term.to_string()),
            ..FilterCriteria::default()
        };

        assert_eq!(ids(&filter_listings(&listings, &search("BIG RIDEAU"))), vec!["1"]);
        assert_eq!(ids(&filter_listings(&listings, &search("workshop"))), vec!["2"]);
        assert_eq!(ids(&filter_listings(&listings, &search("elgin"))), vec!["3"]);
        // Agent and MLS number only count in the advanced filter
        assert!(filter_listings(&listings, &search("FALLBACK004")).is_empty());
    }

    #[test]
    fn test_location_substring() {
        let criteria = FilterCriteria {
            location: Some("west".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_listings(&sample_listings(), &criteria)), vec!["2"]);
    }

    #[test]
    fn test_price_range_boundaries() {
        use PriceRange::*;
        assert!(Under500K.contains(499_999, false));
        assert!(!Under500K.contains(500_000, false));
        assert!(From500KTo750K.contains(500_000, false));
        assert!(From500KTo750K.contains(750_000, false));
        assert!(!From750KTo1M.contains(750_000, false));
        assert!(From750KTo1M.contains(1_000_000, false));
        assert!(!Over1M.contains(1_000_000, false));
        assert!(Over1M.contains(2_000_000, false));
        assert!(Over1M.contains(1_500_000, true));
        assert!(!Over1M.contains(1_500_001, true));
        assert!(Over1500K.contains(1_500_001, true));
    }

    #[test]
    fn test_labels_round_trip() {
        for range in PriceRange::all() {
            assert_eq!(PriceRange::from_label(range.label()), Some(*range));
        }
        for range in SizeRange::all() {
            assert_eq!(SizeRange::from_label(range.label()), Some(*range));
        }
        for count in RoomCount::all(5) {
            assert_eq!(RoomCount::from_label(&count.label()), Some(count));
        }
        assert_eq!(PriceRange::from_label(ALL_PRICES), None);
        assert_eq!(RoomCount::from_label(ANY_BEDROOMS), None);
        assert_eq!(RoomCount::all(4).len(), 8);
    }

    #[test]
    fn test_leading_sqft() {
        assert_eq!(leading_sqft("1,850 sqft"), Some(1850));
        assert_eq!(leading_sqft("approx. 2400 sq ft"), Some(2400));
        assert_eq!(leading_sqft("N/A"), None);
        assert_eq!(leading_sqft(""), None);
    }

    #[test]
    fn test_advanced_search_matches_agent_and_mls() {
        let criteria = AdvancedCriteria {
            base: FilterCriteria {
                search_term: Some("fallback004".to_string()),
                ..FilterCriteria::default()
            },
            ..AdvancedCriteria::default()
        };
        assert_eq!(ids(&filter_listings_advanced(&sample_listings(), &criteria)), vec!["4"]);
    }

    #[test]
    fn test_advanced_keywords_or_match() {
        let criteria = AdvancedCriteria {
            keywords: Some(" barn , , dock ".to_string()),
            ..AdvancedCriteria::default()
        };
        assert_eq!(
            ids(&filter_listings_advanced(&sample_listings(), &criteria)),
            vec!["1", "2"]
        );
    }

    #[test]
    fn test_advanced_tiered_price() {
        let criteria = AdvancedCriteria {
            base: price("Over $1M"),
            ..AdvancedCriteria::default()
        };
        let mut listings = sample_listings();
        listings.push(listing("5", Some(2_000_000), "Waterfront"));

        // Sample 2 is $1.25M; the Contact for Price lot passes every bracket
        assert_eq!(ids(&filter_listings_advanced(&listings, &criteria)), vec!["2", "4"]);

        let over = AdvancedCriteria {
            base: price("Over $1.5M"),
            ..AdvancedCriteria::default()
        };
        assert_eq!(ids(&filter_listings_advanced(&listings, &over)), vec!["4", "5"]);
    }

    #[test]
    fn test_advanced_rooms_exclude_unknown_counts() {
        let listings = sample_listings();
        let exact = AdvancedCriteria {
            bedrooms: Some("3".to_string()),
            ..AdvancedCriteria::default()
        };
        assert_eq!(ids(&filter_listings_advanced(&listings, &exact)), vec!["1"]);

        let at_least = AdvancedCriteria {
            bedrooms: Some("2+".to_string()),
            bathrooms: Some("2+".to_string()),
            ..AdvancedCriteria::default()
        };
        assert_eq!(ids(&filter_listings_advanced(&listings, &at_least)), vec!["1", "2"]);

        let any = AdvancedCriteria {
            bedrooms: Some(ANY_BEDROOMS.to_string()),
            ..AdvancedCriteria::default()
        };
        assert_eq!(filter_listings_advanced(&listings, &any).len(), listings.len());
    }

    #[test]
    fn test_advanced_size_buckets() {
        let listings = sample_listings();
        let size = |label: &str| AdvancedCriteria {
            sqft: Some(label.to_string()),
            ..AdvancedCriteria::default()
        };
        assert_eq!(ids(&filter_listings_advanced(&listings, &size("Under 1,000 sqft"))), vec!["3"]);
        assert_eq!(ids(&filter_listings_advanced(&listings, &size("1,500-2,000 sqft"))), vec!["1"]);
        assert_eq!(ids(&filter_listings_advanced(&listings, &size("2,000-2,500 sqft"))), vec!["2"]);
        assert!(filter_listings_advanced(&listings, &size("Over 3,000 sqft")).is_empty());
    }

    #[test]
    fn test_advanced_agent_filter() {
        let mut listings = sample_listings();
        listings[1].agent_name = "Scott Burns".to_string();

        let criteria = AdvancedCriteria {
            agent: Some("Scott Burns".to_string()),
            ..AdvancedCriteria::default()
        };
        assert_eq!(ids(&filter_listings_advanced(&listings, &criteria)), vec!["2"]);

        let all = AdvancedCriteria {
            agent: Some(ALL_AGENTS.to_string()),
            ..AdvancedCriteria::default()
        };
        assert_eq!(filter_listings_advanced(&listings, &all).len(), listings.len());
    }

    #[test]
    fn test_available_agents_first_seen_order() {
        let mut listings = sample_listings();
        listings[1].agent_name = "Scott Burns".to_string();
        listings[3].agent_name = "Zach Shea".to_string();

        assert_eq!(
            available_agents(&listings),
            vec!["All Agents", "Rideau Realty Team", "Scott Burns", "Zach Shea"]
        );
    }
}
