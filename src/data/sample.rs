//! Bundled sample listings
//!
//! Shown when the API cannot be reached, so the listings view is never empty.

use super::{ListingPage, PropertyAgent, PropertyListing, CONTACT_FOR_PRICE};

const OFFICE_NAME: &str = "Rideau Realty Team";
const OFFICE_PHONE: &str = "(613) 272-5000";

fn office_agent() -> PropertyAgent {
    PropertyAgent {
        name: OFFICE_NAME.to_string(),
        phone: OFFICE_PHONE.to_string(),
        email: None,
        position: Some("Sales Team".to_string()),
    }
}

struct Sample {
    id: &'static str,
    title: &'static str,
    price: Option<u64>,
    city: &'static str,
    bedrooms: Option<u32>,
    bathrooms: Option<u32>,
    sqft: &'static str,
    category: &'static str,
    building_type: &'static str,
    description: &'static str,
    features: &'static [&'static str],
    image: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "1",
        title: "Waterfront Cottage on Big Rideau Lake",
        price: Some(875_000),
        city: "Portland",
        bedrooms: Some(3),
        bathrooms: Some(2),
        sqft: "1,850 sqft",
        category: "Waterfront",
        building_type: "House",
        description: "Beautiful waterfront cottage with panoramic lake views, private dock, and sandy beach.",
        features: &["Private Dock", "Sandy Beach", "Fireplace", "Deck"],
        image: "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80",
    },
    Sample {
        id: "2",
        title: "Century Farm near Westport",
        price: Some(1_250_000),
        city: "Westport",
        bedrooms: Some(4),
        bathrooms: Some(2),
        sqft: "2,400 sqft",
        category: "Farm",
        building_type: "Residential",
        description: "Working farm on 95 acres with a bank barn, workshop and renovated stone farmhouse.",
        features: &["Barn", "Workshop", "Updated"],
        image: "https://images.unsplash.com/photo-1500382017468-9049fed747ef?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80",
    },
    Sample {
        id: "3",
        title: "Village Home in Elgin",
        price: Some(449_000),
        city: "Elgin",
        bedrooms: Some(2),
        bathrooms: Some(1),
        sqft: "980 sqft",
        category: "Residential",
        building_type: "Residential",
        description: "Updated bungalow within walking distance of shops, with a detached garage.",
        features: &["Garage", "Updated"],
        image: "https://images.unsplash.com/photo-1568605114967-8130f3a36994?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80",
    },
    Sample {
        id: "4",
        title: "Building Lot in Delta",
        price: None,
        city: "Delta",
        bedrooms: None,
        bathrooms: None,
        sqft: "N/A",
        category: "Vacant Land",
        building_type: "Residential",
        description: "Vacant treed lot on a quiet road, ready for your new home.",
        features: &["Private"],
        image: "https://images.unsplash.com/photo-1500382017468-9049fed747ef?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80",
    },
];

fn format_dollars(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl Sample {
    fn to_listing(&self) -> PropertyListing {
        let agent = office_agent();
        PropertyListing {
            id: self.id.to_string(),
            mls_number: format!("FALLBACK{:03}", self.id.parse::<u32>().unwrap_or(0)),
            title: self.title.to_string(),
            price: self
                .price
                .map(format_dollars)
                .unwrap_or_else(|| CONTACT_FOR_PRICE.to_string()),
            price_value: self.price,
            location: format!("{}, ON", self.city),
            city: self.city.to_string(),
            province: "Ontario".to_string(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            sqft: self.sqft.to_string(),
            category: self.category.to_string(),
            description: self.description.to_string(),
            features: self.features.iter().map(|f| f.to_string()).collect(),
            image: self.image.to_string(),
            agent_name: agent.name.clone(),
            agent_phone: agent.phone.clone(),
            agent_email: None,
            agents: vec![agent],
            latitude: None,
            longitude: None,
            building_type: self.building_type.to_string(),
            parking_spaces: None,
            land_size: None,
            time_on_market: None,
        }
    }
}

/// Sample listings in display order
pub fn sample_listings() -> Vec<PropertyListing> {
    SAMPLES.iter().map(Sample::to_listing).collect()
}

/// Sample listings as a page
pub fn sample_page() -> ListingPage {
    let listings = sample_listings();
    let total_records = listings.len() as u64;
    ListingPage {
        listings,
        total_records,
    }
}
