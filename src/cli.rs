//! Command-line interface parsing for the Rideau listings CLI
//!
//! Filter labels are validated while parsing, so an unknown bracket is a
//! usage error that lists the accepted values.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::filter::{
    AdvancedCriteria, FilterCriteria, PriceRange, RoomCount, SizeRange, ALL_PRICES, ANY_BATHROOMS,
    ANY_BEDROOMS, ANY_SIZE, PROPERTY_TYPES,
};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid property type '{label}'. Valid values: {expected}")]
    InvalidPropertyType { label: String, expected: String },

    #[error("Invalid price range '{label}'. Valid values: {expected}")]
    InvalidPriceRange { label: String, expected: String },

    #[error("Invalid room count '{label}'. Use N or N+, e.g. 3 or 2+")]
    InvalidRoomCount { label: String },

    #[error("Invalid size range '{label}'. Valid values: {expected}")]
    InvalidSizeRange { label: String, expected: String },
}

/// Rideau Lakes property listings
#[derive(Parser, Debug)]
#[command(name = "rideau")]
#[command(about = "Browse Rideau Lakes property listings")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory for cached API responses
    #[arg(long, value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List and filter current listings
    Listings(ListingsArgs),

    /// Show this hour's featured listing
    Featured {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the full record of one property
    Details {
        /// Property id
        id: String,
        /// MLS reference number
        mls: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Inspect or clear the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CacheAction {
    /// Show timestamps of an entry
    Info { key: String },
    /// Delete one entry
    Remove { key: String },
    /// Delete every entry this tool wrote
    Clear,
}

#[derive(Args, Debug, Default)]
pub struct ListingsArgs {
    /// Free-text search over title, location, description, features, agent and MLS number
    #[arg(long)]
    pub search: Option<String>,

    /// Category such as Waterfront, Farm, Residential or "Vacant Land"
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_type_label)]
    pub category: Option<String>,

    /// Town or area, matched as a substring
    #[arg(long)]
    pub location: Option<String>,

    /// Price bracket, e.g. "Under $500K" or "Over $1.5M"
    #[arg(long, value_parser = parse_price_label)]
    pub price: Option<String>,

    /// Comma-separated keywords; any one may match
    #[arg(long)]
    pub keywords: Option<String>,

    /// Exact agent name
    #[arg(long)]
    pub agent: Option<String>,

    /// Bedrooms: N exactly or N+ at least
    #[arg(long, value_parser = parse_room_label)]
    pub bedrooms: Option<String>,

    /// Bathrooms: N exactly or N+ at least
    #[arg(long, value_parser = parse_room_label)]
    pub bathrooms: Option<String>,

    /// Size bucket, e.g. "1,500-2,000 sqft"
    #[arg(long, value_parser = parse_size_label)]
    pub sqft: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ListingsArgs {
    /// Filter criteria for these arguments
    pub fn criteria(&self) -> AdvancedCriteria {
        AdvancedCriteria {
            base: FilterCriteria {
                search_term: self.search.clone(),
                category: self.category.clone(),
                location: self.location.clone(),
                price_range: self.price.clone(),
            },
            keywords: self.keywords.clone(),
            agent: self.agent.clone(),
            bedrooms: self.bedrooms.clone(),
            bathrooms: self.bathrooms.clone(),
            sqft: self.sqft.clone(),
        }
    }
}

fn choices<'a>(sentinel: &'a str, labels: impl Iterator<Item = &'a str>) -> String {
    std::iter::once(sentinel)
        .chain(labels)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accepts one of [`PROPERTY_TYPES`]
pub fn parse_type_label(s: &str) -> Result<String, CliError> {
    let label = s.trim();
    if PROPERTY_TYPES.contains(&label) {
        return Ok(label.to_string());
    }
    Err(CliError::InvalidPropertyType {
        label: s.to_string(),
        expected: PROPERTY_TYPES.join(", "),
    })
}

/// Accepts "All Prices" or a [`PriceRange`] label
pub fn parse_price_label(s: &str) -> Result<String, CliError> {
    if s == ALL_PRICES || PriceRange::from_label(s).is_some() {
        return Ok(s.trim().to_string());
    }
    Err(CliError::InvalidPriceRange {
        label: s.to_string(),
        expected: choices(ALL_PRICES, PriceRange::all().iter().map(|r| r.label())),
    })
}

/// Accepts `N`, `N+`, "Any Bedrooms" or "Any Bathrooms"
pub fn parse_room_label(s: &str) -> Result<String, CliError> {
    if s == ANY_BEDROOMS || s == ANY_BATHROOMS || RoomCount::from_label(s).is_some() {
        return Ok(s.trim().to_string());
    }
    Err(CliError::InvalidRoomCount {
        label: s.to_string(),
    })
}

/// Accepts "Any Size" or a [`SizeRange`] label
pub fn parse_size_label(s: &str) -> Result<String, CliError> {
    if s == ANY_SIZE || SizeRange::from_label(s).is_some() {
        return Ok(s.trim().to_string());
    }
    Err(CliError::InvalidSizeRange {
        label: s.to_string(),
        expected: choices(ANY_SIZE, SizeRange::all().iter().map(|r| r.label())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_label_validation() {
        assert_eq!(parse_price_label("Over $1.5M").unwrap(), "Over $1.5M");
        assert_eq!(parse_price_label("All Prices").unwrap(), "All Prices");

        let err = parse_price_label("Cheap").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid price range 'Cheap'"));
        assert!(message.contains("Under $500K"));
        assert!(message.contains("All Prices"));
    }

    #[test]
    fn test_type_label_validation() {
        assert_eq!(parse_type_label("Waterfront").unwrap(), "Waterfront");
        assert_eq!(parse_type_label("Vacant Land").unwrap(), "Vacant Land");
        assert_eq!(parse_type_label("All Types").unwrap(), "All Types");

        let err = parse_type_label("Castle").unwrap_err();
        assert!(matches!(err, CliError::InvalidPropertyType { .. }));
        assert!(err.to_string().contains("Farm"));
    }

    #[test]
    fn test_room_label_validation() {
        assert_eq!(parse_room_label("3").unwrap(), "3");
        assert_eq!(parse_room_label("2+").unwrap(), "2+");
        assert_eq!(parse_room_label("Any Bedrooms").unwrap(), "Any Bedrooms");
        assert!(matches!(
            parse_room_label("three"),
            Err(CliError::InvalidRoomCount { .. })
        ));
    }

    #[test]
    fn test_size_label_validation() {
        assert!(parse_size_label("Over 3,000 sqft").is_ok());
        assert!(parse_size_label("Any Size").is_ok());
        let err = parse_size_label("huge").unwrap_err();
        assert!(err.to_string().contains("1,000-1,500 sqft"));
    }

    #[test]
    fn test_listings_args_to_criteria() {
        let cli = Cli::parse_from([
            "rideau",
            "listings",
            "--search",
            "lake",
            "--type",
            "Waterfront",
            "--price",
            "$500K - $750K",
            "--bedrooms",
            "3+",
            "--json",
        ]);
        let Command::Listings(args) = cli.command else {
            panic!("expected listings command");
        };
        assert!(args.json);

        let criteria = args.criteria();
        assert_eq!(criteria.base.search_term.as_deref(), Some("lake"));
        assert_eq!(criteria.base.category.as_deref(), Some("Waterfront"));
        assert_eq!(criteria.base.price_range.as_deref(), Some("$500K - $750K"));
        assert_eq!(criteria.bedrooms.as_deref(), Some("3+"));
        assert!(criteria.agent.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["rideau", "cache", "clear", "--cache-dir", "/tmp/x", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(
            cli.command,
            Command::Cache {
                action: CacheAction::Clear
            }
        ));
    }

    #[test]
    fn test_invalid_price_is_usage_error() {
        let result = Cli::try_parse_from(["rideau", "listings", "--price", "Cheap"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_details_positionals() {
        let cli = Cli::parse_from(["rideau", "details", "27123456", "X1234567"]);
        match cli.command {
            Command::Details { id, mls, json } => {
                assert_eq!(id, "27123456");
                assert_eq!(mls, "X1234567");
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
