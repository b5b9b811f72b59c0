//! Rideau listings CLI - browse Rideau Lakes property listings
//!
//! Loads listings through the cached service, applies filters and prints the
//! results as text or JSON.

use clap::Parser;

use rideau_listings::cache::FileStorage;
use rideau_listings::cli::{CacheAction, Cli, Command, ListingsArgs};
use rideau_listings::config::Config;
use rideau_listings::data::{PropertyDetails, PropertyListing};
use rideau_listings::filter::filter_listings_advanced;
use rideau_listings::service::{ListingService, ListingSource};

type Service = ListingService<FileStorage>;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_config(cli: &Cli) -> Config {
    let config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };
    config.with_env_overrides()
}

fn open_storage(cli: &Cli, config: &Config) -> Result<FileStorage, Box<dyn std::error::Error>> {
    if let Some(dir) = cli.cache_dir.clone().or_else(|| config.cache.dir.clone()) {
        return Ok(FileStorage::with_dir(dir));
    }
    FileStorage::new().ok_or_else(|| "Could not determine a cache directory; pass --cache-dir".into())
}

/// One-line summary of a listing
fn listing_line(listing: &PropertyListing) -> String {
    let rooms = match (listing.bedrooms, listing.bathrooms) {
        (Some(beds), Some(baths)) => format!("{} bd / {} ba", beds, baths),
        (Some(beds), None) => format!("{} bd", beds),
        _ => "-".to_string(),
    };
    format!(
        "{:<12} {:>18}  {:<12} {:<10} {}  ({})",
        listing.mls_number, listing.price, listing.category, rooms, listing.title, listing.city
    )
}

fn print_details(details: &PropertyDetails) {
    println!("{} [{}]", details.title, details.mls_number);
    println!("{}", details.price);
    if let Some(per_sqft) = &details.financials.price_per_sqft {
        println!("  {}", per_sqft);
    }
    println!(
        "{}, {}, {} {}",
        details.address.street, details.address.city, details.address.province, details.address.postal_code
    );
    println!();
    println!("{}", details.description);
    if !details.features.is_empty() {
        println!();
        println!("Features: {}", details.features.join(", "));
    }
    if !details.rooms.is_empty() {
        println!();
        for room in &details.rooms {
            println!(
                "  {:<16} {:<14} {}",
                room.kind,
                room.level.as_deref().unwrap_or(""),
                room.dimensions.as_deref().unwrap_or("")
            );
        }
    }
    println!();
    for agent in &details.agents {
        println!("  {} - {}", agent.name, agent.phone);
    }
}

async fn run_listings(service: &Service, args: &ListingsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = service.load_listings().await;
    if let ListingSource::Fallback { reason } = &loaded.source {
        eprintln!("Failed to load properties ({}). Showing sample listings.", reason);
    }

    let listings = filter_listings_advanced(&loaded.page.listings, &args.criteria());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    for listing in &listings {
        println!("{}", listing_line(listing));
    }
    println!(
        "\nShowing {} of {} listings",
        listings.len(),
        loaded.page.total_records
    );
    Ok(())
}

async fn run_featured(service: &Service, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match service.featured_listing().await? {
        Some(listing) if json => println!("{}", serde_json::to_string_pretty(&listing)?),
        Some(listing) => {
            println!("{}", listing_line(&listing));
            println!("\n{}", listing.description);
            println!("\nContact {} at {}", listing.agent_name, listing.agent_phone);
        }
        None => println!("No featured property available at the moment."),
    }
    Ok(())
}

fn run_cache(service: &Service, action: &CacheAction) -> Result<(), Box<dyn std::error::Error>> {
    let cache = service.cache();
    match action {
        CacheAction::Info { key } => match cache.info(key) {
            Some(info) => println!("{}", serde_json::to_string_pretty(&info)?),
            None => println!("No cache entry for '{}'", key),
        },
        CacheAction::Remove { key } => {
            cache.remove(key);
            println!("Removed '{}'", key);
        }
        CacheAction::Clear => {
            cache.clear();
            println!("Cleared cache in {}", cache.storage().dir().display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli);
    let storage = open_storage(&cli, &config)?;
    log::debug!("Using cache directory {}", storage.dir().display());
    let service = ListingService::from_config(&config, storage);

    match &cli.command {
        Command::Listings(args) => run_listings(&service, args).await?,
        Command::Featured { json } => run_featured(&service, *json).await?,
        Command::Details { id, mls, json } => {
            let details = service.details(id, mls).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                print_details(&details);
            }
        }
        Command::Cache { action } => run_cache(&service, action)?,
    }

    Ok(())
}
