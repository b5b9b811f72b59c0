//! Featured listing selection
//!
//! Picks one listing per clock hour. The pick is deterministic for a given
//! hour and listing set, so repeated loads within the hour agree.

use chrono::{Datelike, Timelike};

use crate::data::PropertyListing;

/// Listings at or below this price are never featured while pricier ones exist
pub const FEATURED_MIN_PRICE: u64 = 500_000;

/// Hour-granularity seed from a local time
///
/// `year * 1_000_000 + month0 * 100_000 + day * 1_000 + hour`, with a
/// zero-based month.
pub fn hour_seed<T: Datelike + Timelike>(now: &T) -> u64 {
    let year = u64::try_from(now.year()).unwrap_or(0);
    year * 1_000_000
        + u64::from(now.month0()) * 100_000
        + u64::from(now.day()) * 1_000
        + u64::from(now.hour())
}

/// Priced above [`FEATURED_MIN_PRICE`] and not vacant land
pub fn is_eligible(listing: &PropertyListing) -> bool {
    let vacant = listing.category.to_lowercase().contains("vacant")
        || listing.building_type.to_lowercase().contains("vacant");
    !vacant
        && listing
            .numeric_price()
            .map_or(false, |price| price > FEATURED_MIN_PRICE)
}

/// Selects the featured listing for `seed`
///
/// Indexes the eligible listings when there are any, otherwise all listings.
/// Returns `None` only for an empty input.
pub fn select_featured(listings: &[PropertyListing], seed: u64) -> Option<&PropertyListing> {
    let eligible: Vec<&PropertyListing> = listings.iter().filter(|l| is_eligible(l)).collect();
    if !eligible.is_empty() {
        return Some(eligible[(seed % eligible.len() as u64) as usize]);
    }
    if listings.is_empty() {
        return None;
    }
    log::debug!("No eligible featured listing, choosing from all {}", listings.len());
    listings.get((seed % listings.len() as u64) as usize)
}
