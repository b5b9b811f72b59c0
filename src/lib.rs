//! Rideau Lakes listings library
//!
//! Fetches an office's property listings, normalizes them into stable
//! records, caches them locally, and provides filtering and featured-listing
//! selection on top.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod featured;
pub mod filter;
pub mod service;
