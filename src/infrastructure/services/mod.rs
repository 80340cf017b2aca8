//! Infrastructure services

mod hotel_search_service;

pub use hotel_search_service::{HotelSearchConfig, HotelSearchService};
