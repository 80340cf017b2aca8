//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::HotelSearchService;

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub hotel_service: Arc<HotelSearchService>,
}

impl AppState {
    pub fn new(hotel_service: Arc<HotelSearchService>) -> Self {
        Self { hotel_service }
    }
}
