//! Hotel provider implementations

mod amadeus;
mod booking;
mod factory;
mod gateway;
mod http_client;
mod synthetic;

pub use amadeus::AmadeusProvider;
pub use booking::BookingProvider;
pub use factory::ProviderFactory;
pub use gateway::ProviderGateway;
pub use http_client::{HttpClient, HttpClientTrait};
pub use synthetic::{SyntheticConfig, SyntheticHotelGenerator};
