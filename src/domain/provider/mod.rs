//! Provider domain - upstream hotel inventories and their failure modes

mod adapter;
mod error;

pub use adapter::{GatewayResult, HotelProvider, ProviderPage};
pub use error::ProviderError;

#[cfg(test)]
pub use adapter::mock::MockHotelProvider;
