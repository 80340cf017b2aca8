//! HTTP API types

pub mod error;
pub mod hotels;
pub mod query;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use hotels::{NearestHotelsQuery, SearchHotelsQuery};
pub use query::Query;
