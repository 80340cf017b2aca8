//! Nearest command - one-shot ranked nearest-hotel query

use chrono::NaiveDate;
use clap::Args;

use crate::domain::hotel::{HotelFilters, NearestQuery};

#[derive(Args, Debug)]
pub struct NearestArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Search radius in meters; the configured default when omitted
    #[arg(long)]
    pub radius: Option<f64>,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub checkin: NaiveDate,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    pub checkout: NaiveDate,

    #[arg(long, default_value_t = 1)]
    pub guests: u32,

    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    #[arg(long)]
    pub min_rating: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// Required amenities, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub amenities: Vec<String>,
}

impl NearestArgs {
    pub fn into_query(self) -> NearestQuery {
        let filters = HotelFilters {
            min_rating: self.min_rating,
            max_price: self.max_price,
            amenities: self
                .amenities
                .into_iter()
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
        };

        let mut query = NearestQuery::new(self.lat, self.lng, self.checkin, self.checkout, self.guests)
            .with_limit(self.limit)
            .with_filters(filters);

        if let Some(radius) = self.radius {
            query = query.with_radius(radius);
        }

        query
    }
}

/// Run a single nearest query and print the ranking
pub async fn run(args: NearestArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let service = crate::build_hotel_service(&config).await?;

    let response = service.find_nearest_hotels(args.into_query()).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
