//! Search command - one-shot hotel search

use chrono::NaiveDate;
use clap::Args;

use crate::domain::hotel::{SearchParams, SortOrder};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Provider city identifier (alternative to --lat/--lng)
    #[arg(long)]
    pub city_id: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub checkin: NaiveDate,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    pub checkout: NaiveDate,

    #[arg(long, default_value_t = 1)]
    pub guests: u32,

    /// recommended, price_asc, price_desc, rating or distance
    #[arg(long, default_value = "recommended")]
    pub sort: String,

    /// Search radius in meters
    #[arg(long)]
    pub radius: Option<f64>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 20)]
    pub limit: u32,
}

impl SearchArgs {
    pub fn into_params(self) -> anyhow::Result<SearchParams> {
        let mut params = SearchParams {
            city_id: self.city_id,
            lat: self.lat,
            lng: self.lng,
            ..SearchParams::near(0.0, 0.0, self.checkin, self.checkout, self.guests)
        }
        .with_sort(self.sort.parse::<SortOrder>()?)
        .with_page(self.page)
        .with_limit(self.limit);

        if let Some(radius) = self.radius {
            params = params.with_radius(radius);
        }

        Ok(params)
    }
}

/// Run a single search and print the result page
pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let service = crate::build_hotel_service(&config).await?;

    let result = service.search_hotels(args.into_params()?).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
