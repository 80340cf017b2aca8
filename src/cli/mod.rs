//! CLI module for the hotel discovery engine
//!
//! Provides subcommands:
//! - `serve`: HTTP API server with the background cache sweeper
//! - `search`: one-shot hotel search printed as JSON
//! - `nearest`: one-shot ranked nearest-hotel query printed as JSON

pub mod nearest;
pub mod search;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Hotel discovery engine - cached provider search with geodesic ranking
#[derive(Parser)]
#[command(name = "hotel-discovery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Search hotels once and print the page as JSON
    Search(search::SearchArgs),

    /// Rank the nearest hotels to a point and print them as JSON
    Nearest(nearest::NearestArgs),
}

/// Loads layered configuration and starts logging
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);
    config.validate()?;

    Ok(config)
}
