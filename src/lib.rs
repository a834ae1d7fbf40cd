//! World Bank administrative boundaries as tables
//!
//! Queries the World Bank ArcGIS feature services for country, admin level 1
//! and admin level 2 boundaries and returns their attributes alongside
//! assembled polygon geometry.
//!
//! ```no_run
//! use boundaries::api::BoundaryClient;
//! use boundaries::config::Config;
//! use boundaries::error::FetchOutcome;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = BoundaryClient::new(&Config::default())?;
//! match client.fetch_admin1("HTI").await {
//!     FetchOutcome::Success(table) => println!("{} departments", table.len()),
//!     FetchOutcome::NotFound => println!("no such country"),
//!     FetchOutcome::NetworkFailure(e) => eprintln!("retry later: {}", e),
//!     FetchOutcome::ParseFailure(e) => eprintln!("bad response: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod models;
