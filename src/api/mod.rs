//! API module for the World Bank boundary feature services

mod admin;
mod client;
mod country;

pub use client::{BoundaryClient, FeatureSource, ReqwestSource};
