//! HTTP API handlers for suivi-api

pub mod details;
pub mod enqueteurs;
pub mod error;
pub mod health;
pub mod menages;
pub mod regions;
pub mod stats;

pub use details::menages_details;
pub use enqueteurs::{get_enqueteur, list_enqueteurs};
pub use error::ApiError;
pub use health::health_routes;
pub use menages::{create_menage, delete_menage, get_menage, list_menages, update_menage};
pub use regions::{get_region, list_regions};
pub use stats::{global_stats, region_stats};
