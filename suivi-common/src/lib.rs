//! # Suivi Common Library
//!
//! Shared code for the suivi-terrain services:
//! - SQLite schema and connection initialization
//! - Row models (regions, enquêteurs, ménages)
//! - Household status codes and CSV status text mapping
//! - Configuration resolution
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod statut;

pub use error::{Error, Result};
pub use statut::StatutMenage;
