//! # Tracklab Common Library
//!
//! Shared code for the Tracklab services including:
//! - Error taxonomy
//! - Configuration resolution (root folder, TOML, environment)
//! - Database initialization and schema
//! - Data models (users, releases, royalty splits)
//! - Password hashing and JWT issuance/verification
//! - Fixed-point share percentages

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod share;
pub mod validate;

pub use error::{Error, Result};
pub use share::SharePercent;
