//! HTTP API handlers for the AI service

pub mod analyze;
pub mod generate;
pub mod health;
pub mod status;
