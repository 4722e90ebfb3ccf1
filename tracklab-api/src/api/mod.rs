//! HTTP handlers for tracklab-api

pub mod auth;
pub mod auth_middleware;
pub mod health;
pub mod releases;
pub mod splits;
