//! Credential primitives shared by the services
//!
//! Password hashing and token issuance both delegate to standard libraries;
//! nothing here invents cryptography.

pub mod jwt;
pub mod password;

pub use jwt::{issue_token, verify_token, Claims};
pub use password::{hash_password, verify_password};
