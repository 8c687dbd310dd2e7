//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] - discussion and user identifiers
//! - [`role::Role`] / [`role::Actor`] - who is calling and with which privileges
//! - [`error::DomainError`] - domain-level errors
//! - [`validation`] - structured configuration issues

pub mod error;
pub mod ids;
pub mod role;
pub mod validation;
