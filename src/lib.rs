//! Sia explorer - resolves ledger hashes into browsable views
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Ledger Data
//! - [`types`] - Hashes, currency, targets and the daemon's JSON shapes
//! - [`encoding`] - Canonical binary encoding hashed into transaction IDs
//! - [`crypto`] - BLAKE2b hashing and deterministic output/contract IDs
//!
//! ## Resolution
//! - [`client`] - Ledger Query Service client
//! - [`classify`] - Response classification by `ResponseType`
//! - [`resolver`] - Output search, view assembly and the hash dispatch
//! - [`hosts`] - Host list projection
//!
//! ## Integration
//! - [`api`] - axum HTTP endpoints (feature `api`)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Ledger Data
// ============================================================================
pub mod crypto;
pub mod encoding;
pub mod types;

// ============================================================================
// Resolution
// ============================================================================
pub mod classify;
pub mod client;
pub mod hosts;
pub mod resolver;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
