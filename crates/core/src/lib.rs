//! Malai Core - Shared types library.
//!
//! This crate provides common types used across all Malai components:
//! - `api` - Storefront HTTP service (catalog, checkout, LINE webhook)
//! - `integration-tests` - End-to-end tests against a running service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, Baht amounts, and order status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
