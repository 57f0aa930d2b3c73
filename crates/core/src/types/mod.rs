//! Core types for the Malai storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod status;

pub use id::*;
pub use money::{Baht, SHIPPING_FEE};
pub use status::OrderStatus;
