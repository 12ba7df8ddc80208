//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartEntry, Quantity, QuantityError};
pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
pub use product::{Product, join_tags, parse_tags};
