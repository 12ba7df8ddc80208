//! Shopfront Core - Shared types library.
//!
//! This crate provides common types used across all Shopfront components:
//! - `shopfront` - Storefront client library (catalog, cart, admin editor)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, product records and cart entries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
