//! Subcommand implementations, one module per view.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod session;
