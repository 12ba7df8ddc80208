//! Shopfront storefront library.
//!
//! A headless storefront client: catalog loading and filtering, a persistent
//! cart, a session token and an admin CRUD editor, all talking to a remote
//! Product Store over HTTP. Front ends (the `shopfront` CLI, tests) drive it
//! through [`state::Storefront`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notice;
pub mod session;
pub mod state;
pub mod storage;

pub use error::{Result, StorefrontError};
pub use notice::{Notice, NoticeLevel};
pub use state::Storefront;
