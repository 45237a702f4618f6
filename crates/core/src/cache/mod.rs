//! SQLite-backed storage for icons, redirects and the allow-list.
//!
//! This module provides a persistent cache using SQLite with async access
//! via tokio-rusqlite. It supports:
//!
//! - Namespaced icon entries keyed by URL
//! - A durable key-value table (redirect mappings)
//! - The allow-list of cacheable icon URLs
//! - Automatic schema migrations and WAL mode

pub mod allowlist;
pub mod connection;
pub mod hash;
pub mod icons;
pub mod kv;
pub mod migrations;

pub use crate::Error;

pub use allowlist::AllowList;
pub use connection::CacheDb;
pub use icons::{CacheEntry, IconStore};
