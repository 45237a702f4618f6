//! Core types and shared functionality for favcache.
//!
//! This crate provides:
//! - Icon, redirect and allow-list storage with a SQLite backend
//! - Freshness evaluation and the image admission gate
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod freshness;
pub mod headers;
pub mod mime;

pub use cache::{AllowList, CacheDb, CacheEntry, IconStore};
pub use config::AppConfig;
pub use error::Error;
pub use headers::HeaderFields;
pub use mime::ImageKind;
