//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and cleaning the icon cache.

pub mod list;
pub mod sweep;

pub use list::{CacheListOutput, CacheListParams, list_impl};
pub use sweep::{CacheSweepOutput, sweep_impl};
