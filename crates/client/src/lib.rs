//! Client code for favcache.
//!
//! This crate provides the HTTP fetch primitive, the icon cache orchestration
//! built on it, and the message-passing text helpers.

pub mod fetch;
pub mod icons;
pub mod messages;

pub use fetch::{FetchClient, FetchConfig, FetchResponse, Fetcher};
pub use icons::{IconResponse, IconService, IconSource, Lifecycle};
pub use messages::{Message, MessageReply, UrlPayload, dispatch};
