//! Catalog loading from the spreadsheet feed.
//!
//! The feed is the spreadsheet service's gviz JSON endpoint: plain JSON
//! wrapped in a JS callback, a header row, and fixed column positions.
//! Loading happens once at startup; a failed fetch leaves the catalog empty
//! for the session, with no retry.

pub mod client;
pub mod config;
pub mod error;
pub mod gviz;

pub use client::FeedClient;
pub use config::{
    ConfigSource, ConfigSources, FeedConfig, config_path, config_sources, save_to_file,
};
pub use error::FeedError;
pub use gviz::parse_feed;
