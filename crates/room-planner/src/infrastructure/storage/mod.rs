//! Storage infrastructure: configuration file and layout repositories.
//!
//! - `config` reads and writes the TOML configuration file from the
//!   platform-appropriate directory, with defaults on first run.
//! - `layout_files` implements [`LayoutRepository`] with one JSON file per
//!   layout.
//! - `memory` implements [`LayoutRepository`] in memory, with optional
//!   injected latency and failures for exercising the retry path.
//!
//! [`LayoutRepository`]: crate::application::persist_layout::LayoutRepository

pub mod config;
pub mod layout_files;
pub mod memory;
