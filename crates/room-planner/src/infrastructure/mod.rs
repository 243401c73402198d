//! Infrastructure layer for the planner.
//!
//! Contains OS-facing adapters: the TOML configuration file, layout
//! repositories, and the front-end command bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and `room_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod storage;
pub mod ui_bridge;
