//! Application layer use cases for the planner.
//!
//! Use cases in this layer orchestrate `room_core` domain objects to fulfil a
//! user goal.  They depend on abstractions (traits) rather than concrete
//! storage, and contain no file system or network access.
//!
//! # Sub-modules
//!
//! - **`dispatch_gesture`** – The tool/selection state machine.  Turns a
//!   front-end gesture plus the current [`dispatch_gesture::Selection`] into a
//!   single placement-store operation.  Runs on every drag frame.
//!
//! - **`edit_session`** – One user's editing session: the placement store,
//!   the selection, and the edit counter used to discard stale load results.
//!
//! - **`persist_layout`** – Saves and fetches snapshots through a
//!   [`persist_layout::LayoutRepository`] with timeouts and bounded retries.

pub mod dispatch_gesture;
pub mod edit_session;
pub mod persist_layout;
