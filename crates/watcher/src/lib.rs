//! scrolldir Watcher
//!
//! Turns a raw, noisy scroll signal into:
//! - **Ticks:** one callback per rendered frame with the clamped position
//! - **Changes:** a callback only when the direction genuinely reverses
//! - **Flag:** the current direction (or `off`) published on an element
//!
//! The watcher is host-agnostic; it runs against anything implementing the
//! contracts in `scrolldir-platform-core`. [`replay`] drives it from a
//! recorded trace.

pub mod history;
pub mod replay;
pub mod watcher;

pub use history::History;
pub use replay::{replay, ReplayOptions, ReplayReport};
pub use watcher::{ScrollDirectionWatcher, TickOutcome, WatcherOptions, WatcherTuning};
