//! scrolldir Model
//!
//! Defines the data contracts shared by the watcher, its hosts and tooling:
//! - **Direction:** scroll direction and the externally published flag value
//! - **Metrics:** one viewport reading, clamped against rubber-band overscroll
//! - **Sample:** a `(position, timestamp)` reading and the callback payload
//! - **Trace:** recorded scroll streams in JSONL form
//!
//! Positions are CSS pixels; timestamps are milliseconds since the page's
//! time origin.

pub mod direction;
pub mod metrics;
pub mod sample;
pub mod trace;

pub use direction::*;
pub use metrics::*;
pub use sample::*;
pub use trace::*;
