//! scrolldir host contracts.
//!
//! The watcher never talks to a browser directly. It reads geometry from and
//! subscribes through a [`ScrollViewport`], and publishes its state through a
//! [`FlagTarget`]. Concrete hosts live in their own crates; an in-memory host
//! for tests and trace replay lives in [`sim`].

pub mod sim;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use scrolldir_common::error::ScrolldirResult;

pub use sim::{AttributeMap, SimulatedViewport};

/// Identity of a scroll listener, used to subscribe, unsubscribe and route
/// frame callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

impl ListenerId {
    /// Allocate an id no other listener in this process has.
    pub fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A window-like object: scroll geometry, scroll notifications and
/// frame scheduling.
pub trait ScrollViewport {
    /// Current scroll offset, unclamped.
    fn scroll_y(&self) -> f64;

    /// Visible height of the viewport.
    fn viewport_height(&self) -> f64;

    /// Full height of the scrolled document.
    fn document_height(&self) -> f64;

    /// Start delivering scroll notifications to `id`.
    fn add_scroll_listener(&mut self, id: ListenerId) -> ScrolldirResult<()>;

    /// Stop delivering scroll notifications to `id`.
    fn remove_scroll_listener(&mut self, id: ListenerId) -> ScrolldirResult<()>;

    /// Ask for a callback to `id` before the next paint.
    fn request_animation_frame(&mut self, id: ListenerId) -> ScrolldirResult<()>;
}

/// An element that carries the watcher's state attribute.
pub trait FlagTarget {
    fn set_flag(&mut self, name: &str, value: &str) -> ScrolldirResult<()>;
}
