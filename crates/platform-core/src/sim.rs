//! In-memory host used by tests and trace replay.

use std::collections::BTreeMap;

use scrolldir_common::error::ScrolldirResult;

use crate::{FlagTarget, ListenerId, ScrollViewport};

/// A viewport whose geometry is set by hand.
///
/// Subscriptions are kept as a list, so subscribing the same listener twice
/// leaves two entries, as a browser would with two distinct handlers.
#[derive(Debug, Clone, Default)]
pub struct SimulatedViewport {
    scroll_y: f64,
    viewport_height: f64,
    document_height: f64,
    listeners: Vec<ListenerId>,
    frame_requests: Vec<ListenerId>,
}

impl SimulatedViewport {
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            viewport_height,
            document_height,
            ..Default::default()
        }
    }

    /// Move the scroll offset. Out-of-range values are kept as-is.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    pub fn resize(&mut self, viewport_height: f64, document_height: f64) {
        self.viewport_height = viewport_height;
        self.document_height = document_height;
    }

    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    /// Number of active subscriptions for `id`.
    pub fn subscription_count(&self, id: ListenerId) -> usize {
        self.listeners.iter().filter(|l| **l == id).count()
    }

    pub fn has_pending_frame(&self) -> bool {
        !self.frame_requests.is_empty()
    }

    /// Drain the frame requests made since the last call.
    pub fn take_frame_requests(&mut self) -> Vec<ListenerId> {
        std::mem::take(&mut self.frame_requests)
    }
}

impl ScrollViewport for SimulatedViewport {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn add_scroll_listener(&mut self, id: ListenerId) -> ScrolldirResult<()> {
        self.listeners.push(id);
        Ok(())
    }

    fn remove_scroll_listener(&mut self, id: ListenerId) -> ScrolldirResult<()> {
        if let Some(pos) = self.listeners.iter().position(|l| *l == id) {
            self.listeners.remove(pos);
        } else {
            tracing::trace!(listener = %id, "remove for unknown scroll listener");
        }
        Ok(())
    }

    fn request_animation_frame(&mut self, id: ListenerId) -> ScrolldirResult<()> {
        self.frame_requests.push(id);
        Ok(())
    }
}

/// An element modelled as a map of attributes.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    attributes: BTreeMap<String, String>,
    writes: usize,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Total number of attribute writes, including rewrites of the same value.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl FlagTarget for AttributeMap {
    fn set_flag(&mut self, name: &str, value: &str) -> ScrolldirResult<()> {
        self.attributes.insert(name.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
