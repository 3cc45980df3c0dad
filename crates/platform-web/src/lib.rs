//! Browser platform integration.
//!
//! On `wasm32` this crate binds the watcher to the page's `window`: scroll
//! notifications come from the window's `scroll` event, frames from
//! `requestAnimationFrame`, geometry from `scrollY`/`innerHeight` and the
//! body's `offsetHeight`, and the flag is a DOM attribute.
//!
//! Other targets get no browser and only see [`is_supported`].

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{ElementFlag, WebScrollWatcher, WebWatcher, WindowViewport};

/// Whether this build can talk to a browser.
pub fn is_supported() -> bool {
    cfg!(target_arch = "wasm32")
}
