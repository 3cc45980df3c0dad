//! The scroll direction watcher.
//!
//! # Algorithm
//!
//! Each processed sample is clamped, pushed to the history and reported
//! through the tick callback. Then:
//!
//! 1. **Extend:** if the sample continues past the pivot (the high-water mark
//!    when moving down, the low-water mark when moving up), it becomes the
//!    new pivot.
//! 2. **Expire:** otherwise, a pivot older than `history_max_age_ms` is
//!    recomputed from the samples still inside that window.
//! 3. **Reverse:** a distance from the pivot beyond `threshold_px` flips the
//!    direction, rewrites the flag and fires the change callback. Anything
//!    smaller is treated as jitter or rubber-banding.
//!
//! Scroll notifications are coalesced: at most one frame callback is pending,
//! and it processes the latest notification only.

use std::fmt;

use scrolldir_common::config::WatcherDefaults;
use scrolldir_common::error::{ScrolldirError, ScrolldirResult};
use scrolldir_model::{Direction, FlagValue, Sample, ScrollInfo, ScrollMetrics, TimestampMs};
use scrolldir_platform_core::{FlagTarget, ListenerId, ScrollViewport};

use crate::history::History;

pub const DEFAULT_FLAG_NAME: &str = "data-scrolldir";
pub const DEFAULT_HISTORY_MAX_AGE_MS: f64 = 512.0;
pub const DEFAULT_THRESHOLD_PX: f64 = 64.0;

/// Callback receiving tick or change payloads.
pub type ScrollCallback = Box<dyn FnMut(&ScrollInfo)>;

/// Noise-filtering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatcherTuning {
    /// Age after which the pivot no longer pins the reference point (ms).
    pub history_max_age_ms: f64,
    /// Distance back from the pivot that confirms a reversal (px).
    pub threshold_px: f64,
}

impl Default for WatcherTuning {
    fn default() -> Self {
        Self {
            history_max_age_ms: DEFAULT_HISTORY_MAX_AGE_MS,
            threshold_px: DEFAULT_THRESHOLD_PX,
        }
    }
}

impl From<&WatcherDefaults> for WatcherTuning {
    fn from(defaults: &WatcherDefaults) -> Self {
        Self {
            history_max_age_ms: defaults.history_max_age_ms,
            threshold_px: defaults.threshold_px,
        }
    }
}

/// Overrides applied by [`ScrollDirectionWatcher::init`].
///
/// Every field is optional; unset fields keep the watcher's current value.
pub struct WatcherOptions<V, T> {
    pub flag_name: Option<String>,
    pub target: Option<T>,
    pub viewport: Option<V>,
    pub initial_direction: Option<Direction>,
    pub tuning: Option<WatcherTuning>,
    pub on_tick: Option<ScrollCallback>,
    pub on_change: Option<ScrollCallback>,
    /// Run the `off` sequence instead of subscribing.
    pub disabled: bool,
}

impl<V, T> WatcherOptions<V, T> {
    pub fn new() -> Self {
        Self {
            flag_name: None,
            target: None,
            viewport: None,
            initial_direction: None,
            tuning: None,
            on_tick: None,
            on_change: None,
            disabled: false,
        }
    }

    /// Options carrying the configured flag name, direction and tuning.
    pub fn from_config(defaults: &WatcherDefaults) -> ScrolldirResult<Self> {
        let direction = defaults
            .initial_direction
            .parse::<Direction>()
            .map_err(|e| ScrolldirError::config(e.to_string()))?;
        Ok(Self::new()
            .flag_name(defaults.flag_name.clone())
            .initial_direction(direction)
            .tuning(WatcherTuning::from(defaults)))
    }

    pub fn flag_name(mut self, name: impl Into<String>) -> Self {
        self.flag_name = Some(name.into());
        self
    }

    pub fn target(mut self, target: T) -> Self {
        self.target = Some(target);
        self
    }

    pub fn viewport(mut self, viewport: V) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn initial_direction(mut self, direction: Direction) -> Self {
        self.initial_direction = Some(direction);
        self
    }

    pub fn tuning(mut self, tuning: WatcherTuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    pub fn on_tick(mut self, callback: impl FnMut(&ScrollInfo) + 'static) -> Self {
        self.on_tick = Some(Box::new(callback));
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(&ScrollInfo) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl<V, T> Default for WatcherOptions<V, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, T> fmt::Debug for WatcherOptions<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherOptions")
            .field("flag_name", &self.flag_name)
            .field("target", &self.target.is_some())
            .field("viewport", &self.viewport.is_some())
            .field("initial_direction", &self.initial_direction)
            .field("tuning", &self.tuning)
            .field("on_tick", &self.on_tick.is_some())
            .field("on_change", &self.on_change.is_some())
            .field("disabled", &self.disabled)
            .finish()
    }
}

/// Reference point for reversal detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub position: f64,
    /// When the pivot was last set; `None` until the first sample.
    pub timestamp: Option<TimestampMs>,
}

impl Pivot {
    fn at(position: f64, timestamp: TimestampMs) -> Self {
        Self {
            position,
            timestamp: Some(timestamp),
        }
    }

    fn is_older_than(&self, cutoff: TimestampMs) -> bool {
        self.timestamp.map_or(true, |t| t < cutoff)
    }
}

/// What processing a sample did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The sample pushed the pivot further along the current direction.
    Extended,
    /// The sample moved back, but not far enough to count.
    Held,
    /// The direction flipped; carries the change payload.
    Reversed(ScrollInfo),
}

/// Infers scroll direction from a viewport's scroll signal.
pub struct ScrollDirectionWatcher<V, T> {
    id: ListenerId,
    viewport: V,
    target: T,
    flag_name: String,
    tuning: WatcherTuning,
    direction: Direction,
    pivot: Pivot,
    history: History,
    active: bool,
    on_tick: Option<ScrollCallback>,
    on_change: Option<ScrollCallback>,
    latest_event: Option<TimestampMs>,
    frame_pending: bool,
}

impl<V: ScrollViewport, T: FlagTarget> ScrollDirectionWatcher<V, T> {
    /// Create an inactive watcher. `viewport` and `target` are the defaults
    /// that `init` options may replace.
    pub fn new(viewport: V, target: T) -> Self {
        Self {
            id: ListenerId::next(),
            viewport,
            target,
            flag_name: DEFAULT_FLAG_NAME.to_string(),
            tuning: WatcherTuning::default(),
            direction: Direction::default(),
            pivot: Pivot {
                position: 0.0,
                timestamp: None,
            },
            history: History::new(),
            active: false,
            on_tick: None,
            on_change: None,
            latest_event: None,
            frame_pending: false,
        }
    }

    pub fn with_tuning(mut self, tuning: WatcherTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Apply options, publish the direction and subscribe to scrolling.
    ///
    /// Calling this twice without [`off`](Self::off) subscribes twice.
    pub fn init(&mut self, options: WatcherOptions<V, T>) -> ScrolldirResult<()> {
        let WatcherOptions {
            flag_name,
            target,
            viewport,
            initial_direction,
            tuning,
            on_tick,
            on_change,
            disabled,
        } = options;

        if let Some(name) = flag_name {
            self.flag_name = name;
        }
        if let Some(target) = target {
            self.target = target;
        }
        if let Some(viewport) = viewport {
            self.viewport = viewport;
        }
        if let Some(direction) = initial_direction {
            self.direction = direction;
        }
        if let Some(tuning) = tuning {
            self.tuning = tuning;
        }
        if on_tick.is_some() {
            self.on_tick = on_tick;
        }
        if on_change.is_some() {
            self.on_change = on_change;
        }

        if disabled {
            return self.off();
        }

        let position = self.read_metrics(self.viewport.scroll_y()).clamped_y();
        self.pivot = Pivot {
            position,
            timestamp: None,
        };
        self.history.clear();
        self.latest_event = None;
        self.frame_pending = false;
        self.active = true;

        self.write_flag(self.direction.into())?;
        self.viewport.add_scroll_listener(self.id)?;

        tracing::debug!(
            listener = %self.id,
            direction = %self.direction,
            pivot = position,
            "Scroll watcher started"
        );
        Ok(())
    }

    /// Publish `off` and unsubscribe. Terminal until the next `init`.
    ///
    /// The watcher stays active if either host call fails.
    pub fn off(&mut self) -> ScrolldirResult<()> {
        self.write_flag(FlagValue::Off)?;
        self.viewport.remove_scroll_listener(self.id)?;
        self.active = false;
        tracing::debug!(listener = %self.id, "Scroll watcher stopped");
        Ok(())
    }

    /// Scroll notification from the host.
    ///
    /// Records the event time and requests a frame unless one is pending.
    pub fn handle_scroll(&mut self, time_stamp: TimestampMs) -> ScrolldirResult<()> {
        if !self.active {
            return Ok(());
        }
        self.latest_event = Some(time_stamp);
        if !self.frame_pending {
            self.viewport.request_animation_frame(self.id)?;
            self.frame_pending = true;
        }
        Ok(())
    }

    /// Frame callback from the host. Processes the latest notification.
    ///
    /// Frames that arrive after `off` do nothing.
    pub fn on_animation_frame(&mut self) -> ScrolldirResult<Option<TickOutcome>> {
        self.frame_pending = false;
        if !self.active {
            tracing::trace!(listener = %self.id, "Ignoring frame after off");
            return Ok(None);
        }
        let Some(timestamp) = self.latest_event.take() else {
            return Ok(None);
        };
        let raw_y = self.viewport.scroll_y();
        self.process_sample(raw_y, timestamp).map(Some)
    }

    /// Run one raw reading through the direction detector.
    pub fn process_sample(
        &mut self,
        raw_y: f64,
        timestamp: TimestampMs,
    ) -> ScrolldirResult<TickOutcome> {
        let metrics = self.read_metrics(raw_y);
        let y = metrics.clamped_y();
        self.history.push(Sample::new(y, timestamp));

        let info = ScrollInfo::from_metrics(self.direction, &metrics);
        if let Some(on_tick) = self.on_tick.as_mut() {
            on_tick(&info);
        }

        // A shrunk document can leave the pivot past the new end.
        let y_max = metrics.y_max();
        self.pivot.position = self.pivot.position.clamp(0.0, y_max);

        let direction = self.direction;
        if y == direction.furthest(self.pivot.position, y) {
            self.pivot = Pivot::at(y, timestamp);
            return Ok(TickOutcome::Extended);
        }

        let cutoff = timestamp - self.tuning.history_max_age_ms;
        if self.pivot.is_older_than(cutoff) {
            self.pivot.position = self
                .history
                .furthest_since(direction, y, cutoff)
                .clamp(0.0, y_max);
        }

        if (y - self.pivot.position).abs() <= self.tuning.threshold_px {
            return Ok(TickOutcome::Held);
        }

        self.pivot = Pivot::at(y, timestamp);
        self.direction = direction.reversed();
        self.write_flag(self.direction.into())?;

        let info = ScrollInfo {
            dir: self.direction,
            ..info
        };
        tracing::debug!(
            listener = %self.id,
            direction = %self.direction,
            y,
            t = timestamp,
            "Scroll direction changed"
        );
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&info);
        }
        Ok(TickOutcome::Reversed(info))
    }

    fn read_metrics(&self, raw_y: f64) -> ScrollMetrics {
        ScrollMetrics::new(
            raw_y,
            self.viewport.viewport_height(),
            self.viewport.document_height(),
        )
    }

    fn write_flag(&mut self, value: FlagValue) -> ScrolldirResult<()> {
        self.target.set_flag(&self.flag_name, value.as_str())
    }
}

impl<V, T> ScrollDirectionWatcher<V, T> {
    /// Callback identity used with the viewport.
    pub fn listener_id(&self) -> ListenerId {
        self.id
    }

    /// Current direction; kept across `off` so a later `init` resumes it.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The value currently published on the flag.
    pub fn flag(&self) -> FlagValue {
        if self.active {
            self.direction.into()
        } else {
            FlagValue::Off
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn pivot(&self) -> Pivot {
        self.pivot
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn flag_name(&self) -> &str {
        &self.flag_name
    }

    pub fn tuning(&self) -> WatcherTuning {
        self.tuning
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn target(&self) -> &T {
        &self.target
    }
}

impl<V, T> fmt::Debug for ScrollDirectionWatcher<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollDirectionWatcher")
            .field("id", &self.id)
            .field("flag_name", &self.flag_name)
            .field("tuning", &self.tuning)
            .field("direction", &self.direction)
            .field("pivot", &self.pivot)
            .field("history_len", &self.history.len())
            .field("active", &self.active)
            .field("frame_pending", &self.frame_pending)
            .finish()
    }
}
