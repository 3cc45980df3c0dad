//! Deterministic replay of recorded scroll traces.
//!
//! A trace is fed through a watcher running on a [`SimulatedViewport`].
//! Scroll events move the simulated offset and notify the watcher; frame
//! events run the pending frame callback. Traces without frame events get
//! frames synthesized on the header's refresh grid, so bursts of scroll
//! events inside one frame interval coalesce exactly as they would in a
//! browser.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use scrolldir_common::clock::FrameClock;
use scrolldir_common::config::ReplayDefaults;
use scrolldir_common::error::ScrolldirResult;
use scrolldir_model::{Direction, ScrollInfo, ScrollTrace, TraceEventKind};
use scrolldir_platform_core::{AttributeMap, SimulatedViewport};

use crate::watcher::{ScrollDirectionWatcher, WatcherOptions, WatcherTuning, DEFAULT_FLAG_NAME};

type SimWatcher = ScrollDirectionWatcher<SimulatedViewport, AttributeMap>;

/// Settings for a replay run.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub flag_name: String,
    pub initial_direction: Direction,
    pub tuning: WatcherTuning,
    /// Page geometry and frame rate used when the trace has no header.
    pub defaults: ReplayDefaults,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            flag_name: DEFAULT_FLAG_NAME.to_string(),
            initial_direction: Direction::Down,
            tuning: WatcherTuning::default(),
            defaults: ReplayDefaults::default(),
        }
    }
}

/// Everything the watcher reported during a replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// Tick payloads, one per processed frame.
    pub ticks: Vec<ScrollInfo>,
    /// Change payloads, one per confirmed reversal.
    pub changes: Vec<ScrollInfo>,
    /// Frames that ran a watcher callback.
    pub frames: usize,
    /// Scroll notifications delivered.
    pub notifications: usize,
    /// Attribute writes made by the watcher, including the initial one.
    pub flag_writes: usize,
    /// Flag value after the last event.
    pub final_flag: Option<String>,
}

/// Replay `trace` through a fresh watcher.
pub fn replay(trace: &ScrollTrace, options: &ReplayOptions) -> ScrolldirResult<ReplayReport> {
    let (viewport_height, document_height, frame_rate_hz) = match &trace.header {
        Some(h) => (h.viewport_height, h.document_height, h.frame_rate_hz),
        None => (
            options.defaults.viewport_height,
            options.defaults.document_height,
            options.defaults.frame_rate_hz,
        ),
    };

    let ticks: Rc<RefCell<Vec<ScrollInfo>>> = Rc::default();
    let changes: Rc<RefCell<Vec<ScrollInfo>>> = Rc::default();

    let mut watcher = ScrollDirectionWatcher::new(
        SimulatedViewport::new(viewport_height, document_height),
        AttributeMap::new(),
    );
    let tick_log = ticks.clone();
    let change_log = changes.clone();
    watcher.init(
        WatcherOptions::new()
            .flag_name(options.flag_name.clone())
            .initial_direction(options.initial_direction)
            .tuning(options.tuning)
            .on_tick(move |info| tick_log.borrow_mut().push(*info))
            .on_change(move |info| change_log.borrow_mut().push(*info)),
    )?;

    let clock = FrameClock::new(frame_rate_hz);
    let synthesize_frames = !trace.has_frames();
    let mut next_frame_at: Option<f64> = None;
    let mut frames = 0;
    let mut notifications = 0;

    for event in &trace.events {
        if let Some(at) = next_frame_at {
            if at <= event.timestamp_ms {
                frames += run_frame(&mut watcher)?;
                next_frame_at = None;
            }
        }

        match event.kind {
            TraceEventKind::Scroll { y } => {
                watcher.viewport_mut().set_scroll_y(y);
                if watcher.viewport().is_listening(watcher.listener_id()) {
                    watcher.handle_scroll(event.timestamp_ms)?;
                    notifications += 1;
                }
            }
            TraceEventKind::Frame => {
                frames += run_frame(&mut watcher)?;
            }
            TraceEventKind::Resize {
                viewport_height,
                document_height,
            } => {
                watcher
                    .viewport_mut()
                    .resize(viewport_height, document_height);
            }
        }

        if synthesize_frames && next_frame_at.is_none() && watcher.viewport().has_pending_frame() {
            next_frame_at = Some(clock.next_boundary_after(event.timestamp_ms));
        }
    }

    // Let a frame requested by the last notification run.
    if synthesize_frames && watcher.viewport().has_pending_frame() {
        frames += run_frame(&mut watcher)?;
    }

    let final_flag = watcher
        .target()
        .get(&options.flag_name)
        .map(str::to_string);

    let report = ReplayReport {
        ticks: ticks.take(),
        changes: changes.take(),
        frames,
        notifications,
        flag_writes: watcher.target().writes(),
        final_flag,
    };

    tracing::info!(
        events = trace.events.len(),
        notifications = report.notifications,
        frames = report.frames,
        changes = report.changes.len(),
        "Replay finished"
    );
    Ok(report)
}

/// Run the frame callbacks requested since the last frame. Returns how many
/// callbacks reached the watcher.
fn run_frame(watcher: &mut SimWatcher) -> ScrolldirResult<usize> {
    let id = watcher.listener_id();
    let requests = watcher.viewport_mut().take_frame_requests();
    let mut ran = 0;
    for requested in requests {
        if requested == id {
            watcher.on_animation_frame()?;
            ran += 1;
        }
    }
    Ok(ran)
}

#[cfg(test)]
mod tests {
    use scrolldir_model::{TraceEvent, TraceHeader, TRACE_SCHEMA_VERSION};

    use super::*;

    fn header(frame_rate_hz: u32) -> Option<TraceHeader> {
        Some(TraceHeader {
            schema_version: TRACE_SCHEMA_VERSION.to_string(),
            recorded_at: None,
            viewport_height: 800.0,
            document_height: 2800.0,
            frame_rate_hz,
        })
    }

    #[test]
    fn explicit_frames_process_latest_notification() {
        let trace = ScrollTrace {
            header: header(60),
            events: vec![
                TraceEvent::scroll(1.0, 0.0),
                TraceEvent::scroll(4.0, 100.0),
                TraceEvent::scroll(8.0, 200.0),
                TraceEvent::frame(16.0),
                TraceEvent::frame(32.0),
                TraceEvent::scroll(40.0, 120.0),
                TraceEvent::frame(48.0),
            ],
        };

        let report = replay(&trace, &ReplayOptions::default()).unwrap();
        assert_eq!(report.notifications, 4);
        assert_eq!(report.frames, 2);
        assert_eq!(report.ticks.len(), 2);
        assert_eq!(report.ticks[0].y, 200.0);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].dir, Direction::Up);
        assert_eq!(report.changes[0].y, 120.0);
        assert_eq!(report.final_flag.as_deref(), Some("up"));
        // Initial publish plus the reversal.
        assert_eq!(report.flag_writes, 2);
    }

    #[test]
    fn synthesized_frames_follow_refresh_grid() {
        // 50 Hz: boundaries every 20 ms.
        let trace = ScrollTrace {
            header: header(50),
            events: vec![
                TraceEvent::scroll(1.0, 10.0),
                TraceEvent::scroll(5.0, 20.0),
                TraceEvent::scroll(19.0, 30.0),
                TraceEvent::scroll(21.0, 40.0),
                TraceEvent::scroll(45.0, 50.0),
            ],
        };

        let report = replay(&trace, &ReplayOptions::default()).unwrap();
        let ys: Vec<f64> = report.ticks.iter().map(|t| t.y).collect();
        // Frames at 20 and 40 ms, plus the trailing frame.
        assert_eq!(ys, vec![30.0, 40.0, 50.0]);
        assert_eq!(report.frames, 3);
        assert!(report.changes.is_empty());
        assert_eq!(report.final_flag.as_deref(), Some("down"));
    }

    #[test]
    fn resize_changes_clamping() {
        let trace = ScrollTrace {
            header: header(60),
            events: vec![
                TraceEvent::resize(0.0, 800.0, 1000.0),
                TraceEvent::scroll(1.0, 900.0),
                TraceEvent::frame(16.0),
            ],
        };
        let report = replay(&trace, &ReplayOptions::default()).unwrap();
        assert_eq!(report.ticks[0].y, 200.0);
        assert_eq!(report.ticks[0].y_max, 200.0);
        assert_eq!(report.ticks[0].y_bottom, 1000.0);
    }

    #[test]
    fn resize_shrinking_document_is_not_a_reversal() {
        let trace = ScrollTrace {
            header: header(60),
            events: vec![
                TraceEvent::scroll(1.0, 2000.0),
                TraceEvent::frame(16.0),
                TraceEvent::resize(20.0, 800.0, 1000.0),
                TraceEvent::scroll(24.0, 2000.0),
                TraceEvent::frame(32.0),
            ],
        };
        let report = replay(&trace, &ReplayOptions::default()).unwrap();
        let ys: Vec<f64> = report.ticks.iter().map(|t| t.y).collect();
        assert_eq!(ys, vec![2000.0, 200.0]);
        assert!(report.changes.is_empty());
        assert_eq!(report.flag_writes, 1);
        assert_eq!(report.final_flag.as_deref(), Some("down"));
    }

    #[test]
    fn headerless_trace_uses_defaults() {
        let trace = ScrollTrace {
            header: None,
            events: vec![TraceEvent::scroll(0.0, 5000.0)],
        };
        let options = ReplayOptions {
            initial_direction: Direction::Up,
            flag_name: "data-dir".to_string(),
            ..Default::default()
        };
        let report = replay(&trace, &options).unwrap();
        assert_eq!(report.ticks.len(), 1);
        assert_eq!(report.ticks[0].y_max, 2000.0);
        assert_eq!(report.final_flag.as_deref(), Some("up"));
    }

    #[test]
    fn report_serializes_payload_names() {
        let trace = ScrollTrace {
            header: header(60),
            events: vec![TraceEvent::scroll(0.0, 10.0)],
        };
        let report = replay(&trace, &ReplayOptions::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ticks"][0]["yMax"], 2000.0);
        assert_eq!(json["final_flag"], "down");
    }
}
