//! Write a deterministic synthetic trace.
//!
//! The trace flings to the bottom with overscroll, jitters there, flings
//! back to the top with overscroll, pauses, then nudges down again.

use std::path::PathBuf;

use scrolldir_common::clock::PageClock;
use scrolldir_common::config::AppConfig;
use scrolldir_model::{serialize_trace, ScrollTrace, TraceEvent, TraceHeader, TRACE_SCHEMA_VERSION};

/// Gap between synthetic scroll notifications, about two per 60 Hz frame.
const EVENT_INTERVAL_MS: f64 = 8.0;

/// Rubber-band distance past either edge.
const OVERSCROLL_PX: f64 = 60.0;

pub fn run(
    config: &AppConfig,
    output: PathBuf,
    viewport: Option<f64>,
    document: Option<f64>,
    fps: Option<u32>,
) -> anyhow::Result<()> {
    let viewport_height = viewport.unwrap_or(config.replay.viewport_height);
    let document_height = document.unwrap_or(config.replay.document_height);
    let frame_rate_hz = fps.unwrap_or(config.replay.frame_rate_hz);
    if !(viewport_height > 0.0 && document_height > 0.0) || frame_rate_hz == 0 {
        anyhow::bail!("Viewport, document and fps must be positive");
    }

    let clock = PageClock::start();
    let trace = synthesize(
        viewport_height,
        document_height,
        frame_rate_hz,
        Some(clock.epoch_wall().to_string()),
    );

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&output, serialize_trace(&trace)?)?;

    println!("Wrote synthetic trace to: {}", output.display());
    println!("  Events: {}", trace.events.len());
    println!("  Duration: {:.0} ms", trace.duration_ms());
    Ok(())
}

/// Build the synthetic trace for the given page geometry.
pub fn synthesize(
    viewport_height: f64,
    document_height: f64,
    frame_rate_hz: u32,
    recorded_at: Option<String>,
) -> ScrollTrace {
    let y_max = (document_height - viewport_height).max(0.0);
    let mut events = Vec::new();
    let mut t = 0.0;

    glide(&mut events, &mut t, 0.0, y_max + OVERSCROLL_PX, 1_200.0);
    glide(&mut events, &mut t, y_max + OVERSCROLL_PX, y_max, 160.0);
    jitter(&mut events, &mut t, y_max, 12.0, 600.0);
    glide(&mut events, &mut t, y_max, -OVERSCROLL_PX, 1_000.0);
    glide(&mut events, &mut t, -OVERSCROLL_PX, 0.0, 120.0);
    t += 400.0;
    glide(&mut events, &mut t, 0.0, 200.0_f64.min(y_max), 300.0);

    ScrollTrace {
        header: Some(TraceHeader {
            schema_version: TRACE_SCHEMA_VERSION.to_string(),
            recorded_at,
            viewport_height,
            document_height,
            frame_rate_hz,
        }),
        events,
    }
}

/// Ease-out (cubic) movement from `from` to `to`, like momentum scrolling.
fn glide(events: &mut Vec<TraceEvent>, t: &mut f64, from: f64, to: f64, duration_ms: f64) {
    let steps = (duration_ms / EVENT_INTERVAL_MS).ceil().max(1.0) as usize;
    for k in 1..=steps {
        let p = k as f64 / steps as f64;
        let eased = 1.0 - (1.0 - p).powi(3);
        *t += EVENT_INTERVAL_MS;
        events.push(TraceEvent::scroll(*t, from + (to - from) * eased));
    }
}

/// Small back-and-forth just above `around`, never past it.
fn jitter(events: &mut Vec<TraceEvent>, t: &mut f64, around: f64, amplitude: f64, duration_ms: f64) {
    let steps = (duration_ms / EVENT_INTERVAL_MS).ceil() as usize;
    for k in 1..=steps {
        *t += EVENT_INTERVAL_MS;
        let y = around - amplitude * (k as f64 * 0.9).sin().abs();
        events.push(TraceEvent::scroll(*t, y.max(0.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrolldir_model::{validate_trace, Direction};
    use scrolldir_watcher::replay::{replay, ReplayOptions};

    #[test]
    fn synthetic_trace_is_valid_and_reverses_twice() {
        let trace = synthesize(800.0, 2800.0, 60, None);
        assert!(validate_trace(&trace).is_empty());

        let report = replay(&trace, &ReplayOptions::default()).unwrap();
        let dirs: Vec<Direction> = report.changes.iter().map(|c| c.dir).collect();
        assert_eq!(dirs, vec![Direction::Up, Direction::Down]);
        assert!(report.ticks.len() < report.notifications);
    }
}
