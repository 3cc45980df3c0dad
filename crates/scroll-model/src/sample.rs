//! Scroll samples and the watcher callback payload.

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::metrics::ScrollMetrics;

/// Milliseconds since the page's time origin.
pub type TimestampMs = f64;

/// One clamped scroll reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub position: f64,
    pub timestamp: TimestampMs,
}

impl Sample {
    pub fn new(position: f64, timestamp: TimestampMs) -> Self {
        Self {
            position,
            timestamp,
        }
    }
}

/// Payload handed to tick and change callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollInfo {
    /// Direction when the payload was built. Ticks carry the direction in
    /// effect before the sample was judged; changes carry the new one.
    pub dir: Direction,
    /// Clamped scroll offset.
    pub y: f64,
    /// Maximum scrollable offset.
    #[serde(rename = "yMax")]
    pub y_max: f64,
    /// Bottom edge of the visible area (`y + viewport height`).
    #[serde(rename = "yBottom")]
    pub y_bottom: f64,
}

impl ScrollInfo {
    pub fn from_metrics(dir: Direction, metrics: &ScrollMetrics) -> Self {
        Self {
            dir,
            y: metrics.clamped_y(),
            y_max: metrics.y_max(),
            y_bottom: metrics.y_bottom(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_field_names() {
        let metrics = ScrollMetrics::new(130.0, 800.0, 2800.0);
        let info = ScrollInfo::from_metrics(Direction::Up, &metrics);
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(
            json,
            r#"{"dir":"up","y":130.0,"yMax":2000.0,"yBottom":930.0}"#
        );
    }
}
