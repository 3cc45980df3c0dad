//! Recorded scroll traces.
//!
//! Traces are JSONL: an optional `# {header}` comment line followed by one
//! event per line. They let the watcher be replayed deterministically
//! outside a browser.

use std::path::Path;

use serde::{Deserialize, Serialize};

use scrolldir_common::error::{ScrolldirError, ScrolldirResult};

use crate::sample::TimestampMs;

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

/// A single recorded event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Milliseconds since the page's time origin.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// Discriminated union of trace event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// Native scroll notification with the raw offset at that moment.
    Scroll {
        /// Raw scroll offset, may be outside the document (overscroll).
        y: f64,
    },

    /// Animation frame callback slot.
    Frame,

    /// Viewport or document size change.
    Resize {
        viewport_height: f64,
        document_height: f64,
    },
}

/// Trace metadata written as the leading comment line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time the trace was recorded or generated (RFC 3339).
    #[serde(default)]
    pub recorded_at: Option<String>,

    /// Initial viewport height.
    pub viewport_height: f64,

    /// Initial document height.
    pub document_height: f64,

    /// Refresh rate used when the trace carries no frame events.
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: u32,
}

fn default_frame_rate_hz() -> u32 {
    60
}

/// A parsed trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTrace {
    pub header: Option<TraceHeader>,
    pub events: Vec<TraceEvent>,
}

impl TraceEvent {
    /// Create a scroll event.
    pub fn scroll(timestamp_ms: TimestampMs, y: f64) -> Self {
        Self {
            timestamp_ms,
            kind: TraceEventKind::Scroll { y },
        }
    }

    /// Create a frame event.
    pub fn frame(timestamp_ms: TimestampMs) -> Self {
        Self {
            timestamp_ms,
            kind: TraceEventKind::Frame,
        }
    }

    /// Create a resize event.
    pub fn resize(timestamp_ms: TimestampMs, viewport_height: f64, document_height: f64) -> Self {
        Self {
            timestamp_ms,
            kind: TraceEventKind::Resize {
                viewport_height,
                document_height,
            },
        }
    }
}

impl ScrollTrace {
    /// Whether the trace carries explicit frame events.
    pub fn has_frames(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e.kind, TraceEventKind::Frame))
    }

    /// Number of scroll notifications.
    pub fn scroll_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, TraceEventKind::Scroll { .. }))
            .count()
    }

    /// Time between first and last event (ms).
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }
}

/// Parse a full trace, including the optional header line.
pub fn parse_trace(content: &str) -> ScrolldirResult<ScrollTrace> {
    let mut header = None;
    let mut events = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            let comment = comment.trim();
            if header.is_none() && events.is_empty() && comment.starts_with('{') {
                let parsed: TraceHeader = serde_json::from_str(comment)
                    .map_err(|e| ScrolldirError::trace(line_no, format!("bad header: {e}")))?;
                header = Some(parsed);
            }
            continue;
        }
        let event: TraceEvent = serde_json::from_str(trimmed)
            .map_err(|e| ScrolldirError::trace(line_no, e.to_string()))?;
        events.push(event);
    }

    Ok(ScrollTrace { header, events })
}

/// Read and parse a trace file.
pub fn read_trace(path: &Path) -> ScrolldirResult<ScrollTrace> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScrolldirError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ScrolldirError::Io(e),
    })?;
    parse_trace(&content)
}

/// Serialize a trace to JSONL, header first.
pub fn serialize_trace(trace: &ScrollTrace) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    if let Some(header) = &trace.header {
        output.push_str("# ");
        output.push_str(&serde_json::to_string(header)?);
        output.push('\n');
    }
    for event in &trace.events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

/// Check a trace for problems that would make a replay meaningless.
///
/// Returns one message per issue; an empty list means the trace is usable.
pub fn validate_trace(trace: &ScrollTrace) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(header) = &trace.header {
        if header.schema_version != TRACE_SCHEMA_VERSION {
            issues.push(format!(
                "unsupported schema version {:?}",
                header.schema_version
            ));
        }
        if !(header.viewport_height > 0.0 && header.document_height > 0.0) {
            issues.push("header dimensions must be positive".to_string());
        }
        if header.frame_rate_hz == 0 {
            issues.push("header frame_rate_hz must be non-zero".to_string());
        }
    }

    let mut prev: Option<f64> = None;
    for (idx, event) in trace.events.iter().enumerate() {
        if !event.timestamp_ms.is_finite() {
            issues.push(format!("event {idx}: timestamp is not finite"));
            continue;
        }
        if let Some(p) = prev {
            if event.timestamp_ms < p {
                issues.push(format!(
                    "event {idx}: timestamp {} precedes previous {}",
                    event.timestamp_ms, p
                ));
            }
        }
        prev = Some(event.timestamp_ms);

        match event.kind {
            TraceEventKind::Scroll { y } if !y.is_finite() => {
                issues.push(format!("event {idx}: scroll offset is not finite"));
            }
            TraceEventKind::Resize {
                viewport_height,
                document_height,
            } if !(viewport_height > 0.0 && document_height > 0.0) => {
                issues.push(format!("event {idx}: resize dimensions must be positive"));
            }
            _ => {}
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> TraceHeader {
        TraceHeader {
            schema_version: TRACE_SCHEMA_VERSION.to_string(),
            recorded_at: None,
            viewport_height: 800.0,
            document_height: 2800.0,
            frame_rate_hz: 60,
        }
    }

    #[test]
    fn test_json_format() {
        let event = TraceEvent::scroll(16.5, 120.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":16.5"));
        assert!(json.contains("\"type\":\"scroll\""));
        assert!(json.contains("\"y\":120.0"));

        let frame = serde_json::to_string(&TraceEvent::frame(33.0)).unwrap();
        assert_eq!(frame, r#"{"t":33.0,"type":"frame"}"#);
    }

    #[test]
    fn test_trace_roundtrip_keeps_header() {
        let trace = ScrollTrace {
            header: Some(header()),
            events: vec![
                TraceEvent::scroll(0.0, 0.0),
                TraceEvent::frame(16.0),
                TraceEvent::resize(20.0, 700.0, 3000.0),
            ],
        };
        let jsonl = serialize_trace(&trace).unwrap();
        assert!(jsonl.starts_with("# {"));
        assert_eq!(parse_trace(&jsonl).unwrap(), trace);
    }

    #[test]
    fn test_parse_trace_skips_comments_and_blank_lines() {
        let content = "# {\"schema_version\":\"1.0\",\"viewport_height\":800,\"document_height\":2800}\n\n{\"t\":4.0,\"type\":\"scroll\",\"y\":10}\n# paused here\n";
        let trace = parse_trace(content).unwrap();
        assert!(trace.header.is_some());
        assert_eq!(trace.events, vec![TraceEvent::scroll(4.0, 10.0)]);
    }

    #[test]
    fn test_read_trace_reports_missing_file() {
        let path = Path::new("/definitely/not/here/trace.jsonl");
        match read_trace(path) {
            Err(ScrolldirError::FileNotFound { path: missing }) => assert_eq!(missing, path),
            other => panic!("expected missing file, got {other:?}"),
        }
    }

    #[test]
    fn test_read_trace_passes_other_io_errors() {
        // A directory exists but cannot be read as a file.
        let dir = std::env::temp_dir();
        assert!(matches!(read_trace(&dir), Err(ScrolldirError::Io(_))));
    }

    #[test]
    fn test_parse_trace_reports_line_number() {
        let content = "{\"t\":0,\"type\":\"scroll\",\"y\":0}\n{\"t\":1,\"type\":\"wheel\"}\n";
        match parse_trace(content) {
            Err(ScrolldirError::Trace { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected trace error, got {other:?}"),
        }
    }

    #[test]
    fn test_header_frame_rate_defaults() {
        let content = "# {\"schema_version\":\"1.0\",\"viewport_height\":800,\"document_height\":2800}\n";
        let trace = parse_trace(content).unwrap();
        assert_eq!(trace.header.unwrap().frame_rate_hz, 60);
        assert!(trace.events.is_empty());
    }

    #[test]
    fn test_validate_flags_backwards_time() {
        let trace = ScrollTrace {
            header: Some(header()),
            events: vec![
                TraceEvent::scroll(10.0, 0.0),
                TraceEvent::scroll(5.0, 20.0),
                TraceEvent::resize(12.0, 0.0, 100.0),
            ],
        };
        let issues = validate_trace(&trace);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("precedes"));
        assert!(issues[1].contains("resize"));
    }

    #[test]
    fn test_trace_summary() {
        let trace = ScrollTrace {
            header: None,
            events: vec![
                TraceEvent::scroll(10.0, 0.0),
                TraceEvent::frame(16.0),
                TraceEvent::scroll(30.0, 20.0),
            ],
        };
        assert!(trace.has_frames());
        assert_eq!(trace.scroll_count(), 2);
        assert!((trace.duration_ms() - 20.0).abs() < 1e-9);
        assert!(validate_trace(&trace).is_empty());
    }
}
