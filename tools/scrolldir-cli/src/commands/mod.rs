pub mod config;
pub mod replay;
pub mod synth;
pub mod validate;

use std::path::Path;

use scrolldir_model::{read_trace, ScrollTrace};

/// Read and parse a trace file.
///
/// A missing file, an unreadable one and a malformed line each keep their
/// own message.
pub(crate) fn load_trace(path: &Path) -> anyhow::Result<ScrollTrace> {
    read_trace(path).map_err(|e| anyhow::anyhow!("Failed to load trace: {e}"))
}
