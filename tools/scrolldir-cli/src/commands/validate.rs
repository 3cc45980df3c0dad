//! Validate a scroll trace.

use std::path::PathBuf;

use scrolldir_model::validate_trace;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating trace at: {}", path.display());

    let trace = super::load_trace(&path)?;

    match &trace.header {
        Some(h) => {
            println!("  Schema: {}", h.schema_version);
            if let Some(at) = &h.recorded_at {
                println!("  Recorded: {at}");
            }
            println!(
                "  Viewport: {} px in a {} px document @ {} Hz",
                h.viewport_height, h.document_height, h.frame_rate_hz
            );
        }
        None => println!("  Header: missing (replay will use configured defaults)"),
    }
    println!("  Events: {}", trace.events.len());
    println!("  Scroll notifications: {}", trace.scroll_count());
    println!("  Explicit frames: {}", if trace.has_frames() { "yes" } else { "no" });
    println!("  Duration: {:.1} ms", trace.duration_ms());

    let issues = validate_trace(&trace);
    if issues.is_empty() {
        println!("\nTrace is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Replay results may be meaningless.",
            issues.len()
        );
    }

    Ok(())
}
