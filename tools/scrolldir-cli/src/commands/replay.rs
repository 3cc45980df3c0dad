//! Replay a trace through the scroll direction watcher.

use std::path::PathBuf;

use scrolldir_common::clock::PageClock;
use scrolldir_common::config::AppConfig;
use scrolldir_model::{validate_trace, Direction};
use scrolldir_watcher::replay::{replay, ReplayOptions};
use scrolldir_watcher::WatcherTuning;

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    json: bool,
    direction: Option<String>,
    threshold: Option<f64>,
    max_age: Option<f64>,
) -> anyhow::Result<()> {
    let trace = super::load_trace(&path)?;

    for issue in validate_trace(&trace) {
        tracing::warn!(path = %path.display(), "{issue}");
    }

    let options = replay_options(config, direction, threshold, max_age)?;
    let tuning = options.tuning;

    let clock = PageClock::start();
    let report = replay(&trace, &options)
        .map_err(|e| anyhow::anyhow!("Replay failed: {e}"))?;
    tracing::debug!(elapsed_ms = clock.elapsed_ms(), "Replay timing");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Replaying trace at: {}", path.display());
    println!(
        "  Events: {} ({} scroll notifications, {:.0} ms)",
        trace.events.len(),
        report.notifications,
        trace.duration_ms()
    );
    println!(
        "  Frames: {} ({})",
        report.frames,
        if trace.has_frames() {
            "from trace"
        } else {
            "synthesized"
        }
    );
    println!("  Ticks: {}", report.ticks.len());
    println!(
        "  Tuning: threshold {} px, max age {} ms",
        tuning.threshold_px, tuning.history_max_age_ms
    );
    println!();

    if report.changes.is_empty() {
        println!("No direction changes.");
    } else {
        println!("Direction changes:");
        for change in &report.changes {
            println!(
                "  -> {:<4} y={:.0} (max {:.0}, bottom {:.0})",
                change.dir.as_str(),
                change.y,
                change.y_max,
                change.y_bottom
            );
        }
    }

    println!();
    println!(
        "Final {}: {} ({} attribute writes)",
        options.flag_name,
        report.final_flag.as_deref().unwrap_or("(unset)"),
        report.flag_writes
    );

    Ok(())
}

/// Merge command-line overrides into the configured replay settings.
///
/// Overrides go through the same checks as the config file.
fn replay_options(
    config: &AppConfig,
    direction: Option<String>,
    threshold: Option<f64>,
    max_age: Option<f64>,
) -> anyhow::Result<ReplayOptions> {
    let mut config = config.clone();
    if let Some(direction) = direction {
        config.watcher.initial_direction = direction;
    }
    if let Some(px) = threshold {
        config.watcher.threshold_px = px;
    }
    if let Some(ms) = max_age {
        config.watcher.history_max_age_ms = ms;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid option: {e}"))?;

    let initial_direction: Direction = config
        .watcher
        .initial_direction
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid --direction: {e}"))?;

    Ok(ReplayOptions {
        flag_name: config.watcher.flag_name.clone(),
        initial_direction,
        tuning: WatcherTuning::from(&config.watcher),
        defaults: config.replay.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_configured_tuning() {
        let options = replay_options(
            &AppConfig::default(),
            Some("up".to_string()),
            Some(32.0),
            Some(250.0),
        )
        .unwrap();
        assert_eq!(options.initial_direction, Direction::Up);
        assert_eq!(options.tuning.threshold_px, 32.0);
        assert_eq!(options.tuning.history_max_age_ms, 250.0);
        assert_eq!(options.flag_name, "data-scrolldir");
    }

    #[test]
    fn non_finite_or_negative_overrides_are_rejected() {
        let config = AppConfig::default();
        let err = replay_options(&config, None, Some(f64::NAN), None).unwrap_err();
        assert!(err.to_string().contains("watcher.threshold_px"));
        assert!(replay_options(&config, None, Some(-1.0), None).is_err());
        assert!(replay_options(&config, None, None, Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn unknown_direction_is_rejected() {
        let err = replay_options(&AppConfig::default(), Some("left".to_string()), None, None)
            .unwrap_err();
        assert!(err.to_string().contains("--direction"));
    }
}
