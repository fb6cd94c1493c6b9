// src/main.rs

mod classifier;
mod config;
mod detection;
mod detector;
mod pipeline;
mod replay;
mod types;
mod world;

use anyhow::Result;
use replay::ScenarioRunner;
use tracing::{error, info};
use types::Config;

fn main() -> Result<()> {
    let config = Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "traffic_light_detection={}",
            config.logging.level
        ))
        .init();

    info!("🚦 Traffic Light Detection Pipeline Starting");
    info!("✓ Configuration loaded");
    info!(
        "Look-ahead window: {:.0}-{:.0} m, min frame interval: {:.2} s, site mode: {}",
        config.detection.min_look_ahead,
        config.detection.max_look_ahead,
        config.detection.min_frame_interval,
        config.site.is_site
    );

    let runner = ScenarioRunner::new(config.clone());
    let scenario_files = runner.find_scenario_files()?;

    if scenario_files.is_empty() {
        error!(
            "No scenario files found in {}",
            config.replay.scenario_dir
        );
        return Ok(());
    }

    info!("Found {} scenario file(s) to replay", scenario_files.len());

    for (idx, path) in scenario_files.iter().enumerate() {
        info!(
            "Replaying scenario {}/{}: {}",
            idx + 1,
            scenario_files.len(),
            path.display()
        );

        match runner.run_file(path) {
            Ok(outcome) => {
                let summary = &outcome.summary;
                info!("✓ Scenario complete: {}", outcome.name);
                info!(
                    "  Frames: {} received, {} accepted, {} dropped",
                    summary.frames_received, summary.frames_accepted, summary.frames_dropped
                );
                info!("  Classifier invocations: {}", summary.classifications);
                info!(
                    "  Publishes: {} ({} red stop confirmations)",
                    summary.publishes, summary.red_confirmations
                );

                match outcome.published.iter().rev().find(|&&wp| wp >= 0) {
                    Some(waypoint) => info!("  🔴 Stop waypoint: {}", waypoint),
                    None => info!("  🟢 No stop required"),
                }
                info!("  Processing speed: {:.1} FPS", summary.effective_fps);
            }
            Err(e) => {
                error!("Failed to replay {}: {e:#}", path.display());
            }
        }
    }

    Ok(())
}
