// src/replay.rs
//
// Scenario replay driver. Stands in for the message transport: recorded
// input messages are fed to the detector in order, exactly as a live
// subscriber would deliver them.

use crate::classifier::SyntheticClassifier;
use crate::detector::TrafficLightDetector;
use crate::pipeline::MetricsSummary;
use crate::types::{Config, Frame, LightColor, Pose, TrafficLight, Waypoint};
use anyhow::{Context, Result};
use nalgebra::{Point3, UnitQuaternion};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub messages: Vec<ScenarioMessage>,
}

/// One recorded input message. Order in the file is delivery order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMessage {
    Pose(RecordedPose),
    Path { waypoints: Vec<[f64; 2]> },
    Lights(Vec<TrafficLight>),
    Frame(RecordedFrame),
}

#[derive(Debug, Deserialize)]
pub struct RecordedPose {
    pub position: [f64; 3],
    pub yaw: f64,
}

/// A camera frame as recorded by the simulator: the color the camera saw,
/// re-encoded into a synthetic payload for the classifier stub.
#[derive(Debug, Deserialize)]
pub struct RecordedFrame {
    pub timestamp: f64,
    pub color: LightColor,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub name: String,
    pub published: Vec<i32>,
    pub summary: MetricsSummary,
}

pub struct ScenarioRunner {
    config: Config,
}

impl ScenarioRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn find_scenario_files(&self) -> Result<Vec<PathBuf>> {
        let mut scenarios = Vec::new();

        for entry in WalkDir::new(&self.config.replay.scenario_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if let Some(ext) = path.extension() {
                if matches!(ext.to_str(), Some("yaml") | Some("yml")) {
                    scenarios.push(path.to_path_buf());
                }
            }
        }

        scenarios.sort();
        info!("Found {} scenario files", scenarios.len());
        Ok(scenarios)
    }

    pub fn load_scenario(path: &Path) -> Result<Scenario> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))
    }

    pub fn run_file(&self, path: &Path) -> Result<RunOutcome> {
        let scenario = Self::load_scenario(path)?;
        Ok(self.run(scenario))
    }

    pub fn run(&self, scenario: Scenario) -> RunOutcome {
        let mut detector =
            TrafficLightDetector::new(self.config.clone(), Box::new(SyntheticClassifier));
        let mut frame_seq = 0u64;

        for message in scenario.messages {
            match message {
                ScenarioMessage::Pose(recorded) => {
                    detector.handle_pose(Pose {
                        position: Point3::new(
                            recorded.position[0],
                            recorded.position[1],
                            recorded.position[2],
                        ),
                        orientation: UnitQuaternion::from_euler_angles(0.0, 0.0, recorded.yaw),
                    });
                }
                ScenarioMessage::Path { waypoints } => {
                    detector.handle_path(
                        waypoints
                            .into_iter()
                            .map(|[x, y]| Waypoint { x, y })
                            .collect(),
                    );
                }
                ScenarioMessage::Lights(lights) => {
                    detector.handle_lights(lights);
                }
                ScenarioMessage::Frame(recorded) => {
                    // Published values accumulate in the detector's output
                    // queue and are drained once at the end of the run.
                    let _ = detector.handle_frame(Frame {
                        seq: frame_seq,
                        timestamp: recorded.timestamp,
                        data: SyntheticClassifier::encode(recorded.color),
                    });
                    frame_seq += 1;
                }
            }
        }

        RunOutcome {
            name: scenario.name,
            published: detector.drain_published(),
            summary: detector.metrics_summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    const SCENARIO: &str = r#"
name: diagonal approach
messages:
  - path:
      waypoints: [[0.0, 0.0], [10.0, 10.0], [20.0, 20.0], [30.0, 30.0], [40.0, 40.0], [45.0, 45.0], [50.0, 50.0]]
  - pose:
      position: [0.0, 0.0, 0.0]
      yaw: 0.7854
  - lights:
      - { x: 50.0, y: 50.0, color: red }
  - frame: { timestamp: 0.0, color: red }
  - frame: { timestamp: 0.2, color: red }
  - frame: { timestamp: 0.4, color: red }
  - frame: { timestamp: 0.6, color: red }
"#;

    fn test_config() -> Config {
        Config {
            site: SiteConfig {
                is_site: false,
                stop_position: [8.0, 16.2],
            },
            detection: DetectionConfig {
                min_look_ahead: 25.0,
                max_look_ahead: 100.0,
                min_frame_interval: 0.1,
            },
            stop_lines: StopLineConfig {
                positions: vec![[45.0, 45.0]],
            },
            replay: ReplayConfig {
                scenario_dir: "scenarios".to_string(),
                max_pending_outputs: 64,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn test_scenario_parses() {
        let scenario: Scenario = serde_yaml::from_str(SCENARIO).unwrap();
        assert_eq!(scenario.name, "diagonal approach");
        assert_eq!(scenario.messages.len(), 7);
    }

    #[test]
    fn test_replay_confirms_red_stop() {
        let runner = ScenarioRunner::new(test_config());
        let scenario: Scenario = serde_yaml::from_str(SCENARIO).unwrap();

        let outcome = runner.run(scenario);

        // Stop line (45, 45) is waypoint index 5 of the recorded path.
        assert_eq!(outcome.published, vec![-1, -1, 5]);
        assert_eq!(outcome.summary.frames_accepted, 4);
        assert_eq!(outcome.summary.red_confirmations, 1);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let runner = ScenarioRunner::new(test_config());

        let first = runner.run(serde_yaml::from_str(SCENARIO).unwrap());
        let second = runner.run(serde_yaml::from_str(SCENARIO).unwrap());
        assert_eq!(first.published, second.published);
    }
}
