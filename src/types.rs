// src/types.rs

use nalgebra::{Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub detection: DetectionConfig,
    pub stop_lines: StopLineConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub is_site: bool,
    /// Fixed stop position used instead of live light geometry when `is_site` is set.
    pub stop_position: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub min_look_ahead: f64,
    pub max_look_ahead: f64,
    /// Minimum spacing between accepted camera frames, in seconds.
    pub min_frame_interval: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopLineConfig {
    pub positions: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub scenario_dir: String,
    pub max_pending_outputs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Latest vehicle pose as reported by localization.
#[derive(Debug, Clone)]
pub struct Pose {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    /// Heading around the map z axis, extracted from the orientation quaternion.
    pub fn yaw(&self) -> f64 {
        self.orientation.euler_angles().2
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

/// One known traffic light from the registry snapshot. The color is only
/// populated in simulation-like contexts that report ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficLight {
    pub x: f64,
    pub y: f64,
    pub color: Option<LightColor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightColor {
    Red,
    Yellow,
    Green,
    Unknown,
    /// No relevant light in the look-ahead window this frame.
    NoLight,
}

/// Waypoint sentinel published while no red light demands a stop.
pub const NO_STOP_WAYPOINT: i32 = -1;

/// Undecoded camera frame. Image decoding lives outside this crate, so the
/// payload is opaque bytes; only the timestamp is interpreted here.
#[derive(Debug, Clone)]
pub struct Frame {
    pub seq: u64,
    pub timestamp: f64,
    pub data: Vec<u8>,
}
