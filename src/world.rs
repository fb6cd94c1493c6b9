// src/world.rs
//
// Single source of truth for the asynchronously updated inputs.
// Every frame reads from the same state instead of stale cached values.

use crate::types::{Pose, TrafficLight, Waypoint};
use tracing::{debug, info, warn};

/// Latest vehicle pose; overwritten wholesale on every update.
#[derive(Debug, Default)]
pub struct PoseStore {
    pose: Option<Pose>,
}

impl PoseStore {
    pub fn update(&mut self, pose: Pose) {
        self.pose = Some(pose);
    }

    pub fn current(&self) -> Option<&Pose> {
        self.pose.as_ref()
    }
}

/// The planned path. Set exactly once: the first delivery wins and later
/// ones are ignored, so waypoint indices stay valid for the process lifetime.
#[derive(Debug, Default)]
pub struct PathStore {
    waypoints: Option<Vec<Waypoint>>,
}

impl PathStore {
    pub fn set_path(&mut self, waypoints: Vec<Waypoint>) {
        if self.waypoints.is_some() {
            warn!("Ignoring repeated path message ({} waypoints)", waypoints.len());
            return;
        }
        info!("✓ Path received: {} waypoints", waypoints.len());
        self.waypoints = Some(waypoints);
    }

    pub fn has_path(&self) -> bool {
        self.waypoints.is_some()
    }

    /// Index of the waypoint closest to `(x, y)` under the per-axis metric:
    /// a candidate replaces the best one only when BOTH its |dx| and |dy|
    /// improve at once. Intentionally not Euclidean nearest-neighbor.
    pub fn nearest_waypoint(&self, x: f64, y: f64) -> Option<usize> {
        let waypoints = self.waypoints.as_ref()?;

        let mut best_dx = f64::INFINITY;
        let mut best_dy = f64::INFINITY;
        let mut best = None;

        for (index, wp) in waypoints.iter().enumerate() {
            let dx = (x - wp.x).abs();
            let dy = (y - wp.y).abs();
            if dx < best_dx && dy < best_dy {
                best_dx = dx;
                best_dy = dy;
                best = Some(index);
            }
        }

        best
    }
}

/// Known traffic lights. Each snapshot replaces the previous one wholesale,
/// and the received order is part of the contract: the visibility selector
/// takes the first qualifying light, not the closest.
#[derive(Debug, Default)]
pub struct LightRegistry {
    lights: Vec<TrafficLight>,
}

impl LightRegistry {
    pub fn replace(&mut self, lights: Vec<TrafficLight>) {
        debug!("Light registry snapshot: {} lights", lights.len());
        self.lights = lights;
    }

    pub fn lights(&self) -> &[TrafficLight] {
        &self.lights
    }
}
