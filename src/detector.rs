// src/detector.rs
//
// Orchestrates the per-frame pipeline: visibility selection → stop-line
// lookup → classification → debounce → publish. Input handlers mutate the
// stores; the caller serializes all handler invocations.

use crate::classifier::{ClassifierAdapter, LightClassifier};
use crate::detection::{nearest_stop_line, select_upcoming_light, DebounceEngine, LookAheadWindow};
use crate::pipeline::{MetricsSummary, PipelineMetrics, WaypointPublisher};
use crate::types::{Config, Frame, LightColor, Pose, TrafficLight, Waypoint, NO_STOP_WAYPOINT};
use crate::world::{LightRegistry, PathStore, PoseStore};
use tracing::debug;

pub struct TrafficLightDetector {
    config: Config,
    poses: PoseStore,
    path: PathStore,
    lights: LightRegistry,
    adapter: ClassifierAdapter,
    debounce: DebounceEngine,
    publisher: WaypointPublisher,
    metrics: PipelineMetrics,
}

impl TrafficLightDetector {
    pub fn new(config: Config, classifier: Box<dyn LightClassifier>) -> Self {
        let adapter = ClassifierAdapter::new(classifier, config.detection.min_frame_interval);
        let publisher = WaypointPublisher::new(config.replay.max_pending_outputs);
        Self {
            config,
            poses: PoseStore::default(),
            path: PathStore::default(),
            lights: LightRegistry::default(),
            adapter,
            debounce: DebounceEngine::new(),
            publisher,
            metrics: PipelineMetrics::new(),
        }
    }

    pub fn handle_pose(&mut self, pose: Pose) {
        self.poses.update(pose);
    }

    pub fn handle_path(&mut self, waypoints: Vec<Waypoint>) {
        self.path.set_path(waypoints);
    }

    pub fn handle_lights(&mut self, lights: Vec<TrafficLight>) {
        self.lights.replace(lights);
    }

    /// Run one camera frame through the pipeline.
    ///
    /// Returns the waypoint published this frame: the index of the stop-line
    /// waypoint for a confirmed red light, the no-stop sentinel otherwise,
    /// or `None` when the frame was dropped or the raw state just changed.
    pub fn handle_frame(&mut self, frame: Frame) -> Option<i32> {
        self.metrics.frames_received += 1;

        if !self.adapter.accept(frame) {
            self.metrics.frames_dropped += 1;
            return None;
        }
        self.metrics.frames_accepted += 1;

        let (raw_waypoint, raw_color) = self.process_traffic_lights();
        self.metrics.classifications = self.adapter.invocations();

        let confirmed_before = self.debounce.confirmed_color();
        let published = self.debounce.update(raw_color, raw_waypoint);
        if confirmed_before != LightColor::Red && self.debounce.confirmed_color() == LightColor::Red
        {
            self.metrics.red_confirmations += 1;
        }

        if let Some(waypoint) = published {
            self.publisher.publish(waypoint);
            self.metrics.publishes += 1;
        }
        published
    }

    /// Raw (waypoint, color) observation for the current frame.
    ///
    /// Every missing-input condition collapses to (no stop, no light); the
    /// pipeline never fails mid-frame, it waits for the next update.
    fn process_traffic_lights(&mut self) -> (i32, LightColor) {
        const NOT_FOUND: (i32, LightColor) = (NO_STOP_WAYPOINT, LightColor::NoLight);

        if !self.path.has_path() {
            return NOT_FOUND;
        }

        if self.config.site.is_site {
            // Fixed site geometry: no live light registry on the test lot.
            let [stop_x, stop_y] = self.config.site.stop_position;
            let Some(waypoint) = self.path.nearest_waypoint(stop_x, stop_y) else {
                return NOT_FOUND;
            };
            let color = self.adapter.classify_current();
            return (waypoint as i32, color);
        }

        let Some(pose) = self.poses.current() else {
            return NOT_FOUND;
        };
        let window = LookAheadWindow {
            min: self.config.detection.min_look_ahead,
            max: self.config.detection.max_look_ahead,
        };
        let Some(light) = select_upcoming_light(pose, self.lights.lights(), window) else {
            return NOT_FOUND;
        };
        let light = light.clone();

        let color = self.adapter.classify_current();
        if let Some(truth) = light.color {
            if truth != color {
                debug!("Classifier disagrees with ground truth: {color:?} vs {truth:?}");
            }
        }

        let Some(stop_line) = nearest_stop_line(&light, &self.config.stop_lines.positions) else {
            return NOT_FOUND;
        };
        let Some(waypoint) = self.path.nearest_waypoint(stop_line[0], stop_line[1]) else {
            return NOT_FOUND;
        };

        (waypoint as i32, color)
    }

    /// Drain values published since the last call, oldest first.
    pub fn drain_published(&mut self) -> Vec<i32> {
        self.publisher.drain()
    }

    pub fn classifier_invocations(&self) -> u64 {
        self.adapter.invocations()
    }

    pub fn metrics_summary(&self) -> MetricsSummary {
        self.metrics.summary()
    }
}
