// src/pipeline/metrics.rs
//
// Pipeline observability. Tracks frame admission, classifier usage and
// publish counts; export via logs at the end of a run.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub frames_received: u64,
    pub frames_accepted: u64,
    pub frames_dropped: u64,
    pub classifications: u64,
    pub publishes: u64,
    pub red_confirmations: u64,
    pub started_at: Instant,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            frames_received: 0,
            frames_accepted: 0,
            frames_dropped: 0,
            classifications: 0,
            publishes: 0,
            red_confirmations: 0,
            started_at: Instant::now(),
        }
    }

    /// Accepted-frame rate since startup.
    pub fn effective_fps(&self) -> f64 {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            self.frames_accepted as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            frames_received: self.frames_received,
            frames_accepted: self.frames_accepted,
            frames_dropped: self.frames_dropped,
            classifications: self.classifications,
            publishes: self.publishes,
            red_confirmations: self.red_confirmations,
            effective_fps: self.effective_fps(),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub frames_received: u64,
    pub frames_accepted: u64,
    pub frames_dropped: u64,
    pub classifications: u64,
    pub publishes: u64,
    pub red_confirmations: u64,
    pub effective_fps: f64,
    pub elapsed_secs: f64,
}
