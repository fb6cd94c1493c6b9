// src/pipeline/mod.rs

pub mod metrics;
pub mod publisher;

pub use metrics::{MetricsSummary, PipelineMetrics};
pub use publisher::WaypointPublisher;
