// src/detection/state_machine.rs

use crate::types::{LightColor, NO_STOP_WAYPOINT};
use tracing::info;

/// Identical raw readings required before a new classification is trusted.
pub const STABLE_COUNT_THRESHOLD: u32 = 3;

/// Debounces the noisy per-frame (waypoint, color) pair into a stable
/// published stop waypoint.
///
/// A new raw color must persist for `STABLE_COUNT_THRESHOLD` consecutive
/// frames before it replaces the confirmed state; until then the previously
/// confirmed output keeps being reasserted so the downstream planner never
/// sees a gap. Single-frame misclassifications therefore never reach the
/// output channel.
pub struct DebounceEngine {
    current_raw: LightColor,
    confirmed: LightColor,
    consecutive: u32,
    last_published_waypoint: i32,
}

impl DebounceEngine {
    pub fn new() -> Self {
        Self {
            current_raw: LightColor::Unknown,
            confirmed: LightColor::Unknown,
            consecutive: 0,
            last_published_waypoint: NO_STOP_WAYPOINT,
        }
    }

    /// Advance the state machine by one accepted frame.
    ///
    /// Returns the waypoint to publish this frame, or `None` on the frame
    /// where the raw color first changes (no emission while the counter
    /// resets).
    pub fn update(&mut self, raw_color: LightColor, raw_waypoint: i32) -> Option<i32> {
        let published = if raw_color != self.current_raw {
            self.consecutive = 0;
            self.current_raw = raw_color;
            None
        } else if self.consecutive >= STABLE_COUNT_THRESHOLD {
            if self.current_raw != self.confirmed {
                info!(
                    "Light state confirmed: {:?} → {:?}",
                    self.confirmed, self.current_raw
                );
                self.confirmed = self.current_raw;
            }
            // Recomputed every stable frame: the stop waypoint tracks the
            // latest raw geometry, not the one seen at confirmation time.
            let waypoint = if raw_color == LightColor::Red {
                raw_waypoint
            } else {
                NO_STOP_WAYPOINT
            };
            self.last_published_waypoint = waypoint;
            Some(waypoint)
        } else {
            Some(self.last_published_waypoint)
        };

        self.consecutive += 1;
        published
    }

    pub fn confirmed_color(&self) -> LightColor {
        self.confirmed
    }
}

impl Default for DebounceEngine {
    fn default() -> Self {
        Self::new()
    }
}
