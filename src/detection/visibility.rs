// src/detection/visibility.rs

use crate::types::{Pose, TrafficLight};
use tracing::debug;

/// Distance range within which a light is relevant to the current decision cycle.
#[derive(Debug, Clone, Copy)]
pub struct LookAheadWindow {
    pub min: f64,
    pub max: f64,
}

/// Pick the upcoming traffic light, if any.
///
/// Scans the registry in received order and returns the FIRST light that is
/// inside the look-ahead window and ahead of the vehicle. Registry order is
/// a contract here: a closer light later in the snapshot does not win.
pub fn select_upcoming_light<'a>(
    pose: &Pose,
    lights: &'a [TrafficLight],
    window: LookAheadWindow,
) -> Option<&'a TrafficLight> {
    let x = pose.position.x;
    let y = pose.position.y;

    // Probe point one unit ahead along the heading.
    let theta = pose.yaw();
    let x_in_front = x + theta.cos();
    let y_in_front = y + theta.sin();

    // Coordinate-sum proxy for heading agreement, not a real dot product.
    let car_orient = (x_in_front - x) + (y_in_front - y);

    for light in lights {
        let light_distance = ((light.x - x).powi(2) + (light.y - y).powi(2)).sqrt();
        let light_orient = (light.x - x) + (light.y - y);

        if light_distance < window.max
            && light_distance > window.min
            && car_orient * light_orient > 1.0
        {
            debug!(
                "Light selected at ({:.1}, {:.1}), distance {:.1}",
                light.x, light.y, light_distance
            );
            return Some(light);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, UnitQuaternion};

    fn pose_at(x: f64, y: f64, yaw: f64) -> Pose {
        Pose {
            position: Point3::new(x, y, 0.0),
            orientation: UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
        }
    }

    fn light_at(x: f64, y: f64) -> TrafficLight {
        TrafficLight { x, y, color: None }
    }

    const WINDOW: LookAheadWindow = LookAheadWindow { min: 25.0, max: 100.0 };

    #[test]
    fn test_light_beyond_max_look_ahead_never_selected() {
        let lights = vec![light_at(150.0, 0.0)];

        for yaw in [0.0, 0.7854, 1.5708, 3.1416, -1.5708] {
            let pose = pose_at(0.0, 0.0, yaw);
            assert!(select_upcoming_light(&pose, &lights, WINDOW).is_none());
        }
    }

    #[test]
    fn test_light_inside_min_look_ahead_not_selected() {
        // Already at the intersection; the stop decision was made earlier.
        let pose = pose_at(0.0, 0.0, 0.0);
        let lights = vec![light_at(10.0, 0.0)];

        assert!(select_upcoming_light(&pose, &lights, WINDOW).is_none());
    }

    #[test]
    fn test_light_ahead_in_window_selected() {
        let pose = pose_at(0.0, 0.0, 0.0);
        let lights = vec![light_at(50.0, 0.0)];

        let selected = select_upcoming_light(&pose, &lights, WINDOW).unwrap();
        assert_eq!(selected.x, 50.0);
    }

    #[test]
    fn test_light_behind_vehicle_rejected() {
        // Heading +x, light at -x: orientation product is negative.
        let pose = pose_at(0.0, 0.0, 0.0);
        let lights = vec![light_at(-50.0, 0.0)];

        assert!(select_upcoming_light(&pose, &lights, WINDOW).is_none());
    }

    #[test]
    fn test_first_qualifying_light_wins_over_closer_one() {
        let pose = pose_at(0.0, 0.0, 0.0);
        // Both qualify; the second is closer but the first is kept.
        let lights = vec![light_at(90.0, 0.0), light_at(30.0, 0.0)];

        let selected = select_upcoming_light(&pose, &lights, WINDOW).unwrap();
        assert_eq!(selected.x, 90.0);
    }

    #[test]
    fn test_empty_registry_finds_nothing() {
        let pose = pose_at(0.0, 0.0, 0.0);
        assert!(select_upcoming_light(&pose, &[], WINDOW).is_none());
    }
}
