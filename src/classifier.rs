// src/classifier.rs
//
// Boundary to the external image classifier. The classifier itself is an
// opaque capability; this module owns the frame gate in front of it
// (rate limit + busy guard) and normalizes classifier faults to Unknown.

use crate::types::{Frame, LightColor};
use anyhow::Result;
use tracing::{debug, warn};

/// Opaque color classifier. Implementations may run a neural network, read
/// simulator ground truth, or stub a fixed answer in tests.
pub trait LightClassifier {
    fn classify(&mut self, frame: &Frame) -> Result<LightColor>;
}

/// Wraps the classifier behind a frame gate: frames are accepted at most
/// every `min_interval` seconds and never while a classification is in
/// flight. Rejected frames are dropped, not queued; the next frame
/// self-corrects.
pub struct ClassifierAdapter {
    classifier: Box<dyn LightClassifier>,
    min_interval: f64,
    last_accepted_time: Option<f64>,
    busy: bool,
    current_frame: Option<Frame>,
    invocations: u64,
}

impl ClassifierAdapter {
    pub fn new(classifier: Box<dyn LightClassifier>, min_interval: f64) -> Self {
        Self {
            classifier,
            min_interval,
            last_accepted_time: None,
            busy: false,
            current_frame: None,
            invocations: 0,
        }
    }

    /// Admit a frame into the pipeline, or drop it.
    ///
    /// Caps the effective processing rate at 1 / `min_interval` and refuses
    /// frames that arrive while the classifier is still running.
    pub fn accept(&mut self, frame: Frame) -> bool {
        if self.busy {
            debug!("Frame {} dropped: classifier busy", frame.seq);
            return false;
        }
        if let Some(last) = self.last_accepted_time {
            if frame.timestamp <= last + self.min_interval {
                debug!("Frame {} dropped: rate limit", frame.seq);
                return false;
            }
        }

        self.last_accepted_time = Some(frame.timestamp);
        self.current_frame = Some(frame);
        true
    }

    /// Classify the most recently accepted frame.
    ///
    /// Unknown when no frame has ever been accepted, and Unknown on a
    /// classifier fault: the debounce engine must always receive a
    /// well-formed color.
    pub fn classify_current(&mut self) -> LightColor {
        let Some(frame) = self.current_frame.as_ref() else {
            return LightColor::Unknown;
        };

        self.busy = true;
        self.invocations += 1;
        let color = match self.classifier.classify(frame) {
            Ok(color) => color,
            Err(e) => {
                warn!("Classifier failed on frame {}: {e:#}", frame.seq);
                LightColor::Unknown
            }
        };
        self.busy = false;

        color
    }

    pub fn invocations(&self) -> u64 {
        self.invocations
    }
}

/// Stand-in for the real image classifier: a simulated camera embeds the
/// observed color as the first payload byte, and this decodes it.
pub struct SyntheticClassifier;

impl SyntheticClassifier {
    pub fn encode(color: LightColor) -> Vec<u8> {
        let byte = match color {
            LightColor::Red => 0,
            LightColor::Yellow => 1,
            LightColor::Green => 2,
            LightColor::Unknown | LightColor::NoLight => 4,
        };
        vec![byte]
    }
}

impl LightClassifier for SyntheticClassifier {
    fn classify(&mut self, frame: &Frame) -> Result<LightColor> {
        match frame.data.first().copied() {
            Some(0) => Ok(LightColor::Red),
            Some(1) => Ok(LightColor::Yellow),
            Some(2) => Ok(LightColor::Green),
            _ => Ok(LightColor::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct FixedClassifier(LightColor);

    impl LightClassifier for FixedClassifier {
        fn classify(&mut self, _frame: &Frame) -> Result<LightColor> {
            Ok(self.0)
        }
    }

    struct FailingClassifier;

    impl LightClassifier for FailingClassifier {
        fn classify(&mut self, _frame: &Frame) -> Result<LightColor> {
            bail!("model not loaded")
        }
    }

    fn frame(seq: u64, timestamp: f64) -> Frame {
        Frame {
            seq,
            timestamp,
            data: vec![0],
        }
    }

    #[test]
    fn test_rate_limit_drops_fast_frames() {
        let mut adapter =
            ClassifierAdapter::new(Box::new(FixedClassifier(LightColor::Red)), 0.1);

        assert!(adapter.accept(frame(0, 0.0)));
        // 0.05 s later: under the 0.1 s floor.
        assert!(!adapter.accept(frame(1, 0.05)));
        // Exactly at the floor is still too soon.
        assert!(!adapter.accept(frame(2, 0.1)));
        assert!(adapter.accept(frame(3, 0.11)));
    }

    #[test]
    fn test_first_frame_always_accepted() {
        let mut adapter =
            ClassifierAdapter::new(Box::new(FixedClassifier(LightColor::Green)), 0.1);
        assert!(adapter.accept(frame(0, 123.4)));
    }

    #[test]
    fn test_unknown_before_any_frame() {
        let mut adapter =
            ClassifierAdapter::new(Box::new(FixedClassifier(LightColor::Red)), 0.1);

        assert_eq!(adapter.classify_current(), LightColor::Unknown);
        assert_eq!(adapter.invocations(), 0);
    }

    #[test]
    fn test_classifier_fault_maps_to_unknown() {
        let mut adapter = ClassifierAdapter::new(Box::new(FailingClassifier), 0.1);

        assert!(adapter.accept(frame(0, 0.0)));
        assert_eq!(adapter.classify_current(), LightColor::Unknown);
        assert_eq!(adapter.invocations(), 1);
    }

    #[test]
    fn test_synthetic_classifier_round_trip() {
        let mut classifier = SyntheticClassifier;
        let f = Frame {
            seq: 0,
            timestamp: 0.0,
            data: SyntheticClassifier::encode(LightColor::Yellow),
        };
        assert_eq!(classifier.classify(&f).unwrap(), LightColor::Yellow);
    }

    #[test]
    fn test_empty_payload_classifies_unknown() {
        let mut classifier = SyntheticClassifier;
        let f = Frame {
            seq: 0,
            timestamp: 0.0,
            data: Vec::new(),
        };
        assert_eq!(classifier.classify(&f).unwrap(), LightColor::Unknown);
    }
}
