use crate::detection::domain::landmark_detector::{Detection, DetectionError, LandmarkDetector};
use crate::shared::frame::Frame;

/// Decorator that rejects detections whose landmark count differs from the
/// topology the named regions were written against.
///
/// Misses pass through untouched; only a face with the wrong number of
/// points is turned into [`DetectionError::Topology`].
pub struct TopologyCheckedDetector {
    inner: Box<dyn LandmarkDetector>,
    expected: usize,
}

impl TopologyCheckedDetector {
    pub fn new(inner: Box<dyn LandmarkDetector>, expected: usize) -> Self {
        Self { inner, expected }
    }
}

impl LandmarkDetector for TopologyCheckedDetector {
    fn detect(&self, frame: &Frame) -> Result<Detection, DetectionError> {
        let detection = self.inner.detect(frame)?;
        if detection.has_face() && detection.landmarks.len() != self.expected {
            log::warn!(
                "Detector returned {} landmarks, expected {}",
                detection.landmarks.len(),
                self.expected
            );
            return Err(DetectionError::Topology {
                expected: self.expected,
                actual: detection.landmarks.len(),
            });
        }
        Ok(detection)
    }
}
