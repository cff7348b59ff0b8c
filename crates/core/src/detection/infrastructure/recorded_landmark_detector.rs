use std::fs;
use std::path::Path;

use crate::detection::domain::landmark_detector::{Detection, DetectionError, LandmarkDetector};
use crate::shared::frame::Frame;

/// Replays a previously recorded detector answer for every frame.
///
/// Used for offline consultations where the landmarks were captured
/// earlier (same JSON shape as the face service response).
pub struct RecordedLandmarkDetector {
    detection: Detection,
}

impl RecordedLandmarkDetector {
    pub fn new(detection: Detection) -> Self {
        Self { detection }
    }

    pub fn from_path(path: &Path) -> Result<Self, DetectionError> {
        let json = fs::read_to_string(path).map_err(|e| DetectionError::Recording {
            path: path.to_path_buf(),
            source: e,
        })?;
        let detection = serde_json::from_str(&json).map_err(DetectionError::MalformedResponse)?;
        Ok(Self::new(detection))
    }
}

impl LandmarkDetector for RecordedLandmarkDetector {
    fn detect(&self, _frame: &Frame) -> Result<Detection, DetectionError> {
        Ok(self.detection.clone())
    }
}
