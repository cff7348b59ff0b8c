use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::face_landmarks::FaceLandmarks;
use crate::shared::frame::Frame;
use crate::shared::image_codec::ImageCodecError;

/// Failure to obtain an answer from the landmark detector.
///
/// Distinct from "no face": a miss is a successful [`Detection`] with
/// `face_detected == false`.
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("landmark detector unreachable at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("landmark detector at {url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("malformed landmark detector response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("landmark topology mismatch: expected {expected} points, got {actual}")]
    Topology { expected: usize, actual: usize },
    #[error("failed to read recorded detection {path}: {source}")]
    Recording {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to prepare image for detection: {0}")]
    Encode(#[source] ImageCodecError),
}

/// Detector answer: a flag plus zero or N ordered landmarks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub face_detected: bool,
    #[serde(default)]
    pub landmarks: FaceLandmarks,
}

impl Detection {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn hit(landmarks: FaceLandmarks) -> Self {
        Self {
            face_detected: true,
            landmarks,
        }
    }

    /// A detection only counts as a face when it carries landmarks.
    pub fn has_face(&self) -> bool {
        self.face_detected && !self.landmarks.is_empty()
    }
}

/// Domain interface for the external facial-landmark capability.
pub trait LandmarkDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Detection, DetectionError>;
}
