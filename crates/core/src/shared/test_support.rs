//! Synthetic frames, landmark sets and stub detectors shared by unit tests.

use std::f64::consts::TAU;

use crate::detection::domain::face_landmarks::{FaceLandmarks, FaceMeshRegion, Landmark};
use crate::detection::domain::landmark_detector::{Detection, DetectionError, LandmarkDetector};
use crate::shared::constants::FACE_MESH_LANDMARK_COUNT;
use crate::shared::frame::Frame;

pub const SKIN: [u8; 3] = [200, 160, 140];

/// Center of each synthetic sub-region, normalized.
pub const UNDER_EYE_LEFT_CENTER: (f64, f64) = (0.40, 0.45);
pub const UNDER_EYE_RIGHT_CENTER: (f64, f64) = (0.60, 0.45);
pub const CHEEK_LEFT_CENTER: (f64, f64) = (0.36, 0.56);
pub const CHEEK_RIGHT_CENTER: (f64, f64) = (0.64, 0.56);

/// A full 468-point set: a grid over the central face area, with the
/// named regions pulled to anatomically plausible places.
pub fn face_landmarks() -> FaceLandmarks {
    let cols = 18;
    let rows = FACE_MESH_LANDMARK_COUNT / cols;
    let mut points: Vec<Landmark> = (0..FACE_MESH_LANDMARK_COUNT)
        .map(|i| {
            let col = (i % cols) as f64;
            let row = (i / cols) as f64;
            Landmark::new(
                0.3 + 0.4 * col / (cols - 1) as f64,
                0.2 + 0.6 * row / (rows - 1) as f64,
            )
        })
        .collect();

    place(&mut points, FaceMeshRegion::LowerFace, (0.5, 0.73), (0.12, 0.05));
    place(&mut points, FaceMeshRegion::UpperLip, (0.5, 0.64), (0.05, 0.01));
    place(&mut points, FaceMeshRegion::UnderEyeLeft, UNDER_EYE_LEFT_CENTER, (0.04, 0.015));
    place(&mut points, FaceMeshRegion::UnderEyeRight, UNDER_EYE_RIGHT_CENTER, (0.04, 0.015));
    place(&mut points, FaceMeshRegion::CheekLeft, CHEEK_LEFT_CENTER, (0.02, 0.02));
    place(&mut points, FaceMeshRegion::CheekRight, CHEEK_RIGHT_CENTER, (0.02, 0.02));

    FaceLandmarks::new(points)
}

fn place(points: &mut [Landmark], region: FaceMeshRegion, center: (f64, f64), radius: (f64, f64)) {
    let indices = region.indices();
    for (k, &i) in indices.iter().enumerate() {
        let angle = TAU * k as f64 / indices.len() as f64;
        points[i] = Landmark::new(
            center.0 + radius.0 * angle.cos(),
            center.1 + radius.1 * angle.sin(),
        );
    }
}

/// Deterministic pseudo-random sequence (64-bit LCG).
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform integer in `[-amplitude, amplitude]`.
    pub fn jitter(&mut self, amplitude: i32) -> i32 {
        if amplitude == 0 {
            return 0;
        }
        (self.next_u32() % (2 * amplitude as u32 + 1)) as i32 - amplitude
    }
}

/// `base` color with independent per-pixel luminance noise.
pub fn noisy_frame(width: u32, height: u32, base: [u8; 3], amplitude: i32, seed: u64) -> Frame {
    let mut rng = Lcg::new(seed);
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..width * height {
        let n = rng.jitter(amplitude);
        for c in base {
            data.push((c as i32 + n).clamp(0, 255) as u8);
        }
    }
    Frame::new(data, width, height)
}

/// Skin-toned noisy frame with darkened patches under both eyes.
pub fn face_frame(width: u32, height: u32) -> Frame {
    let mut frame = noisy_frame(width, height, SKIN, 6, 7);
    for center in [UNDER_EYE_LEFT_CENTER, UNDER_EYE_RIGHT_CENTER] {
        fill_patch(&mut frame, center, 0.05, 0.03, [120, 90, 80]);
    }
    frame
}

/// Paints a rectangle of half-size `(hw, hh)` (normalized) around `center`.
pub fn fill_patch(frame: &mut Frame, center: (f64, f64), hw: f64, hh: f64, rgb: [u8; 3]) {
    let (w, h) = (frame.width() as f64, frame.height() as f64);
    let x0 = ((center.0 - hw) * w).max(0.0) as usize;
    let x1 = ((center.0 + hw) * w).min(w) as usize;
    let y0 = ((center.1 - hh) * h).max(0.0) as usize;
    let y1 = ((center.1 + hh) * h).min(h) as usize;
    let fw = frame.width() as usize;
    let data = frame.data_mut();
    for y in y0..y1 {
        for x in x0..x1 {
            let i = (y * fw + x) * 3;
            data[i..i + 3].copy_from_slice(&rgb);
        }
    }
}

/// Mean absolute per-channel difference between two equally sized frames.
pub fn mean_abs_delta(before: &Frame, after: &Frame) -> f64 {
    let sum: f64 = before
        .data()
        .iter()
        .zip(after.data())
        .map(|(&b, &a)| (a as f64 - b as f64).abs())
        .sum();
    sum / before.data().len() as f64
}

pub struct StubDetector {
    detection: Detection,
}

impl StubDetector {
    pub fn hit(landmarks: FaceLandmarks) -> Self {
        Self {
            detection: Detection::hit(landmarks),
        }
    }

    pub fn miss() -> Self {
        Self {
            detection: Detection::miss(),
        }
    }
}

impl LandmarkDetector for StubDetector {
    fn detect(&self, _frame: &Frame) -> Result<Detection, DetectionError> {
        Ok(self.detection.clone())
    }
}

/// Always answers as an unavailable face service would.
pub struct FailingDetector;

impl LandmarkDetector for FailingDetector {
    fn detect(&self, _frame: &Frame) -> Result<Detection, DetectionError> {
        Err(DetectionError::Status {
            url: "stub://face-service".to_string(),
            status: 503,
        })
    }
}
