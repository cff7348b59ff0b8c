//! Normalized face-mesh landmarks and the named sub-regions addressed by index.
//!
//! Region index sets assume the 468-point face-mesh v1 topology
//! (`FACE_MESH_LANDMARK_COUNT`). If the detector's layout changes, every set
//! below silently addresses the wrong part of the face; detectors should be
//! wrapped in `TopologyCheckedDetector` so a mismatch fails fast instead.

use serde::{Deserialize, Serialize};

/// A keypoint normalized to image width/height, nominally in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_pixel(&self, width: u32, height: u32) -> (f64, f64) {
        (self.x * width as f64, self.y * height as f64)
    }
}

const UNDER_EYE_LEFT: &[usize] = &[
    243, 112, 26, 23, 24, 110, 25, 31, 228, 229, 230, 231, 232, 233,
];
const UNDER_EYE_RIGHT: &[usize] = &[359, 463, 253, 260, 259, 257, 258, 286, 414, 413, 412, 411, 410];
const CHEEK_LEFT: &[usize] = &[93, 234];
const CHEEK_RIGHT: &[usize] = &[454, 323];
const UPPER_LIP: &[usize] = &[61, 185, 40, 39, 37, 0, 267, 269, 270, 409, 291];
const LOWER_FACE: &[usize] = &[
    152, 148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

/// Named landmark subsets (face-mesh v1, 468 points).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceMeshRegion {
    UnderEyeLeft,
    UnderEyeRight,
    CheekLeft,
    CheekRight,
    UpperLip,
    LowerFace,
}

impl FaceMeshRegion {
    pub fn indices(self) -> &'static [usize] {
        match self {
            FaceMeshRegion::UnderEyeLeft => UNDER_EYE_LEFT,
            FaceMeshRegion::UnderEyeRight => UNDER_EYE_RIGHT,
            FaceMeshRegion::CheekLeft => CHEEK_LEFT,
            FaceMeshRegion::CheekRight => CHEEK_RIGHT,
            FaceMeshRegion::UpperLip => UPPER_LIP,
            FaceMeshRegion::LowerFace => LOWER_FACE,
        }
    }

    /// Sorted, deduplicated union of several regions' indices.
    pub fn union(regions: &[FaceMeshRegion]) -> Vec<usize> {
        let mut all: Vec<usize> = regions
            .iter()
            .flat_map(|r| r.indices().iter().copied())
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }
}

/// Ordered, immutable landmark sequence from one detection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Every landmark denormalized to pixel space.
    pub fn to_pixels(&self, width: u32, height: u32) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|lm| lm.to_pixel(width, height))
            .collect()
    }

    /// Pixel positions of the given indices, silently skipping any index
    /// outside this landmark set.
    pub fn select_pixels(&self, indices: &[usize], width: u32, height: u32) -> Vec<(f64, f64)> {
        indices
            .iter()
            .filter_map(|&i| self.points.get(i))
            .map(|lm| lm.to_pixel(width, height))
            .collect()
    }
}
