//! Capture-quality gate: sharpness, lighting evenness, landmark completeness
//! and crop size, averaged into one 0-100 score.

use serde::Serialize;

use super::pixel_statistics::{clip_unit, laplacian_variance, mean, round1, std_dev};
use crate::detection::domain::face_region_extractor::FaceRegions;
use crate::shared::color::{gray_plane, LabPlanes};
use crate::shared::frame::Frame;

/// Scores below this require a human to confirm the analysis.
pub const MANUAL_REVIEW_THRESHOLD: f64 = 60.0;

const SIGNAL_WEIGHT: f64 = 0.25;

/// Fewer landmarks than this is treated as a partial detection.
const PARTIAL_LANDMARK_COUNT: usize = 400;

/// Crops below 20x20 cannot be split into meaningful quadrants.
const MIN_QUADRANT_SIDE: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConfidenceResult {
    pub score: f64,
    pub manual_review_required: bool,
}

impl ConfidenceResult {
    pub fn rejected() -> Self {
        Self {
            score: 0.0,
            manual_review_required: true,
        }
    }
}

/// Laplacian variance mapped to 0-1: below ~100 is blurry, above ~500 sharp.
pub fn sharpness(crop: &Frame) -> f64 {
    if crop.is_empty() {
        return 0.0;
    }
    clip_unit((laplacian_variance(&gray_plane(crop)) - 50.0) / 450.0)
}

/// 1.0 when the four quadrants share the same mean lightness, falling to 0
/// as their spread reaches 20 levels.
pub fn lighting_evenness(crop: &Frame) -> f64 {
    if crop.width() < MIN_QUADRANT_SIDE || crop.height() < MIN_QUADRANT_SIDE {
        return 0.0;
    }
    let l = LabPlanes::from_frame(crop).l;
    let (h, w) = l.dim();
    let (mid_y, mid_x) = (h / 2, w / 2);

    let quadrant_means = [
        mean(&l.slice(ndarray::s![..mid_y, ..mid_x]).to_owned()),
        mean(&l.slice(ndarray::s![..mid_y, mid_x..]).to_owned()),
        mean(&l.slice(ndarray::s![mid_y.., ..mid_x]).to_owned()),
        mean(&l.slice(ndarray::s![mid_y.., mid_x..]).to_owned()),
    ];
    clip_unit(1.0 - std_dev(&quadrant_means) / 20.0)
}

pub fn completeness(regions: &FaceRegions) -> f64 {
    if !regions.detected || regions.landmarks.is_empty() {
        return 0.0;
    }
    if regions.landmarks.len() < PARTIAL_LANDMARK_COUNT {
        return 0.5;
    }
    if regions.face_crop.is_none() {
        return 0.7;
    }
    match regions.crop_area() {
        a if a < 4_000 => 0.4,
        a if a < 15_000 => 0.8,
        _ => 1.0,
    }
}

/// 50x50 crops score 0, roughly 300x300 and above score 1.
pub fn region_size(regions: &FaceRegions) -> f64 {
    if regions.usable_crop().is_none() {
        return 0.0;
    }
    clip_unit((regions.crop_area() as f64 - 2_500.0) / 87_500.0)
}

/// Equal-weight combination of the four signals, rounded to one decimal.
pub fn compute_confidence(regions: &FaceRegions) -> ConfidenceResult {
    if !regions.detected {
        return ConfidenceResult::rejected();
    }

    let (sharp, even) = match regions.usable_crop() {
        Some(crop) => (sharpness(crop), lighting_evenness(crop)),
        None => (0.0, 0.0),
    };
    let complete = completeness(regions);
    let size = region_size(regions);

    let score = round1(
        (100.0 * SIGNAL_WEIGHT * (sharp + even + complete + size)).clamp(0.0, 100.0),
    );
    log::debug!(
        "Confidence {score}: sharpness={sharp:.2} lighting={even:.2} completeness={complete:.2} size={size:.2}"
    );

    ConfidenceResult {
        score,
        manual_review_required: score < MANUAL_REVIEW_THRESHOLD,
    }
}
