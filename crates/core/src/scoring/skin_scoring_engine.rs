//! Six 0-100 skin metrics from the face crop and, for the landmark-relative
//! metrics, from the full image.

use super::pixel_statistics::{
    edge_density, fraction_below, laplacian_variance, mean, normalize_0_100, percentile,
};
use super::skin_scores::{SkinScores, NEUTRAL_SCORE};
use crate::detection::domain::face_landmarks::{FaceLandmarks, FaceMeshRegion};
use crate::detection::domain::face_region_extractor::FaceRegions;
use crate::detection::domain::region_mask::{region_mean_luminance, region_rect};
use crate::shared::color::{gray_image, gray_plane, hue_half_degrees, LabPlanes};
use crate::shared::frame::Frame;

/// Padding around the lip and jaw landmarks for the facial hair window.
const FACIAL_HAIR_PADDING_PX: i32 = 10;

/// Pixels this far below the mean lightness count as a dark cluster.
const PIGMENT_OFFSET: f64 = 15.0;

/// Red hue bands on the 0..180 scale.
const RED_HUE_LOW: f32 = 10.0;
const RED_HUE_HIGH: f32 = 170.0;

/// Mean lightness mapped over [20, 90].
pub fn brightness_index(crop: &Frame) -> f64 {
    normalize_0_100(mean(&LabPlanes::from_frame(crop).l), 20.0, 90.0)
}

/// Share of pixels darker than `mean - 15`, 0-40% mapped to 0-100.
pub fn pigmentation_density(crop: &Frame) -> f64 {
    if crop.is_empty() {
        return 0.0;
    }
    let l = LabPlanes::from_frame(crop).l;
    let threshold = (mean(&l) - PIGMENT_OFFSET).max(0.0);
    normalize_0_100(100.0 * fraction_below(&l, threshold as f32), 0.0, 40.0)
}

/// Share of red-hued pixels, 5-35% mapped to 0-100.
pub fn redness_score(crop: &Frame) -> f64 {
    if crop.is_empty() {
        return normalize_0_100(0.0, 5.0, 35.0);
    }
    let red = crop
        .pixels()
        .map(hue_half_degrees)
        .filter(|&h| h <= RED_HUE_LOW || h >= RED_HUE_HIGH)
        .count();
    normalize_0_100(100.0 * red as f64 / crop.pixel_count() as f64, 5.0, 35.0)
}

/// Laplacian variance of the gray crop over [50, 2000].
pub fn texture_roughness(crop: &Frame) -> f64 {
    normalize_0_100(laplacian_variance(&gray_plane(crop)), 50.0, 2000.0)
}

/// Under-eye lightness relative to the cheeks: a ratio of 1.0 scores 0,
/// a ratio of 0.5 or lower scores 100.
pub fn dark_circle_index(image: &Frame, landmarks: &FaceLandmarks) -> f64 {
    let lum = |region: FaceMeshRegion| region_mean_luminance(image, landmarks, region.indices());

    let under_eye = (lum(FaceMeshRegion::UnderEyeLeft) + lum(FaceMeshRegion::UnderEyeRight)) / 2.0;
    let cheek = (lum(FaceMeshRegion::CheekLeft) + lum(FaceMeshRegion::CheekRight)) / 2.0;
    if cheek <= 0.0 {
        return 0.0;
    }
    normalize_0_100(1.0 - under_eye / cheek, 0.0, 0.5)
}

/// Edge density and dark-pixel share in the upper lip and jaw window,
/// weighted equally.
pub fn facial_hair_density(image: &Frame, landmarks: &FaceLandmarks) -> f64 {
    let indices = FaceMeshRegion::union(&[FaceMeshRegion::UpperLip, FaceMeshRegion::LowerFace]);
    let rect = match region_rect(
        landmarks,
        &indices,
        image.width(),
        image.height(),
        FACIAL_HAIR_PADDING_PX,
    ) {
        Some(r) if !r.is_degenerate() => r,
        _ => return 0.0,
    };

    let window = image.crop(&rect);
    let edges_pct = 100.0 * edge_density(&gray_image(&window));

    let l = LabPlanes::from_frame(&window).l;
    let p25 = percentile(&l, 25.0);
    let dark_pct = 100.0 * fraction_below(&l, p25 as f32);

    let combined =
        0.5 * normalize_0_100(edges_pct, 2.0, 15.0) + 0.5 * normalize_0_100(dark_pct, 10.0, 40.0);
    combined.min(100.0)
}

/// Scores a detected face. Without a usable crop every metric is the
/// neutral 50.0 and `measured` is false. Without landmarks the two
/// landmark-relative metrics stay neutral.
pub fn compute_skin_scores(image: &Frame, regions: &FaceRegions) -> SkinScores {
    let crop = match regions.usable_crop() {
        Some(c) if regions.detected => c,
        _ => return SkinScores::neutral(),
    };

    let landmarks = &regions.landmarks;
    let (dark_circle, facial_hair) = if landmarks.is_empty() {
        (NEUTRAL_SCORE, NEUTRAL_SCORE)
    } else {
        (
            dark_circle_index(image, landmarks),
            facial_hair_density(image, landmarks),
        )
    };

    let scores = SkinScores {
        brightness: brightness_index(crop),
        pigmentation_density: pigmentation_density(crop),
        redness: redness_score(crop),
        texture_roughness: texture_roughness(crop),
        dark_circle_index: dark_circle,
        facial_hair_density: facial_hair,
        measured: true,
    };
    log::debug!("Skin scores: {:?}", scores.rounded());
    scores
}
