use ndarray::Array2;

use super::face_landmarks::FaceLandmarks;
use crate::shared::color::LabPlanes;
use crate::shared::frame::Frame;
use crate::shared::region::Rect;

/// Padding around a named sub-region when building a mask.
pub const REGION_MASK_PADDING_PX: i32 = 8;

/// Padding used when averaging a sub-region's luminance.
pub const REGION_LUMINANCE_PADDING_PX: i32 = 5;

/// Padded bounding rectangle of the selected landmarks, in source-image
/// pixels and clamped to the image. Indices beyond the landmark set are
/// ignored; `None` when none remain. The result may be degenerate.
/// Padding happens before the cast, so far-off coordinates saturate.
pub fn region_rect(
    landmarks: &FaceLandmarks,
    indices: &[usize],
    width: u32,
    height: u32,
    expand_px: i32,
) -> Option<Rect> {
    let points = landmarks.select_pixels(indices, width, height);
    let pad = expand_px as f64;
    Rect::padded_bounds(&points, pad, pad, width, height)
}

/// Binary image-sized mask covering one rectangular sub-region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionMask {
    width: u32,
    height: u32,
    bounds: Option<Rect>,
}

impl RegionMask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bounds: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Covered rectangle; `None` for an all-zero mask.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.bounds
            .is_some_and(|r| r.contains(x as i32, y as i32))
    }

    pub fn count(&self) -> usize {
        self.bounds.map_or(0, |r| r.area() as usize)
    }

    /// Dense `(height, width)` 0/1 representation.
    pub fn to_array(&self) -> Array2<u8> {
        let mut mask = Array2::zeros((self.height as usize, self.width as usize));
        if let Some(r) = self.bounds {
            for y in r.y_min..r.y_max {
                for x in r.x_min..r.x_max {
                    mask[[y as usize, x as usize]] = 1;
                }
            }
        }
        mask
    }
}

/// Mask of the padded rectangle around `indices`. Never fails: unknown
/// indices or a degenerate rectangle give an all-zero mask.
pub fn region_mask(
    width: u32,
    height: u32,
    landmarks: &FaceLandmarks,
    indices: &[usize],
    expand_px: i32,
) -> RegionMask {
    let bounds = region_rect(landmarks, indices, width, height, expand_px)
        .filter(|r| !r.is_degenerate());
    RegionMask {
        width,
        height,
        bounds,
    }
}

/// Mean 8-bit Lab lightness inside the padded region; 0.0 when the
/// region cannot be addressed.
pub fn region_mean_luminance(frame: &Frame, landmarks: &FaceLandmarks, indices: &[usize]) -> f64 {
    let rect = match region_rect(
        landmarks,
        indices,
        frame.width(),
        frame.height(),
        REGION_LUMINANCE_PADDING_PX,
    ) {
        Some(r) if !r.is_degenerate() => r,
        _ => return 0.0,
    };

    let planes = LabPlanes::from_frame(&frame.crop(&rect));
    planes.l.mean().map_or(0.0, f64::from)
}
