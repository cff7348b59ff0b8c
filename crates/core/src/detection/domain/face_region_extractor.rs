use super::face_landmarks::FaceLandmarks;
use super::landmark_detector::{Detection, DetectionError, LandmarkDetector};
use crate::shared::frame::Frame;
use crate::shared::region::Rect;

/// Padding around the landmark bounding box, as a fraction of image
/// width (horizontal) and height (vertical), applied on each side.
pub const CROP_PADDING_FRACTION: f64 = 0.12;

/// Face crop plus the landmarks it was derived from.
///
/// Invariant: `detected == false` implies empty landmarks and no crop.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRegions {
    pub detected: bool,
    pub landmarks: FaceLandmarks,
    pub face_crop: Option<Frame>,
    /// Crop rectangle in source-image pixel coordinates.
    pub crop_bounds: Option<Rect>,
    /// `(height, width)` of the source image.
    pub image_shape: (u32, u32),
}

impl FaceRegions {
    pub fn not_detected(image_shape: (u32, u32)) -> Self {
        Self {
            detected: false,
            landmarks: FaceLandmarks::empty(),
            face_crop: None,
            crop_bounds: None,
            image_shape,
        }
    }

    /// Pixel area of the crop; 0 when there is none.
    pub fn crop_area(&self) -> usize {
        self.face_crop.as_ref().map_or(0, Frame::pixel_count)
    }

    /// The crop, if present and non-empty.
    pub fn usable_crop(&self) -> Option<&Frame> {
        self.face_crop.as_ref().filter(|c| !c.is_empty())
    }
}

/// Turns a detector answer into a padded face crop.
///
/// A degenerate box falls back to the whole image; the face still counts
/// as detected.
pub fn regions_from_detection(frame: &Frame, detection: Detection) -> FaceRegions {
    let (w, h) = (frame.width(), frame.height());
    let image_shape = (h, w);

    if !detection.has_face() {
        return FaceRegions::not_detected(image_shape);
    }

    let landmarks = detection.landmarks;
    let points = landmarks.to_pixels(w, h);
    let bounds = Rect::padded_bounds(
        &points,
        CROP_PADDING_FRACTION * w as f64,
        CROP_PADDING_FRACTION * h as f64,
        w,
        h,
    )
    .filter(|r| !r.is_degenerate());

    let bounds = match bounds {
        Some(b) => b,
        None => {
            log::warn!("Degenerate face box, using the whole {w}x{h} image as crop");
            Rect::full(w, h)
        }
    };

    FaceRegions {
        detected: true,
        face_crop: Some(frame.crop(&bounds)),
        crop_bounds: Some(bounds),
        landmarks,
        image_shape,
    }
}

/// Runs the external landmark capability and derives [`FaceRegions`].
pub struct FaceRegionExtractor {
    detector: Box<dyn LandmarkDetector>,
}

impl FaceRegionExtractor {
    pub fn new(detector: Box<dyn LandmarkDetector>) -> Self {
        Self { detector }
    }

    /// Empty images short-circuit to "not detected" without asking the
    /// detector. Only collaborator failures surface as errors.
    pub fn extract(&self, frame: &Frame) -> Result<FaceRegions, DetectionError> {
        if frame.is_empty() {
            return Ok(FaceRegions::not_detected((frame.height(), frame.width())));
        }

        let detection = self.detector.detect(frame)?;
        log::debug!(
            "Detector answered face_detected={} with {} landmarks",
            detection.face_detected,
            detection.landmarks.len()
        );
        Ok(regions_from_detection(frame, detection))
    }
}
