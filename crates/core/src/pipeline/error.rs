use thiserror::Error;

use crate::detection::domain::landmark_detector::DetectionError;
use crate::shared::image_codec::ImageCodecError;

/// Failures a consultation can surface. A missing face is not one of them.
#[derive(Error, Debug)]
pub enum ConsultError {
    /// The upload could not be turned into pixels.
    #[error("invalid image: {0}")]
    Input(#[from] ImageCodecError),
    /// The landmark service could not be asked.
    #[error("landmark detection unavailable: {0}")]
    Detection(#[from] DetectionError),
}
