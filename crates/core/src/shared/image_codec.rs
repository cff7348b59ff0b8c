use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::frame::Frame;

#[derive(Error, Debug)]
pub enum ImageCodecError {
    #[error("empty image payload")]
    Empty,
    #[error("unable to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("unable to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("frame data does not match its dimensions")]
    InvalidFrame,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported image format '{0}'")]
pub struct UnsupportedFormat(pub String);

/// Transport format of simulation outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodedFormat {
    #[default]
    Jpeg,
    Png,
}

impl EncodedFormat {
    pub fn extension(self) -> &'static str {
        match self {
            EncodedFormat::Jpeg => "jpg",
            EncodedFormat::Png => "png",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            EncodedFormat::Jpeg => ImageFormat::Jpeg,
            EncodedFormat::Png => ImageFormat::Png,
        }
    }
}

impl std::str::FromStr for EncodedFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(EncodedFormat::Jpeg),
            "png" => Ok(EncodedFormat::Png),
            other => Err(UnsupportedFormat(other.to_string())),
        }
    }
}

/// Encoded image bytes. An empty payload stands for "no image".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    format: EncodedFormat,
}

impl EncodedImage {
    pub fn empty(format: EncodedFormat) -> Self {
        Self {
            bytes: Vec::new(),
            format,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> EncodedFormat {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 of the encoded bytes; empty string for an empty image.
    pub fn to_base64(&self) -> String {
        if self.bytes.is_empty() {
            return String::new();
        }
        STANDARD.encode(&self.bytes)
    }
}

/// Decodes raw upload bytes into an RGB frame.
pub fn decode(bytes: &[u8]) -> Result<Frame, ImageCodecError> {
    if bytes.is_empty() {
        return Err(ImageCodecError::Empty);
    }
    let rgb = image::load_from_memory(bytes)
        .map_err(ImageCodecError::Decode)?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame::new(rgb.into_raw(), width, height))
}

/// Encodes a frame; an empty frame yields an empty image rather than an error.
pub fn encode(frame: &Frame, format: EncodedFormat) -> Result<EncodedImage, ImageCodecError> {
    if frame.is_empty() {
        return Ok(EncodedImage::empty(format));
    }
    let rgb = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or(ImageCodecError::InvalidFrame)?;

    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, format.image_format())
        .map_err(ImageCodecError::Encode)?;

    Ok(EncodedImage {
        bytes: buf.into_inner(),
        format,
    })
}
