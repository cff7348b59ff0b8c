//! Color-space conversions shared by the scoring and simulation engines.
//!
//! All planes use the 8-bit Lab encoding: `L` is CIE L* rescaled to 0..255,
//! `a`/`b` are offset by +128 so 128 is neutral chroma. Hue uses the
//! half-degree 0..180 scale. Every threshold in the engines is expressed
//! in these units.

use image::GrayImage;
use ndarray::Array2;
use palette::{FromColor, Hsv, Lab, Srgb};

use super::frame::Frame;

/// Neutral chroma value on the 8-bit `a`/`b` scale.
pub const NEUTRAL_CHROMA: f32 = 128.0;

const L_TO_8BIT: f32 = 255.0 / 100.0;

/// Lab planes of a frame, each `(height, width)`, values on the 8-bit scale.
#[derive(Clone, Debug, PartialEq)]
pub struct LabPlanes {
    pub l: Array2<f32>,
    pub a: Array2<f32>,
    pub b: Array2<f32>,
}

impl LabPlanes {
    /// Quantized conversion: each channel is rounded to an integer level,
    /// matching an 8-bit Lab image.
    pub fn from_frame(frame: &Frame) -> Self {
        let shape = (frame.height() as usize, frame.width() as usize);
        let mut planes = Self {
            l: Array2::zeros(shape),
            a: Array2::zeros(shape),
            b: Array2::zeros(shape),
        };

        let rgb = frame.as_ndarray();
        for y in 0..shape.0 {
            for x in 0..shape.1 {
                let [l, a, b] = rgb_to_lab8([rgb[[y, x, 0]], rgb[[y, x, 1]], rgb[[y, x, 2]]]);
                planes.l[[y, x]] = l;
                planes.a[[y, x]] = a;
                planes.b[[y, x]] = b;
            }
        }
        planes
    }

    /// Clamps every channel to 0..255 and converts back to RGB.
    pub fn to_frame(&self) -> Frame {
        let (h, w) = self.l.dim();
        let mut frame = Frame::new(vec![0; w * h * 3], w as u32, h as u32);
        {
            let mut rgb = frame.as_ndarray_mut();
            for y in 0..h {
                for x in 0..w {
                    let px = lab8_to_rgb([self.l[[y, x]], self.a[[y, x]], self.b[[y, x]]]);
                    for (c, v) in px.into_iter().enumerate() {
                        rgb[[y, x, c]] = v;
                    }
                }
            }
        }
        frame
    }

    pub fn width(&self) -> usize {
        self.l.ncols()
    }

    pub fn height(&self) -> usize {
        self.l.nrows()
    }

    /// Rounds and clamps every channel into the representable 0..255 range.
    pub fn quantize(&mut self) {
        for plane in [&mut self.l, &mut self.a, &mut self.b] {
            plane.mapv_inplace(|v| v.round().clamp(0.0, 255.0));
        }
    }
}

pub fn rgb_to_lab8(rgb: [u8; 3]) -> [f32; 3] {
    let lab: Lab = Lab::from_color(to_srgb(rgb));
    [
        (lab.l * L_TO_8BIT).round().clamp(0.0, 255.0),
        (lab.a + NEUTRAL_CHROMA).round().clamp(0.0, 255.0),
        (lab.b + NEUTRAL_CHROMA).round().clamp(0.0, 255.0),
    ]
}

pub fn lab8_to_rgb(lab: [f32; 3]) -> [u8; 3] {
    let [l, a, b] = lab.map(|v| v.round().clamp(0.0, 255.0));
    let lab: Lab = Lab::new(l / L_TO_8BIT, a - NEUTRAL_CHROMA, b - NEUTRAL_CHROMA);
    let srgb: Srgb<f32> = Srgb::from_color(lab);
    [srgb.red, srgb.green, srgb.blue].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Hue on the half-degree 0..180 scale. Achromatic pixels report 0.
pub fn hue_half_degrees(rgb: [u8; 3]) -> f32 {
    let hsv: Hsv = Hsv::from_color(to_srgb(rgb));
    if hsv.saturation <= f32::EPSILON {
        return 0.0;
    }
    (hsv.hue.into_positive_degrees() / 2.0).round()
}

/// BT.601 luma, rounded to an integer level.
pub fn gray_level(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(|v| v as f32);
    (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
}

pub fn gray_plane(frame: &Frame) -> Array2<f32> {
    let (h, w) = (frame.height() as usize, frame.width() as usize);
    Array2::from_shape_fn((h, w), |(y, x)| gray_level(frame.pixel(x as u32, y as u32)) as f32)
}

pub fn gray_image(frame: &Frame) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        image::Luma([gray_level(frame.pixel(x, y))])
    })
}

fn to_srgb(rgb: [u8; 3]) -> Srgb<f32> {
    Srgb::new(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    )
}
