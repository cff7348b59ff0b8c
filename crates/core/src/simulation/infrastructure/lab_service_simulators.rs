//! Service effects rendered as per-pixel edits in 8-bit Lab.

use ndarray::Array2;

use super::bilateral::BilateralKernel;
use crate::shared::color::{LabPlanes, NEUTRAL_CHROMA};
use crate::shared::frame::Frame;
use crate::simulation::domain::service_simulator::ServiceSimulator;

/// Lightness ceiling that keeps simulated results from looking bleached.
pub const MAX_LIGHTNESS: f32 = 95.0;

const MAX_LEVEL: f32 = 255.0;

/// Moves every value `fraction` of the way toward neutral chroma.
pub(crate) fn pull_toward_neutral(plane: &mut Array2<f32>, fraction: f32) {
    plane.mapv_inplace(|v| v * (1.0 - fraction) + NEUTRAL_CHROMA * fraction);
}

pub(crate) fn cap_lightness(plane: &mut Array2<f32>) {
    plane.mapv_inplace(|v| v.min(MAX_LIGHTNESS));
}

/// `l * gain + offset`, saturating at the top of the 8-bit range.
fn boost_lightness(plane: &mut Array2<f32>, gain: f32, offset: f32) {
    plane.mapv_inplace(|v| (v * gain + offset).min(MAX_LEVEL));
}

/// Evens out tone: darker-than-average pixels move a quarter of the way to
/// the mean, everything gets a small lift and chroma is desaturated.
pub struct DeTanSimulator;

impl ServiceSimulator for DeTanSimulator {
    fn name(&self) -> &'static str {
        "de-tan"
    }

    fn simulate(&self, crop: &Frame) -> Frame {
        let mut lab = LabPlanes::from_frame(crop);
        let mean_l = lab.l.mean().unwrap_or(0.0);
        lab.l.mapv_inplace(|l| {
            let evened = if l < mean_l { l + (mean_l - l) * 0.25 } else { l };
            (evened + 2.5).min(MAX_LEVEL)
        });
        pull_toward_neutral(&mut lab.a, 0.08);
        pull_toward_neutral(&mut lab.b, 0.08);
        lab.quantize();
        cap_lightness(&mut lab.l);
        lab.to_frame()
    }
}

/// Glow: lightness boost, then edge-preserving smoothing of the chroma
/// planes only. Lightness is not smoothed.
pub struct BrighteningSimulator {
    chroma_kernel: BilateralKernel,
}

impl BrighteningSimulator {
    pub fn new() -> Self {
        Self {
            chroma_kernel: BilateralKernel::new(5, 30.0, 30.0),
        }
    }
}

impl Default for BrighteningSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceSimulator for BrighteningSimulator {
    fn name(&self) -> &'static str {
        "brightening"
    }

    fn simulate(&self, crop: &Frame) -> Frame {
        let mut lab = LabPlanes::from_frame(crop);
        boost_lightness(&mut lab.l, 1.06, 3.0);
        cap_lightness(&mut lab.l);

        let mut smoothed = self.chroma_kernel.apply(&[&lab.a, &lab.b]).into_iter();
        if let (Some(a), Some(b)) = (smoothed.next(), smoothed.next()) {
            lab.a = a;
            lab.b = b;
        }
        lab.quantize();
        lab.to_frame()
    }
}

/// Stronger lightness boost with the same ceiling.
pub struct PremiumSimulator;

impl ServiceSimulator for PremiumSimulator {
    fn name(&self) -> &'static str {
        "premium"
    }

    fn simulate(&self, crop: &Frame) -> Frame {
        let mut lab = LabPlanes::from_frame(crop);
        boost_lightness(&mut lab.l, 1.08, 3.0);
        lab.quantize();
        cap_lightness(&mut lab.l);
        lab.to_frame()
    }
}

/// Softens fine edges across all planes, then lifts lightness slightly.
pub struct HairRemovalSimulator {
    kernel: BilateralKernel,
}

impl HairRemovalSimulator {
    pub fn new() -> Self {
        Self {
            kernel: BilateralKernel::new(3, 25.0, 25.0),
        }
    }
}

impl Default for HairRemovalSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceSimulator for HairRemovalSimulator {
    fn name(&self) -> &'static str {
        "hair-removal"
    }

    fn simulate(&self, crop: &Frame) -> Frame {
        let lab = LabPlanes::from_frame(crop);
        let mut planes = self.kernel.apply(&[&lab.l, &lab.a, &lab.b]).into_iter();
        let (Some(l), Some(a), Some(b)) = (planes.next(), planes.next(), planes.next()) else {
            return crop.clone();
        };
        let mut smooth = LabPlanes { l, a, b };
        boost_lightness(&mut smooth.l, 1.02, 1.5);
        smooth.quantize();
        smooth.to_frame()
    }
}

/// Pulls the green-red axis toward neutral with a small lightness lift.
pub struct AntiRednessSimulator;

impl ServiceSimulator for AntiRednessSimulator {
    fn name(&self) -> &'static str {
        "anti-redness"
    }

    fn simulate(&self, crop: &Frame) -> Frame {
        let mut lab = LabPlanes::from_frame(crop);
        pull_toward_neutral(&mut lab.a, 0.12);
        boost_lightness(&mut lab.l, 1.03, 2.0);
        lab.quantize();
        lab.to_frame()
    }
}
