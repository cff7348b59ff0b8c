use super::bilateral::BilateralKernel;
use super::lab_service_simulators::{cap_lightness, pull_toward_neutral};
use crate::shared::color::LabPlanes;
use crate::shared::frame::Frame;

/// Visible correction after `days` of home product use: 0.15 for a week,
/// 0.30 for a month, 0.50 beyond that.
pub fn product_correction_factor(days: u32) -> f32 {
    match days {
        0..=7 => 0.15,
        8..=30 => 0.30,
        _ => 0.50,
    }
}

/// Longer-horizon home-care effect: gentle lightness normalisation toward
/// mid-grey, redness reduction and edge-preserving smoothing, all scaled
/// by the correction factor. Output is uncapped.
pub struct ProductImpactSimulator {
    factor: f32,
    kernel: BilateralKernel,
}

impl ProductImpactSimulator {
    pub fn new(days: u32) -> Self {
        Self {
            factor: product_correction_factor(days),
            kernel: BilateralKernel::new(5, 40.0, 40.0),
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn simulate(&self, crop: &Frame) -> Frame {
        let f = self.factor;
        let mut lab = LabPlanes::from_frame(crop);
        lab.l.mapv_inplace(|l| l + (128.0 - l) * f * 0.4);
        pull_toward_neutral(&mut lab.a, f * 0.3);
        lab.quantize();
        cap_lightness(&mut lab.l);

        let mut planes = self.kernel.apply(&[&lab.l, &lab.a, &lab.b]).into_iter();
        match (planes.next(), planes.next(), planes.next()) {
            (Some(l), Some(a), Some(b)) => LabPlanes { l, a, b }.to_frame(),
            _ => lab.to_frame(),
        }
    }
}
