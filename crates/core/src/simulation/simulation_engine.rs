//! Before/after renderings of a face crop under a recommended service and,
//! optionally, a period of home product use.

use crate::shared::frame::Frame;
use crate::shared::image_codec::{encode, EncodedFormat, EncodedImage};
use crate::simulation::domain::correction_cap::cap_correction;
use crate::simulation::infrastructure::product_impact_simulator::ProductImpactSimulator;
use crate::simulation::infrastructure::simulator_factory::simulator_for_service;

/// Encoded before/after pair. Both are empty when there was no crop.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    pub before: EncodedImage,
    pub after: EncodedImage,
}

impl SimulationResult {
    pub fn empty(format: EncodedFormat) -> Self {
        Self {
            before: EncodedImage::empty(format),
            after: EncodedImage::empty(format),
        }
    }

    pub fn before_base64(&self) -> String {
        self.before.to_base64()
    }

    pub fn after_base64(&self) -> String {
        self.after.to_base64()
    }
}

/// The crop as it might look after `service`, within the correction cap.
pub fn simulate_service_impact(crop: &Frame, service: &str) -> Frame {
    if crop.is_empty() {
        return crop.clone();
    }
    let after = simulator_for_service(service).simulate(crop);
    cap_correction(crop, &after)
}

/// The crop after `days` of product use, within the correction cap.
pub fn simulate_product_impact(crop: &Frame, days: u32) -> Frame {
    if crop.is_empty() {
        return crop.clone();
    }
    let after = ProductImpactSimulator::new(days).simulate(crop);
    cap_correction(crop, &after)
}

/// Renders and encodes the before/after pair for the top service. With
/// `product_days`, product use is layered on the service result and the
/// combined change is capped against the original crop.
///
/// Encoding failures are logged and leave the affected image empty.
pub fn before_after(
    crop: Option<&Frame>,
    service: &str,
    product_days: Option<u32>,
    format: EncodedFormat,
) -> SimulationResult {
    let crop = match crop.filter(|c| !c.is_empty()) {
        Some(c) => c,
        None => return SimulationResult::empty(format),
    };

    let mut after = simulate_service_impact(crop, service);
    if let Some(days) = product_days {
        let layered = simulate_product_impact(&after, days);
        after = cap_correction(crop, &layered);
    }

    SimulationResult {
        before: encode_or_empty(crop, format, "before"),
        after: encode_or_empty(&after, format, "after"),
    }
}

fn encode_or_empty(frame: &Frame, format: EncodedFormat, label: &str) -> EncodedImage {
    encode(frame, format).unwrap_or_else(|e| {
        log::warn!("Failed to encode {label} image: {e}");
        EncodedImage::empty(format)
    })
}
