use crate::shared::frame::Frame;

/// Renders the uncapped visual effect of one salon service on a face crop.
///
/// Implementations must return a frame with the crop's dimensions. The
/// correction cap is applied by the caller.
pub trait ServiceSimulator: Send + Sync {
    fn name(&self) -> &'static str;

    fn simulate(&self, crop: &Frame) -> Frame;
}

/// Family of visual effect a service name maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationKind {
    DeTan,
    Brightening,
    Premium,
    HairRemoval,
    AntiRedness,
}

impl SimulationKind {
    /// Case-insensitive keyword match on the service name. Unknown services
    /// get the brightening effect.
    pub fn for_service(service: &str) -> Self {
        let name = service.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| name.contains(k));

        if has(&["de-tan", "detan"]) {
            SimulationKind::DeTan
        } else if has(&["fruit"]) {
            SimulationKind::Brightening
        } else if has(&["gold", "diamond"]) {
            SimulationKind::Premium
        } else if has(&["thread", "wax"]) {
            SimulationKind::HairRemoval
        } else if has(&["acne"]) {
            SimulationKind::AntiRedness
        } else {
            SimulationKind::Brightening
        }
    }
}
