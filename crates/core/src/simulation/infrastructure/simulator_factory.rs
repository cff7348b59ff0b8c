use crate::simulation::domain::service_simulator::{ServiceSimulator, SimulationKind};

use super::lab_service_simulators::{
    AntiRednessSimulator, BrighteningSimulator, DeTanSimulator, HairRemovalSimulator,
    PremiumSimulator,
};

/// Builds the simulator for a service family.
pub fn create_simulator(kind: SimulationKind) -> Box<dyn ServiceSimulator> {
    match kind {
        SimulationKind::DeTan => Box::new(DeTanSimulator),
        SimulationKind::Brightening => Box::new(BrighteningSimulator::new()),
        SimulationKind::Premium => Box::new(PremiumSimulator),
        SimulationKind::HairRemoval => Box::new(HairRemovalSimulator::new()),
        SimulationKind::AntiRedness => Box::new(AntiRednessSimulator),
    }
}

/// Simulator for a service name, falling back to brightening for services
/// with no dedicated effect.
pub fn simulator_for_service(service: &str) -> Box<dyn ServiceSimulator> {
    let kind = SimulationKind::for_service(service);
    log::debug!("Simulating {service:?} as {kind:?}");
    create_simulator(kind)
}
