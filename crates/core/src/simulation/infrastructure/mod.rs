mod bilateral;
pub mod lab_service_simulators;
pub mod product_impact_simulator;
pub mod simulator_factory;
