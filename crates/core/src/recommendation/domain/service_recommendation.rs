use serde::Serialize;

/// One suggested salon service and why it was chosen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceRecommendation {
    pub service: String,
    pub reason: String,
    pub expected_effect: String,
    pub estimated_improvement_pct: f64,
}
