//! Response objects returned to staff and customers, serialized as JSON.

use serde::Serialize;

use crate::recommendation::domain::recommendation_engine::ImprovementProjection;
use crate::recommendation::domain::service_recommendation::ServiceRecommendation;
use crate::scoring::skin_scores::SkinScores;
use crate::shared::constants::SIMULATION_DISCLAIMER;
use crate::shared::image_codec::EncodedFormat;
use crate::simulation::simulation_engine::SimulationResult;

/// Full analysis for salon staff.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StaffReport {
    pub face_detected: bool,
    /// Rounded to one decimal; `None` when no face was found.
    pub skin_scores: Option<SkinScores>,
    pub confidence_score: f64,
    pub manual_review_required: bool,
    pub top_3_services: Vec<ServiceRecommendation>,
    pub suggested_roadmap: Vec<String>,
    pub improvement_projection: ImprovementProjection,
}

impl StaffReport {
    pub fn no_face() -> Self {
        Self {
            face_detected: false,
            skin_scores: None,
            confidence_score: 0.0,
            manual_review_required: true,
            top_3_services: Vec::new(),
            suggested_roadmap: Vec::new(),
            improvement_projection: ImprovementProjection::new(),
        }
    }
}

/// Simulated before/after view for the customer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerReport {
    pub face_detected: bool,
    pub before_image_base64: String,
    pub after_image_base64: String,
    pub top_recommended_service: Option<String>,
    pub disclaimer: String,
    /// Raw encoded images, for callers that store files instead of JSON.
    #[serde(skip)]
    pub images: SimulationResult,
}

impl CustomerReport {
    pub fn no_face(format: EncodedFormat) -> Self {
        Self::from_simulation(false, None, SimulationResult::empty(format))
    }

    pub fn from_simulation(
        face_detected: bool,
        top_recommended_service: Option<String>,
        images: SimulationResult,
    ) -> Self {
        Self {
            face_detected,
            before_image_base64: images.before_base64(),
            after_image_base64: images.after_base64(),
            top_recommended_service,
            disclaimer: SIMULATION_DISCLAIMER.to_string(),
            images,
        }
    }
}

/// Staff and customer views of one upload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConsultationReport {
    pub staff: StaffReport,
    pub customer: CustomerReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_staff_no_face_json() {
        let value = serde_json::to_value(StaffReport::no_face()).unwrap();
        assert_eq!(
            value,
            json!({
                "face_detected": false,
                "skin_scores": null,
                "confidence_score": 0.0,
                "manual_review_required": true,
                "top_3_services": [],
                "suggested_roadmap": [],
                "improvement_projection": {}
            })
        );
    }

    #[test]
    fn test_customer_no_face_json() {
        let value = serde_json::to_value(CustomerReport::no_face(EncodedFormat::Jpeg)).unwrap();
        assert_eq!(
            value,
            json!({
                "face_detected": false,
                "before_image_base64": "",
                "after_image_base64": "",
                "top_recommended_service": null,
                "disclaimer": "This visualization is a digital simulation. Results may vary."
            })
        );
    }

    #[test]
    fn test_consultation_report_nests_both_views() {
        let report = ConsultationReport {
            staff: StaffReport::no_face(),
            customer: CustomerReport::no_face(EncodedFormat::Png),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["staff"]["face_detected"], false);
        assert_eq!(value["customer"]["before_image_base64"], "");
    }
}
