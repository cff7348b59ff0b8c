use std::time::Instant;

use crate::shared::frame::Frame;
use crate::shared::image_codec::decode;

use super::consult_customer_use_case::ConsultCustomerUseCase;
use super::consult_staff_use_case::ConsultStaffUseCase;
use super::consultation_logger::{elapsed_ms, ConsultationLogger};
use super::error::ConsultError;
use super::report::ConsultationReport;

/// Runs the staff and customer paths on one upload. The image is decoded
/// once; each path calls its own detector.
pub struct ConsultUseCase {
    staff: ConsultStaffUseCase,
    customer: ConsultCustomerUseCase,
}

impl ConsultUseCase {
    pub fn new(staff: ConsultStaffUseCase, customer: ConsultCustomerUseCase) -> Self {
        Self { staff, customer }
    }

    pub fn execute(
        &self,
        image_bytes: &[u8],
        logger: &mut dyn ConsultationLogger,
    ) -> Result<ConsultationReport, ConsultError> {
        let start = Instant::now();
        let frame = decode(image_bytes)?;
        logger.timing("decode", elapsed_ms(start));
        self.execute_frame(&frame, logger)
    }

    pub fn execute_frame(
        &self,
        frame: &Frame,
        logger: &mut dyn ConsultationLogger,
    ) -> Result<ConsultationReport, ConsultError> {
        let staff = self.staff.execute_frame(frame, logger)?;
        let customer = self.customer.execute_frame(frame, logger)?;
        Ok(ConsultationReport { staff, customer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::landmark_detector::LandmarkDetector;
    use crate::pipeline::consult_customer_use_case::SimulationOptions;
    use crate::pipeline::consultation_logger::TimingConsultationLogger;
    use crate::pipeline::report::{CustomerReport, StaffReport};
    use crate::recommendation::domain::rule_table::RuleTable;
    use crate::shared::image_codec::{encode, EncodedFormat, ImageCodecError};
    use crate::shared::test_support::{face_frame, face_landmarks, FailingDetector, StubDetector};

    fn use_case(
        staff: Box<dyn LandmarkDetector>,
        customer: Box<dyn LandmarkDetector>,
    ) -> ConsultUseCase {
        ConsultUseCase::new(
            ConsultStaffUseCase::new(staff, RuleTable::fallback()),
            ConsultCustomerUseCase::new(customer, RuleTable::fallback(), SimulationOptions::default()),
        )
    }

    #[test]
    fn test_both_views_for_detected_face() {
        let uc = use_case(
            Box::new(StubDetector::hit(face_landmarks())),
            Box::new(StubDetector::hit(face_landmarks())),
        );
        let bytes = encode(&face_frame(160, 160), EncodedFormat::Png)
            .unwrap()
            .bytes()
            .to_vec();
        let mut logger = TimingConsultationLogger::new();
        let report = uc.execute(&bytes, &mut logger).unwrap();

        assert!(report.staff.face_detected);
        assert!(report.customer.face_detected);
        assert!(report.customer.top_recommended_service.is_some());
        assert_eq!(logger.timings_for("decode").map(<[f64]>::len), Some(1));
        assert_eq!(logger.consultations(), 2);
    }

    #[test]
    fn test_detector_calls_are_independent() {
        let uc = use_case(
            Box::new(StubDetector::hit(face_landmarks())),
            Box::new(StubDetector::miss()),
        );
        let mut logger = TimingConsultationLogger::new();
        let report = uc.execute_frame(&face_frame(120, 120), &mut logger).unwrap();
        assert!(report.staff.face_detected);
        assert_eq!(report.customer, CustomerReport::no_face(EncodedFormat::Jpeg));
    }

    #[test]
    fn test_no_face_in_both_views() {
        let uc = use_case(Box::new(StubDetector::miss()), Box::new(StubDetector::miss()));
        let mut logger = TimingConsultationLogger::new();
        let report = uc.execute_frame(&face_frame(60, 60), &mut logger).unwrap();
        assert_eq!(report.staff, StaffReport::no_face());
        assert!(!report.customer.face_detected);
    }

    #[test]
    fn test_failures_propagate() {
        let uc = use_case(Box::new(FailingDetector), Box::new(StubDetector::miss()));
        let mut logger = TimingConsultationLogger::new();
        assert!(matches!(
            uc.execute_frame(&face_frame(60, 60), &mut logger),
            Err(ConsultError::Detection(_))
        ));
        assert!(matches!(
            uc.execute(b"garbage", &mut logger),
            Err(ConsultError::Input(ImageCodecError::Decode(_)))
        ));
    }
}
