use std::thread;
use std::time::Instant;

use crate::detection::domain::face_region_extractor::{FaceRegionExtractor, FaceRegions};
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::recommendation::domain::recommendation_engine::RecommendationEngine;
use crate::recommendation::domain::rule_table::RuleTable;
use crate::scoring::confidence_engine::{compute_confidence, ConfidenceResult};
use crate::scoring::skin_scoring_engine::compute_skin_scores;
use crate::scoring::skin_scores::SkinScores;
use crate::shared::frame::Frame;
use crate::shared::image_codec::decode;

use super::consultation_logger::{elapsed_ms, ConsultationLogger};
use super::error::ConsultError;
use super::report::StaffReport;

/// Staff analysis: decode → extract → {confidence, scores} → recommend.
pub struct ConsultStaffUseCase {
    extractor: FaceRegionExtractor,
    recommender: RecommendationEngine,
}

impl ConsultStaffUseCase {
    pub fn new(detector: Box<dyn LandmarkDetector>, rules: RuleTable) -> Self {
        Self {
            extractor: FaceRegionExtractor::new(detector),
            recommender: RecommendationEngine::new(rules),
        }
    }

    /// Analyzes an uploaded image. Undecodable input fails before the
    /// landmark service is called.
    pub fn execute(
        &self,
        image_bytes: &[u8],
        logger: &mut dyn ConsultationLogger,
    ) -> Result<StaffReport, ConsultError> {
        let start = Instant::now();
        let frame = decode(image_bytes)?;
        logger.timing("decode", elapsed_ms(start));
        self.execute_frame(&frame, logger)
    }

    pub fn execute_frame(
        &self,
        frame: &Frame,
        logger: &mut dyn ConsultationLogger,
    ) -> Result<StaffReport, ConsultError> {
        let start = Instant::now();
        let regions = self.extractor.extract(frame)?;
        logger.timing("extract", elapsed_ms(start));

        if !regions.detected {
            logger.info("Staff consultation: no face detected");
            logger.completed();
            return Ok(StaffReport::no_face());
        }

        let (confidence, scores) = analyze(frame, &regions, logger);

        let start = Instant::now();
        let report = StaffReport {
            face_detected: true,
            skin_scores: Some(scores.rounded()),
            confidence_score: confidence.score,
            manual_review_required: confidence.manual_review_required,
            top_3_services: self.recommender.top3_services(&scores),
            suggested_roadmap: self.recommender.suggested_roadmap(&scores),
            improvement_projection: self.recommender.improvement_projection(&scores),
        };
        logger.timing("recommend", elapsed_ms(start));

        log::info!(
            "Staff consultation: confidence {} (manual review: {}), roadmap {:?}",
            report.confidence_score,
            report.manual_review_required,
            report.suggested_roadmap
        );
        logger.completed();
        Ok(report)
    }
}

/// Confidence and skin scores computed concurrently; both only read the
/// shared regions.
pub(crate) fn analyze(
    frame: &Frame,
    regions: &FaceRegions,
    logger: &mut dyn ConsultationLogger,
) -> (ConfidenceResult, SkinScores) {
    let ((confidence, confidence_ms), (scores, score_ms)) = thread::scope(|s| {
        let confidence = s.spawn(|| timed(|| compute_confidence(regions)));
        let scores = timed(|| compute_skin_scores(frame, regions));
        let confidence = confidence
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (confidence, scores)
    });

    logger.timing("confidence", confidence_ms);
    logger.timing("score", score_ms);
    logger.metric("confidence", confidence.score);
    (confidence, scores)
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, elapsed_ms(start))
}
