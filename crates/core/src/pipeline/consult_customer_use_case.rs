use std::time::Instant;

use crate::detection::domain::face_region_extractor::FaceRegionExtractor;
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::recommendation::domain::recommendation_engine::RecommendationEngine;
use crate::recommendation::domain::rule_table::RuleTable;
use crate::scoring::skin_scoring_engine::compute_skin_scores;
use crate::shared::constants::FALLBACK_SERVICE;
use crate::shared::frame::Frame;
use crate::shared::image_codec::{decode, EncodedFormat};
use crate::simulation::simulation_engine::before_after;

use super::consultation_logger::{elapsed_ms, ConsultationLogger};
use super::error::ConsultError;
use super::report::CustomerReport;

/// How customer-facing images are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationOptions {
    /// Layer this many days of product use on top of the service effect.
    pub product_days: Option<u32>,
    pub format: EncodedFormat,
}

/// Customer view: decode → extract → score → top service → before/after.
pub struct ConsultCustomerUseCase {
    extractor: FaceRegionExtractor,
    recommender: RecommendationEngine,
    options: SimulationOptions,
}

impl ConsultCustomerUseCase {
    pub fn new(
        detector: Box<dyn LandmarkDetector>,
        rules: RuleTable,
        options: SimulationOptions,
    ) -> Self {
        Self {
            extractor: FaceRegionExtractor::new(detector),
            recommender: RecommendationEngine::new(rules),
            options,
        }
    }

    pub fn execute(
        &self,
        image_bytes: &[u8],
        logger: &mut dyn ConsultationLogger,
    ) -> Result<CustomerReport, ConsultError> {
        let start = Instant::now();
        let frame = decode(image_bytes)?;
        logger.timing("decode", elapsed_ms(start));
        self.execute_frame(&frame, logger)
    }

    pub fn execute_frame(
        &self,
        frame: &Frame,
        logger: &mut dyn ConsultationLogger,
    ) -> Result<CustomerReport, ConsultError> {
        let start = Instant::now();
        let regions = self.extractor.extract(frame)?;
        logger.timing("extract", elapsed_ms(start));

        if !regions.detected {
            logger.info("Customer consultation: no face detected");
            logger.completed();
            return Ok(CustomerReport::no_face(self.options.format));
        }

        let start = Instant::now();
        let scores = compute_skin_scores(frame, &regions);
        logger.timing("score", elapsed_ms(start));

        let service = self
            .recommender
            .top3_services(&scores)
            .into_iter()
            .next()
            .map(|r| r.service)
            .unwrap_or_else(|| FALLBACK_SERVICE.to_string());

        let start = Instant::now();
        let images = before_after(
            regions.face_crop.as_ref(),
            &service,
            self.options.product_days,
            self.options.format,
        );
        logger.timing("simulate", elapsed_ms(start));

        log::info!("Customer consultation: simulated {service}");
        logger.completed();
        Ok(CustomerReport::from_simulation(true, Some(service), images))
    }
}
