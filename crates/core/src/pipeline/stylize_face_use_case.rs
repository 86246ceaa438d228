use std::sync::Arc;
use std::time::Instant;

use crate::detection::domain::face_detector::FaceDetector;
use crate::generation::domain::cartoon_generator::CartoonGenerator;
use crate::geometry::domain::geometry_estimator;
use crate::sampling::domain::bounded_color_sampler::BoundedColorSampler;
use crate::sampling::domain::image_fetcher::ImageFetcher;
use crate::sampling::domain::region_planner::plan_regions;
use crate::shared::frame::Frame;

use super::pipeline_logger::PipelineLogger;
use super::stylize_error::StylizeError;
use super::stylization_params::{assemble, StylizationParams};

/// Single-photo pipeline: fetch → decode → detect → sample + measure →
/// assemble → (optionally) generate.
///
/// Holds no per-request state; each call starts from scratch.
pub struct StylizeFaceUseCase {
    fetcher: Arc<dyn ImageFetcher>,
    detector: Box<dyn FaceDetector>,
    sampler: BoundedColorSampler,
    generator: Box<dyn CartoonGenerator>,
    logger: Box<dyn PipelineLogger>,
    concurrent_sampling: bool,
}

impl StylizeFaceUseCase {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        detector: Box<dyn FaceDetector>,
        sampler: BoundedColorSampler,
        generator: Box<dyn CartoonGenerator>,
        logger: Box<dyn PipelineLogger>,
        concurrent_sampling: bool,
    ) -> Self {
        Self {
            fetcher,
            detector,
            sampler,
            generator,
            logger,
            concurrent_sampling,
        }
    }

    /// Derives stylization parameters without calling the generator.
    pub fn analyze(&mut self, locator: &str) -> Result<StylizationParams, StylizeError> {
        let result = self.derive_params(locator);
        self.logger.request_completed();
        result
    }

    /// Derives parameters and renders them, returning the generator's bytes.
    pub fn execute(&mut self, locator: &str) -> Result<Vec<u8>, StylizeError> {
        let result = self
            .derive_params(locator)
            .and_then(|params| self.render(locator, &params));
        self.logger.request_completed();
        result
    }

    pub fn logger(&self) -> &dyn PipelineLogger {
        self.logger.as_ref()
    }

    fn derive_params(&mut self, locator: &str) -> Result<StylizationParams, StylizeError> {
        let started = Instant::now();
        let bytes = self.fetcher.fetch(locator)?;
        self.logger.timing("fetch", elapsed_ms(started));

        let started = Instant::now();
        let frame = Frame::decode(&bytes)?;
        self.logger.timing("decode", elapsed_ms(started));

        let started = Instant::now();
        let face = self
            .detector
            .detect(&frame)
            .map_err(StylizeError::Detection)?;
        self.logger.timing("detect", elapsed_ms(started));
        let Some(face) = face else {
            self.logger.info(&format!("No face detected in {locator}"));
            return Err(StylizeError::NoFaceDetected);
        };

        let plan = plan_regions(&face.bounding_box, &face.landmarks);
        let started = Instant::now();
        let colors = self.sampler.sample_plan(
            locator,
            &plan,
            frame.width(),
            frame.height(),
            self.concurrent_sampling,
        );
        self.logger.timing("sample", elapsed_ms(started));
        self.logger
            .metric("fallback_regions", colors.fallback_count() as f64);

        let geometry = geometry_estimator::estimate(&face.landmarks);
        let params = assemble(&face, geometry, colors);
        self.logger.info(&format!(
            "Face: age {}, {}, facing {}, {}, tilt {:.1}°, hair {}, eyes {}, outfit {}",
            params.age,
            params.gender,
            params.head_turn,
            params.smile,
            params.head_tilt,
            params.hair_color,
            params.eye_color,
            params.outfit_color
        ));
        Ok(params)
    }

    fn render(
        &mut self,
        locator: &str,
        params: &StylizationParams,
    ) -> Result<Vec<u8>, StylizeError> {
        let started = Instant::now();
        let image = self
            .generator
            .generate(locator, params)
            .map_err(StylizeError::Generation)?;
        self.logger.timing("generate", elapsed_ms(started));
        Ok(image)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
