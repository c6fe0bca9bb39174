pub mod preprocessing;
pub mod contours;
pub mod quad;
pub mod coords;
pub mod smoothing;
pub mod steps;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::DynamicImage;

use crate::config::DetectorConfig;
use crate::models::{CardCorners, DetectionCandidate, Point};
use crate::pipeline::{DebugConfig, Pipeline};
use coords::ScaleFactors;
use steps::{AdaptiveThresholdStep, ClosingStep, DownscaleStep, EdgeDetectionStep};

pub use coords::DisplayMapping;
pub use quad::{QuadMetrics, QuadRejection};
pub use smoothing::CornerSmoother;

/// Where a detection run currently is; reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionStage {
    Idle,
    Preprocessed,
    EdgesExtracted,
    ContoursFound,
    CandidatesScored,
    BestSelected,
    NoneFound,
}

/// Finds the most card-like quadrilateral in a frame.
pub struct CardDetector {
    config: DetectorConfig,
    preprocess: Pipeline,
    edge_passes: Vec<Pipeline>,
    /// Frames seen through `detect`, for numbering debug images
    frames_seen: AtomicU64,
}

impl CardDetector {
    pub fn new(config: DetectorConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let debug = match &config.debug_dir {
            Some(dir) => Some(DebugConfig::new(dir.clone())?),
            None => None,
        };

        let preprocess = Pipeline::new()
            .with_verbose(config.verbose)
            .with_debug_config(debug.clone())
            .add_step(Arc::new(DownscaleStep {
                max_width: config.working_width,
                max_height: config.working_height,
            }))
            .add_step(Arc::new(AdaptiveThresholdStep {
                block_radius: config.adaptive_block_radius,
                offset: config.adaptive_offset,
            }))
            .add_step(Arc::new(ClosingStep {
                radius: config.closing_radius,
            }));

        let edge_passes = config
            .passes
            .iter()
            .map(|pass| {
                Pipeline::new()
                    .with_verbose(config.verbose)
                    .with_debug_config(debug.clone())
                    .starting_at(preprocess.len() + 1)
                    .add_step(Arc::new(EdgeDetectionStep::new(pass.clone())))
            })
            .collect();

        Ok(Self {
            config,
            preprocess,
            edge_passes,
            frames_seen: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect the best card candidate, with corners normalized to the frame.
    ///
    /// Successive calls are numbered 0, 1, 2... in debug output.
    pub fn detect(&self, frame: &DynamicImage) -> anyhow::Result<Option<DetectionCandidate>> {
        let frame_index = self.frames_seen.fetch_add(1, Ordering::Relaxed);
        self.detect_frame(frame, frame_index)
    }

    /// Like [`CardDetector::detect`], with the caller's frame number used
    /// for debug image names.
    pub fn detect_frame(
        &self,
        frame: &DynamicImage,
        frame_index: u64,
    ) -> anyhow::Result<Option<DetectionCandidate>> {
        if frame.width() == 0 || frame.height() == 0 {
            log::warn!("empty frame, skipping detection");
            return Ok(None);
        }

        log::debug!("{:?}: {}x{} frame", DetectionStage::Idle, frame.width(), frame.height());
        let prepared = self.preprocess.run(frame.clone(), frame_index)?;
        let working = (prepared.image.width(), prepared.image.height());
        let scale = ScaleFactors {
            x: prepared.get_float("scale_x").unwrap_or(1.0),
            y: prepared.get_float("scale_y").unwrap_or(1.0),
        };
        log::debug!(
            "{:?}: working size {}x{}, scale {:.3}/{:.3}",
            DetectionStage::Preprocessed,
            working.0,
            working.1,
            scale.x,
            scale.y
        );

        let mut best: Option<DetectionCandidate> = None;
        for (pass, pipeline) in self.config.passes.iter().zip(&self.edge_passes) {
            let edges = pipeline.run_from(prepared.clone())?;
            log::debug!("{:?}: pass {}", DetectionStage::EdgesExtracted, pass.name);

            let found = self.candidates_in(&edges.image.to_luma8());
            log::debug!(
                "{:?}: pass {} produced {} candidates",
                DetectionStage::CandidatesScored,
                pass.name,
                found.len()
            );

            for candidate in found {
                // Strictly greater keeps the earliest of equal scores
                if best.is_none_or(|b| candidate.score > b.score) {
                    best = Some(candidate);
                }
            }

            if best.is_some_and(|b| b.score > self.config.early_exit_score) {
                log::debug!("pass {} is confident enough, stopping", pass.name);
                break;
            }
        }

        let Some(best) = best else {
            log::debug!("{:?}", DetectionStage::NoneFound);
            return Ok(None);
        };

        let corners = coords::normalize_corners(&best.corners, scale, prepared.original_size());
        log::debug!("{:?}: score {:.3}", DetectionStage::BestSelected, best.score);
        Ok(Some(DetectionCandidate {
            corners,
            score: best.score,
        }))
    }

    /// Valid, scored quads in a binary edge image (working-image pixels).
    pub fn candidates_in(&self, edges: &image::GrayImage) -> Vec<DetectionCandidate> {
        let frame_area = edges.width() as f64 * edges.height() as f64;
        let outlines = contours::external_contours(edges);
        log::debug!("{:?}: {} external contours", DetectionStage::ContoursFound, outlines.len());

        let mut candidates = Vec::new();
        for outline in outlines {
            let ratio = contours::polygon_area(&outline) / frame_area;
            if ratio < self.config.min_area_ratio || ratio > self.config.max_area_ratio {
                continue;
            }

            let epsilon = self.config.approx_epsilon_factor * contours::perimeter(&outline);
            let polygon = contours::approx_poly_dp(&outline, epsilon);
            let points: [Point; 4] = match polygon.try_into() {
                Ok(points) => points,
                Err(polygon) => {
                    log::trace!("discarding {}-vertex polygon", polygon.len());
                    continue;
                }
            };

            let corners = CardCorners::from_unordered(points);
            match quad::validate(&corners, frame_area, &self.config) {
                Ok(metrics) => candidates.push(DetectionCandidate {
                    corners,
                    score: quad::score(&metrics, &self.config),
                }),
                Err(reason) => log::trace!("discarding quad: {reason}"),
            }
        }
        candidates
    }
}
