use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One Canny configuration tried by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPass {
    pub name: String,
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
}

impl SensitivityPass {
    pub fn new(name: &str, blur_sigma: f32, canny_low: f32, canny_high: f32) -> Self {
        Self {
            name: name.to_string(),
            blur_sigma,
            canny_low,
            canny_high,
        }
    }
}

/// Tuning for card detection and the frame worker.
///
/// Every field has a default, so a JSON file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Working resolution for portrait frames (landscape frames swap it).
    pub working_width: u32,
    pub working_height: u32,

    /// Half-size of the local-mean window for adaptive thresholding.
    pub adaptive_block_radius: u32,
    /// A pixel is foreground when it is this much darker than its local mean.
    pub adaptive_offset: i16,
    /// Radius of the morphological closing applied after thresholding.
    pub closing_radius: u8,

    /// Tried in order; detection stops after the first confident pass.
    pub passes: Vec<SensitivityPass>,
    pub early_exit_score: f64,

    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    pub optimal_area_ratio: f64,

    /// Long side over short side of a standard card.
    pub target_aspect_ratio: f64,
    pub aspect_ratio_tolerance: f64,
    /// Largest allowed relative difference between opposite sides.
    pub max_side_difference: f64,
    pub min_corner_angle: f64,
    pub max_corner_angle: f64,
    /// Douglas-Peucker epsilon as a fraction of the contour perimeter.
    pub approx_epsilon_factor: f64,

    /// Number of detections averaged by the corner smoother.
    pub smoothing_window: usize,
    /// The worker runs detection on every n-th submitted frame.
    pub sample_interval: u64,

    /// Write intermediate images here (directory must be empty or missing).
    pub debug_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            working_width: 480,
            working_height: 640,
            adaptive_block_radius: 7,
            adaptive_offset: 5,
            closing_radius: 2,
            passes: vec![
                SensitivityPass::new("conservative", 2.0, 60.0, 150.0),
                SensitivityPass::new("moderate", 1.5, 40.0, 100.0),
                SensitivityPass::new("aggressive", 1.0, 20.0, 60.0),
            ],
            early_exit_score: 0.8,
            min_area_ratio: 0.1,
            max_area_ratio: 0.9,
            optimal_area_ratio: 0.2,
            target_aspect_ratio: 1.4,
            aspect_ratio_tolerance: 0.15,
            max_side_difference: 0.3,
            min_corner_angle: 45.0,
            max_corner_angle: 135.0,
            approx_epsilon_factor: 0.02,
            smoothing_window: 5,
            sample_interval: 5,
            debug_dir: None,
            verbose: false,
        }
    }
}

impl DetectorConfig {
    /// Load overrides from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: DetectorConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the detector cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.working_width == 0 || self.working_height == 0 {
            anyhow::bail!("Working resolution must be non-zero");
        }
        if self.passes.is_empty() {
            anyhow::bail!("At least one sensitivity pass is required");
        }
        if !(0.0..=1.0).contains(&self.min_area_ratio)
            || !(0.0..=1.0).contains(&self.max_area_ratio)
            || self.min_area_ratio >= self.max_area_ratio
        {
            anyhow::bail!(
                "Invalid area band [{}, {}]",
                self.min_area_ratio,
                self.max_area_ratio
            );
        }
        if self.min_corner_angle >= self.max_corner_angle {
            anyhow::bail!(
                "Invalid corner angle band [{}, {}]",
                self.min_corner_angle,
                self.max_corner_angle
            );
        }
        if !(-255..=255).contains(&self.adaptive_offset) {
            anyhow::bail!(
                "Adaptive offset {} is outside -255..=255",
                self.adaptive_offset
            );
        }
        if self.smoothing_window == 0 {
            anyhow::bail!("Smoothing window must hold at least one detection");
        }
        if self.sample_interval == 0 {
            anyhow::bail!("Sample interval must be at least 1");
        }
        Ok(())
    }

    pub fn min_aspect_ratio(&self) -> f64 {
        self.target_aspect_ratio * (1.0 - self.aspect_ratio_tolerance)
    }

    pub fn max_aspect_ratio(&self) -> f64 {
        self.target_aspect_ratio * (1.0 + self.aspect_ratio_tolerance)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_debug_dir(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    pub fn with_sample_interval(mut self, interval: u64) -> Self {
        self.sample_interval = interval;
        self
    }

    pub fn with_passes(mut self, passes: Vec<SensitivityPass>) -> Self {
        self.passes = passes;
        self
    }
}
