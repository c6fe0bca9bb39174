use image::DynamicImage;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use anyhow::Result;

use crate::config::DetectorConfig;
use crate::detection::CardDetector;
use crate::detection::smoothing::CornerSmoother;
use crate::models::CardCorners;

/// Data that flows through the pipeline: the current image plus the frame
/// it was derived from.
#[derive(Clone)]
pub struct FrameData {
    /// Current image (working resolution after downscaling)
    pub image: DynamicImage,

    /// The untouched input frame (shared via Arc)
    pub original: Arc<DynamicImage>,

    /// Values recorded by steps for later ones (e.g. "scale_x")
    pub metadata: HashMap<String, MetadataValue>,

    /// Position of the frame in its stream; names debug images
    pub frame_index: u64,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Float(f64),
    String(String),
}

impl FrameData {
    pub fn from_image(image: DynamicImage, frame_index: u64) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            metadata: HashMap::new(),
            frame_index,
        }
    }

    /// Same frame, new image
    pub fn with_image(&self, image: DynamicImage) -> Self {
        Self {
            image,
            original: self.original.clone(),
            metadata: self.metadata.clone(),
            frame_index: self.frame_index,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn original_size(&self) -> (u32, u32) {
        (self.original.width(), self.original.height())
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }
        Ok(Self { output_dir })
    }

    /// Save one image as `<dir_name>/NN.png`, numbered from 01 by frame
    pub fn save(
        &self,
        dir_name: &str,
        frame_index: u64,
        image: &DynamicImage,
        verbose: bool,
    ) -> Result<()> {
        let dir = self.output_dir.join(dir_name);
        std::fs::create_dir_all(&dir)?;
        let filename = debug_filename(frame_index);
        let path = dir.join(&filename);
        image
            .save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image {}: {}", path.display(), e))?;
        if verbose {
            println!("  Debug: saved {}/{}", dir_name, filename);
        }
        Ok(())
    }
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Transform one frame
    fn process(&self, data: FrameData, context: &PipelineContext) -> Result<FrameData>;

    /// Human-readable name for this step (used in verbose output and debug dirs)
    fn name(&self) -> &str;
}

fn debug_filename(frame_index: u64) -> String {
    format!("{:02}.png", frame_index + 1)
}

fn debug_dir_name(index: usize, step_name: &str) -> String {
    format!("{:02}_{}", index, step_name.to_lowercase().replace(' ', "_"))
}

/// Composable pipeline builder
#[derive(Clone)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
    /// Index of the first step in debug directory names
    first_index: usize,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
            first_index: 1,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Share an already validated debug directory between pipelines
    pub fn with_debug_config(mut self, debug: Option<DebugConfig>) -> Self {
        self.context.debug = debug;
        self
    }

    /// Number debug directories from `index` (for pipelines that continue
    /// another one)
    pub fn starting_at(mut self, index: usize) -> Self {
        self.first_index = index;
        self
    }

    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run on a fresh frame; the input is saved as `00_input` in debug mode
    pub fn run(&self, input: DynamicImage, frame_index: u64) -> Result<FrameData> {
        if let Some(debug) = &self.context.debug {
            debug.save("00_input", frame_index, &input, self.context.verbose)?;
        }
        self.run_from(FrameData::from_image(input, frame_index))
    }

    /// Continue processing data produced by another pipeline
    pub fn run_from(&self, mut data: FrameData) -> Result<FrameData> {
        for (step_idx, step) in self.steps.iter().enumerate() {
            if self.context.verbose {
                println!("Running step: {}", step.name());
            }

            data = step.process(data, &self.context)?;

            if let Some(debug) = &self.context.debug {
                let dir_name = debug_dir_name(self.first_index + step_idx, step.name());
                debug.save(&dir_name, data.frame_index, &data.image, self.context.verbose)?;
            }
        }

        Ok(data)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome for one sampled frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    pub frame_index: u64,
    /// Smoothed, frame-normalized corners, or `None` when no card was found
    pub corners: Option<CardCorners>,
}

enum WorkerMessage {
    Frame(u64, DynamicImage),
    Reset,
}

/// Runs detection on a background thread.
///
/// Frames are submitted from the capture side; every `sample_interval`-th
/// one is detected and smoothed, and a [`FrameResult`] is sent back. The
/// worker thread owns both the detector and the smoother.
pub struct FrameWorker {
    sender: Option<Sender<WorkerMessage>>,
    results: Receiver<FrameResult>,
    handle: Option<JoinHandle<()>>,
    submitted: u64,
    sample_interval: u64,
}

impl FrameWorker {
    pub fn spawn(config: DetectorConfig) -> Result<Self> {
        let sample_interval = config.sample_interval.max(1);
        let mut smoother = CornerSmoother::with_capacity(config.smoothing_window);
        let detector = CardDetector::new(config)?;

        let (sender, inbox) = mpsc::channel::<WorkerMessage>();
        let (outbox, results) = mpsc::channel();

        let handle = std::thread::Builder::new()
            .name("card-detector".to_string())
            .spawn(move || {
                for message in inbox {
                    let (frame_index, frame) = match message {
                        WorkerMessage::Frame(index, frame) => (index, frame),
                        WorkerMessage::Reset => {
                            smoother.reset();
                            continue;
                        }
                    };

                    let detected = match detector.detect_frame(&frame, frame_index) {
                        Ok(candidate) => candidate.map(|c| c.corners),
                        Err(e) => {
                            log::warn!("frame {frame_index}: detection failed: {e:#}");
                            None
                        }
                    };
                    let corners = smoother.add_corners(detected);
                    log::trace!("frame {frame_index}: card {}", corners.is_some());

                    if outbox.send(FrameResult { frame_index, corners }).is_err() {
                        // Consumer went away
                        break;
                    }
                }
            })?;

        Ok(Self {
            sender: Some(sender),
            results,
            handle: Some(handle),
            submitted: 0,
            sample_interval,
        })
    }

    /// Offer a frame. Returns `true` when it was queued for detection,
    /// `false` when it was skipped by sampling.
    pub fn submit(&mut self, frame: DynamicImage) -> Result<bool> {
        let index = self.submitted;
        self.submitted += 1;
        if index % self.sample_interval != 0 {
            return Ok(false);
        }

        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Frame worker has been shut down"))?;
        sender
            .send(WorkerMessage::Frame(index, frame))
            .map_err(|e| anyhow::anyhow!("Failed to send frame to worker: {}", e))?;
        Ok(true)
    }

    /// Clear the smoothing history (e.g. after the user moved to another card)
    pub fn reset(&self) -> Result<()> {
        if let Some(sender) = &self.sender {
            sender
                .send(WorkerMessage::Reset)
                .map_err(|e| anyhow::anyhow!("Failed to reset worker: {}", e))?;
        }
        Ok(())
    }

    /// Newest available result; older pending ones are discarded.
    pub fn try_latest(&self) -> Option<FrameResult> {
        self.results.try_iter().last()
    }

    /// Block until the next result arrives
    pub fn recv(&self) -> Result<FrameResult> {
        self.results
            .recv()
            .map_err(|e| anyhow::anyhow!("Frame worker stopped: {}", e))
    }

    pub fn frames_submitted(&self) -> u64 {
        self.submitted
    }

    /// Stop accepting frames, wait for queued ones, and return their results.
    pub fn shutdown(mut self) -> Result<Vec<FrameResult>> {
        self.stop()?;
        Ok(self.results.try_iter().collect())
    }

    fn stop(&mut self) -> Result<()> {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("Frame worker thread panicked"))?;
        }
        Ok(())
    }
}

impl Drop for FrameWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("{e}");
        }
    }
}
