use crate::config::SensitivityPass;
use crate::detection::coords::ScaleFactors;
use crate::detection::preprocessing;
use crate::pipeline::{FrameData, MetadataValue, PipelineContext, PipelineStep};
use anyhow::Result;
use image::DynamicImage;

/// Shrink the frame to the working resolution and record the scale factors
pub struct DownscaleStep {
    pub max_width: u32,
    pub max_height: u32,
}

impl PipelineStep for DownscaleStep {
    fn process(&self, data: FrameData, _context: &PipelineContext) -> Result<FrameData> {
        let small = preprocessing::downscale(&data.image, self.max_width, self.max_height);
        let scale = ScaleFactors::between(data.original_size(), (small.width(), small.height()));
        Ok(data
            .with_image(small)
            .with_metadata("scale_x", MetadataValue::Float(scale.x))
            .with_metadata("scale_y", MetadataValue::Float(scale.y)))
    }

    fn name(&self) -> &str {
        "Downscaled"
    }
}

/// Grayscale conversion followed by local-mean binarization
pub struct AdaptiveThresholdStep {
    pub block_radius: u32,
    pub offset: i16,
}

impl PipelineStep for AdaptiveThresholdStep {
    fn process(&self, data: FrameData, _context: &PipelineContext) -> Result<FrameData> {
        let gray = preprocessing::to_grayscale(&data.image);
        let binary = preprocessing::adaptive_threshold(&gray, self.block_radius, self.offset);
        let foreground = preprocessing::foreground_ratio(&binary) as f64;
        Ok(data
            .with_image(DynamicImage::ImageLuma8(binary))
            .with_metadata("foreground_ratio", MetadataValue::Float(foreground)))
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Morphological closing of the binary image
pub struct ClosingStep {
    pub radius: u8,
}

impl PipelineStep for ClosingStep {
    fn process(&self, data: FrameData, _context: &PipelineContext) -> Result<FrameData> {
        let closed = preprocessing::close_gaps(&data.image.to_luma8(), self.radius);
        Ok(data.with_image(DynamicImage::ImageLuma8(closed)))
    }

    fn name(&self) -> &str {
        "Closed"
    }
}

/// Gaussian blur and Canny edges for one sensitivity pass
pub struct EdgeDetectionStep {
    pub pass: SensitivityPass,
    label: String,
}

impl EdgeDetectionStep {
    pub fn new(pass: SensitivityPass) -> Self {
        let label = format!("Edges {}", pass.name);
        Self { pass, label }
    }
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, data: FrameData, _context: &PipelineContext) -> Result<FrameData> {
        let gray = data.image.to_luma8();
        let blurred = preprocessing::apply_blur(&gray, self.pass.blur_sigma);
        let edges = preprocessing::detect_edges(&blurred, self.pass.canny_low, self.pass.canny_high);
        let edges = preprocessing::thicken_edges(&edges, 1);
        Ok(data
            .with_image(DynamicImage::ImageLuma8(edges))
            .with_metadata("pass", MetadataValue::String(self.pass.name.clone())))
    }

    fn name(&self) -> &str {
        &self.label
    }
}
