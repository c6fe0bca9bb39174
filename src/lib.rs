pub mod config;
pub mod detection;
pub mod grading;
pub mod measurement;
pub mod models;
pub mod pipeline;

pub use config::{DetectorConfig, SensitivityPass};
pub use detection::{CardDetector, CornerSmoother, DetectionStage, DisplayMapping};
pub use grading::{CardSide, Company, GradeResolver, GradingError, GradingResult};
pub use measurement::{BorderBoundaries, CenteringMeasurements, MeasurementError, Rect};
pub use models::{CardCorners, DetectionCandidate, Point};
pub use pipeline::{
    DebugConfig, FrameData, FrameResult, FrameWorker, MetadataValue, Pipeline, PipelineContext,
    PipelineStep,
};
