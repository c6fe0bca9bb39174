mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from tcg_grader for tests
pub use tcg_grader::grading::{CardSide, Company, GradingStandard};
pub use tcg_grader::measurement::{BorderBoundaries, CenteringMeasurements, Rect};
pub use tcg_grader::{CardCorners, CardDetector, DetectorConfig, Point};
