//! Boundary geometry and the measurements derived from it.
//!
//! Everything here is a pure function of its inputs; nothing keeps state
//! between calls.

pub mod boundaries;
pub mod centering;
pub mod wear;

pub use boundaries::{
    BorderBoundaries, CardDimensions, Edge, Layer, Rect, corners_to_initial_boundaries,
    estimate_card_dimensions, initialize_border_boundaries, CARD_ASPECT_RATIO,
    DEFAULT_INNER_OFFSET, DEFAULT_OUTER_OFFSET, MIN_INNER_SPAN,
};
pub use centering::{CenteringMeasurements, HorizontalSplit, VerticalSplit, calculate_centering};
pub use wear::{
    Corner, CornerBoundaries, CornerLines, CornerWearPercentages, calculate_border_wear,
    calculate_corner_wear_percentages, calculate_single_corner_wear,
};

/// Rejected boundary geometry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MeasurementError {
    #[error("invalid border boundaries: {0}")]
    InvalidBoundaries(String),
}
