use serde::{Deserialize, Serialize};

use super::{BorderBoundaries, CardDimensions};

/// Worst border width as a percentage of the card's shorter side.
///
/// Grading follows the worst side, so the maximum is returned rather than
/// an average.
pub fn calculate_border_wear(boundaries: &BorderBoundaries, dimensions: &CardDimensions) -> f64 {
    let reference = dimensions.width.min(dimensions.height);
    if reference.is_nan() || reference <= 0.0 {
        log::warn!("border wear requested for empty card dimensions {:?}", dimensions);
        return 0.0;
    }

    let outer = boundaries.outer();
    let inner = boundaries.inner();
    let widths = [
        inner.top - outer.top,
        outer.bottom - inner.bottom,
        inner.left - outer.left,
        outer.right - inner.right,
    ];

    widths
        .iter()
        .map(|w| w / reference * 100.0)
        .fold(0.0_f64, f64::max)
        .clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

/// Position of the two lines marking one corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerLines {
    /// Y position of the horizontal line.
    pub horizontal: f64,
    /// X position of the vertical line.
    pub vertical: f64,
}

/// Per-corner line pairs used by the corner-wear model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerBoundaries {
    pub top_left: CornerLines,
    pub top_right: CornerLines,
    pub bottom_left: CornerLines,
    pub bottom_right: CornerLines,
}

impl CornerBoundaries {
    pub fn lines(&self, corner: Corner) -> CornerLines {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerWearPercentages {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
    pub max_wear: f64,
}

/// Wear of one corner: the mean of the horizontal line's offset from the
/// card's top/bottom edge (as % of height) and the vertical line's offset
/// from the left/right edge (as % of width).
pub fn calculate_single_corner_wear(
    corner: Corner,
    boundaries: &CornerBoundaries,
    dimensions: &CardDimensions,
) -> f64 {
    if dimensions.width.is_nan()
        || dimensions.height.is_nan()
        || dimensions.width <= 0.0
        || dimensions.height <= 0.0
    {
        return 0.0;
    }
    let lines = boundaries.lines(corner);
    let (edge_y, edge_x) = match corner {
        Corner::TopLeft => (dimensions.top_edge, dimensions.left_edge),
        Corner::TopRight => (dimensions.top_edge, dimensions.right_edge),
        Corner::BottomLeft => (dimensions.bottom_edge, dimensions.left_edge),
        Corner::BottomRight => (dimensions.bottom_edge, dimensions.right_edge),
    };

    let horizontal = (lines.horizontal - edge_y).abs() / dimensions.height * 100.0;
    let vertical = (lines.vertical - edge_x).abs() / dimensions.width * 100.0;

    ((horizontal + vertical) / 2.0).clamp(0.0, 100.0)
}

pub fn calculate_corner_wear_percentages(
    boundaries: &CornerBoundaries,
    dimensions: &CardDimensions,
) -> CornerWearPercentages {
    let wear = |corner| calculate_single_corner_wear(corner, boundaries, dimensions);
    let top_left = wear(Corner::TopLeft);
    let top_right = wear(Corner::TopRight);
    let bottom_left = wear(Corner::BottomLeft);
    let bottom_right = wear(Corner::BottomRight);

    CornerWearPercentages {
        top_left,
        top_right,
        bottom_left,
        bottom_right,
        max_wear: top_left.max(top_right).max(bottom_left).max(bottom_right),
    }
}
