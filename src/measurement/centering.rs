use serde::{Deserialize, Serialize};

use super::BorderBoundaries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalSplit {
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalSplit {
    pub top: f64,
    pub bottom: f64,
}

/// Percentage split of the border on each axis; each pair sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenteringMeasurements {
    pub left_right: HorizontalSplit,
    pub top_bottom: VerticalSplit,
}

impl CenteringMeasurements {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left_right: HorizontalSplit { left, right },
            top_bottom: VerticalSplit { top, bottom },
        }
    }

    /// Distance of the larger left/right share from an even 50/50 split.
    pub fn left_right_deviation(&self) -> f64 {
        (self.left_right.left.max(self.left_right.right) - 50.0).abs()
    }

    /// Distance of the larger top/bottom share from an even 50/50 split.
    pub fn top_bottom_deviation(&self) -> f64 {
        (self.top_bottom.top.max(self.top_bottom.bottom) - 50.0).abs()
    }
}

/// Split the border widths on each axis into percentages.
///
/// A zero-width axis (both borders touching the card edge) counts as
/// perfectly centered.
pub fn calculate_centering(boundaries: &BorderBoundaries) -> CenteringMeasurements {
    let outer = boundaries.outer();
    let inner = boundaries.inner();

    let left = inner.left - outer.left;
    let right = outer.right - inner.right;
    let top = inner.top - outer.top;
    let bottom = outer.bottom - inner.bottom;

    let (left_pct, right_pct) = split(left, right);
    let (top_pct, bottom_pct) = split(top, bottom);

    CenteringMeasurements::new(left_pct, right_pct, top_pct, bottom_pct)
}

fn split(a: f64, b: f64) -> (f64, f64) {
    let total = a + b;
    if total <= 0.0 {
        return (50.0, 50.0);
    }
    (
        (a / total * 100.0).clamp(0.0, 100.0),
        (b / total * 100.0).clamp(0.0, 100.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Rect;

    fn boundaries(inner: Rect) -> BorderBoundaries {
        BorderBoundaries::new(Rect::new(0.0, 400.0, 0.0, 300.0), inner).unwrap()
    }

    #[test]
    fn even_borders_are_centered() {
        let c = calculate_centering(&boundaries(Rect::new(20.0, 380.0, 15.0, 285.0)));
        assert_eq!(c, CenteringMeasurements::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn uneven_left_right() {
        let c = calculate_centering(&boundaries(Rect::new(20.0, 380.0, 45.0, 270.0)));
        assert!((c.left_right.left - 60.0).abs() < 1e-9);
        assert!((c.left_right.right - 40.0).abs() < 1e-9);
        assert!((c.left_right_deviation() - 10.0).abs() < 1e-9);
        assert_eq!(c.top_bottom_deviation(), 0.0);
    }

    #[test]
    fn zero_width_axis_is_fifty_fifty() {
        let c = calculate_centering(&boundaries(Rect::new(0.0, 400.0, 0.0, 300.0)));
        assert_eq!(c, CenteringMeasurements::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn one_sided_border() {
        let c = calculate_centering(&boundaries(Rect::new(0.0, 380.0, 10.0, 300.0)));
        assert_eq!(c.left_right.left, 100.0);
        assert_eq!(c.left_right.right, 0.0);
        assert_eq!(c.top_bottom.top, 0.0);
        assert_eq!(c.top_bottom.bottom, 100.0);
        assert_eq!(c.left_right_deviation(), 50.0);
    }
}
