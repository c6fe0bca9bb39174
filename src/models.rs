use serde::{Deserialize, Serialize};

/// A pixel or normalized (0-1) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Point {
        Point::new(self.x * sx, self.y * sy)
    }
}

/// Four card corners ordered clockwise starting at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardCorners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl CardCorners {
    /// Build corners from four points in any order.
    ///
    /// Points are sorted by their angle around the centroid (which walks
    /// clockwise in image coordinates, where y grows downwards) and the
    /// sequence is then rotated so the point with the smallest `x + y`
    /// comes first.
    pub fn from_unordered(points: [Point; 4]) -> Self {
        let cx = points.iter().map(|p| p.x).sum::<f64>() / 4.0;
        let cy = points.iter().map(|p| p.y).sum::<f64>() / 4.0;

        let mut by_angle: Vec<(f64, Point)> = points
            .iter()
            .map(|p| ((p.y - cy).atan2(p.x - cx), *p))
            .collect();
        by_angle.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        // First minimum wins on ties
        let mut start = 0;
        for (i, (_, p)) in by_angle.iter().enumerate() {
            let (_, best) = by_angle[start];
            if p.x + p.y < best.x + best.y {
                start = i;
            }
        }

        let at = |offset: usize| by_angle[(start + offset) % 4].1;
        Self {
            top_left: at(0),
            top_right: at(1),
            bottom_right: at(2),
            bottom_left: at(3),
        }
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn points(&self) -> [Point; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }

    /// Apply `f` to every corner, keeping the order.
    pub fn map(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        Self {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            bottom_left: f(self.bottom_left),
        }
    }

    /// Lengths of the top, right, bottom and left sides.
    pub fn side_lengths(&self) -> [f64; 4] {
        [
            self.top_left.distance(&self.top_right),
            self.top_right.distance(&self.bottom_right),
            self.bottom_right.distance(&self.bottom_left),
            self.bottom_left.distance(&self.top_left),
        ]
    }

    /// Polygon area (shoelace formula).
    pub fn area(&self) -> f64 {
        let pts = self.points();
        let mut twice = 0.0;
        for i in 0..4 {
            let a = pts[i];
            let b = pts[(i + 1) % 4];
            twice += a.x * b.y - b.x * a.y;
        }
        twice.abs() / 2.0
    }

    /// Interior angles in degrees, one per corner in clockwise order.
    pub fn interior_angles(&self) -> [f64; 4] {
        let pts = self.points();
        let mut angles = [0.0; 4];
        for (i, angle) in angles.iter_mut().enumerate() {
            let prev = pts[(i + 3) % 4];
            let curr = pts[i];
            let next = pts[(i + 1) % 4];
            let (ax, ay) = (prev.x - curr.x, prev.y - curr.y);
            let (bx, by) = (next.x - curr.x, next.y - curr.y);
            let denom = ax.hypot(ay) * bx.hypot(by);
            *angle = if denom == 0.0 {
                0.0
            } else {
                ((ax * bx + ay * by) / denom).clamp(-1.0, 1.0).acos().to_degrees()
            };
        }
        angles
    }
}

/// A scored card outline produced by the detector for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionCandidate {
    pub corners: CardCorners,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f64, h: f64) -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    }

    #[test]
    fn orders_shuffled_points_clockwise() {
        let [tl, tr, br, bl] = rect(100.0, 140.0);
        let corners = CardCorners::from_unordered([br, tl, bl, tr]);
        assert_eq!(corners.top_left, tl);
        assert_eq!(corners.top_right, tr);
        assert_eq!(corners.bottom_right, br);
        assert_eq!(corners.bottom_left, bl);
    }

    #[test]
    fn orders_rotated_quad() {
        // Slightly rotated card: top-left is still the smallest x + y
        let pts = [
            Point::new(110.0, 12.0),
            Point::new(8.0, 20.0),
            Point::new(20.0, 160.0),
            Point::new(122.0, 150.0),
        ];
        let corners = CardCorners::from_unordered(pts);
        assert_eq!(corners.top_left, Point::new(8.0, 20.0));
        assert_eq!(corners.top_right, Point::new(110.0, 12.0));
        assert_eq!(corners.bottom_right, Point::new(122.0, 150.0));
        assert_eq!(corners.bottom_left, Point::new(20.0, 160.0));
    }

    #[test]
    fn area_and_angles_of_rectangle() {
        let corners = CardCorners::from_unordered(rect(100.0, 140.0));
        assert!((corners.area() - 14_000.0).abs() < 1e-9);
        for angle in corners.interior_angles() {
            assert!((angle - 90.0).abs() < 1e-9);
        }
        assert_eq!(corners.side_lengths(), [100.0, 140.0, 100.0, 140.0]);
    }
}
