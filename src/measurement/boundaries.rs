use serde::{Deserialize, Serialize};

use crate::models::CardCorners;

use super::MeasurementError;

/// Smallest distance kept between opposite inner lines, in pixels.
pub const MIN_INNER_SPAN: f64 = 1.0;

/// Cap on the inner gap relative to the outer extent, so normalized (0-1)
/// boundaries keep room to move.
const MIN_INNER_FRACTION: f64 = 0.01;

/// Default distance the outer lines are placed outside the card edges.
pub const DEFAULT_OUTER_OFFSET: f64 = 30.0;

/// Default distance the inner lines are placed inside the card edges.
pub const DEFAULT_INNER_OFFSET: f64 = 20.0;

/// Typical printed border as a fraction of card width/height.
const STANDARD_BORDER_FRACTION: f64 = 0.035;

/// Minimum half-gap kept around the card midpoint for detected inner lines.
const MIDPOINT_MARGIN: f64 = 10.0;

/// Height / width of a standard trading card (3.5" x 2.5").
pub const CARD_ASPECT_RATIO: f64 = 3.5 / 2.5;

/// Axis-aligned rectangle given by its four edge coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Rect {
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self { top, bottom, left, right }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn is_finite(&self) -> bool {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .all(|v| v.is_finite())
    }

    fn edge(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }

    fn edge_mut(&mut self, edge: Edge) -> &mut f64 {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
            Edge::Right => &mut self.right,
        }
    }
}

/// Which of the two boundary rectangles a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Outer,
    Inner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Physical card edge (`outer`) and printed-border edge (`inner`).
///
/// The inner rectangle is always contained in the outer one:
/// `outer.left <= inner.left < inner.right <= outer.right`, and the same
/// vertically. Fields are private so every mutation goes through an
/// operation that re-clamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderBoundaries {
    outer: Rect,
    inner: Rect,
}

impl BorderBoundaries {
    /// Validate and build a boundary pair.
    pub fn new(outer: Rect, inner: Rect) -> Result<Self, MeasurementError> {
        if !outer.is_finite() || !inner.is_finite() {
            return Err(MeasurementError::InvalidBoundaries(
                "coordinates must be finite".to_string(),
            ));
        }
        let horizontal_ok =
            outer.left <= inner.left && inner.left < inner.right && inner.right <= outer.right;
        let vertical_ok =
            outer.top <= inner.top && inner.top < inner.bottom && inner.bottom <= outer.bottom;
        if !horizontal_ok || !vertical_ok {
            return Err(MeasurementError::InvalidBoundaries(format!(
                "inner {:?} is not contained in outer {:?}",
                inner, outer
            )));
        }
        Ok(Self { outer, inner })
    }

    /// Build a boundary pair, pulling the inner rectangle inside the outer one.
    ///
    /// Fails only when the outer rectangle itself is too small to hold an
    /// inner rectangle.
    pub fn clamped(outer: Rect, inner: Rect) -> Result<Self, MeasurementError> {
        if !outer.is_finite() || !inner.is_finite() {
            return Err(MeasurementError::InvalidBoundaries(
                "coordinates must be finite".to_string(),
            ));
        }
        if outer.width() <= 0.0 || outer.height() <= 0.0 {
            return Err(MeasurementError::InvalidBoundaries(format!(
                "outer rectangle {:?} has no area",
                outer
            )));
        }
        let mut boundaries = Self { outer, inner };
        boundaries.reclamp();
        Ok(boundaries)
    }

    pub fn outer(&self) -> &Rect {
        &self.outer
    }

    pub fn inner(&self) -> &Rect {
        &self.inner
    }

    /// Move a single line by `delta` and re-clamp so containment still holds.
    pub fn move_edge(&mut self, layer: Layer, edge: Edge, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        match layer {
            Layer::Outer => {
                let value = self.outer.edge(edge) + delta;
                // Outer lines may not pass the inner line they enclose
                let limited = match edge {
                    Edge::Top | Edge::Left => value.min(self.inner.edge(edge)),
                    Edge::Bottom | Edge::Right => value.max(self.inner.edge(edge)),
                };
                *self.outer.edge_mut(edge) = limited;
            }
            Layer::Inner => {
                let value = self.inner.edge(edge) + delta;
                // Never demand more room than the current span already has
                let gap_y = inner_gap(self.outer.height()).min(self.inner.height());
                let gap_x = inner_gap(self.outer.width()).min(self.inner.width());
                let (lo, hi) = match edge {
                    Edge::Top => (self.outer.top, self.inner.bottom - gap_y),
                    Edge::Bottom => (self.inner.top + gap_y, self.outer.bottom),
                    Edge::Left => (self.outer.left, self.inner.right - gap_x),
                    Edge::Right => (self.inner.left + gap_x, self.outer.right),
                };
                let limited = match edge {
                    Edge::Top | Edge::Left => value.clamp(lo, hi.max(lo)),
                    Edge::Bottom | Edge::Right => value.clamp(lo.min(hi), hi),
                };
                *self.inner.edge_mut(edge) = limited;
            }
        }
    }

    /// Replace the outer rectangle; the inner one is pulled back inside it.
    pub fn set_outer(&mut self, outer: Rect) -> Result<(), MeasurementError> {
        *self = Self::clamped(outer, self.inner)?;
        Ok(())
    }

    /// Replace the inner rectangle, clamped into the current outer one.
    pub fn set_inner(&mut self, inner: Rect) -> Result<(), MeasurementError> {
        *self = Self::clamped(self.outer, inner)?;
        Ok(())
    }

    fn reclamp(&mut self) {
        let outer = self.outer;
        let inner = &mut self.inner;
        (inner.left, inner.right) = clamp_span(inner.left, inner.right, outer.left, outer.right);
        (inner.top, inner.bottom) = clamp_span(inner.top, inner.bottom, outer.top, outer.bottom);
    }
}

/// Gap kept between opposite inner lines for an outer extent.
fn inner_gap(outer_extent: f64) -> f64 {
    MIN_INNER_SPAN.min(outer_extent * MIN_INNER_FRACTION)
}

/// Fit `[lo, hi]` inside `[min, max]` keeping at least the inner gap.
fn clamp_span(lo: f64, hi: f64, min: f64, max: f64) -> (f64, f64) {
    let gap = inner_gap(max - min);
    let mut lo = lo.clamp(min, max);
    let mut hi = hi.clamp(min, max);
    if hi - lo < gap {
        let mid = ((lo + hi) / 2.0).clamp(min + gap / 2.0, max - gap / 2.0);
        lo = mid - gap / 2.0;
        hi = mid + gap / 2.0;
    }
    (lo, hi)
}

/// Summary of the outer card rectangle used to normalize wear values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardDimensions {
    pub width: f64,
    pub height: f64,
    pub top_edge: f64,
    pub bottom_edge: f64,
    pub left_edge: f64,
    pub right_edge: f64,
}

impl CardDimensions {
    pub fn from_rect(rect: &Rect) -> Self {
        Self {
            width: rect.width(),
            height: rect.height(),
            top_edge: rect.top,
            bottom_edge: rect.bottom,
            left_edge: rect.left,
            right_edge: rect.right,
        }
    }
}

/// Guess where the card sits when nothing was detected: 80% of the image
/// width, standard card proportions, centered.
pub fn estimate_card_dimensions(image_width: f64, image_height: f64) -> CardDimensions {
    let width = image_width * 0.8;
    let height = width * CARD_ASPECT_RATIO;
    let left_edge = (image_width - width) / 2.0;
    let top_edge = (image_height - height) / 2.0;

    CardDimensions {
        width,
        height,
        top_edge,
        bottom_edge: top_edge + height,
        left_edge,
        right_edge: left_edge + width,
    }
}

/// Place outer lines `outer_offset` outside the card edges and inner lines
/// `inner_offset` inside them, constrained to the image.
pub fn initialize_border_boundaries(
    card: &CardDimensions,
    image_width: f64,
    image_height: f64,
    outer_offset: f64,
    inner_offset: f64,
) -> Result<BorderBoundaries, MeasurementError> {
    let outer = Rect {
        top: (card.top_edge - outer_offset).max(0.0),
        bottom: (card.bottom_edge + outer_offset).min(image_height),
        left: (card.left_edge - outer_offset).max(0.0),
        right: (card.right_edge + outer_offset).min(image_width),
    };

    let inner = Rect {
        top: (card.top_edge + inner_offset).max(outer.top + 1.0),
        bottom: (card.bottom_edge - inner_offset).min(outer.bottom - 1.0),
        left: (card.left_edge + inner_offset).max(outer.left + 1.0),
        right: (card.right_edge - inner_offset).min(outer.right - 1.0),
    };

    BorderBoundaries::clamped(outer, inner)
}

/// Turn detected corners (normalized 0-1) into a starting boundary pair.
///
/// The outer rectangle is the bounding box of the corners in pixels; the
/// inner rectangle assumes a standard printed border of 3.5% per side.
pub fn corners_to_initial_boundaries(
    corners: &CardCorners,
    image_width: f64,
    image_height: f64,
) -> Result<(BorderBoundaries, CardDimensions), MeasurementError> {
    let px = corners.map(|p| p.scale(image_width, image_height));

    let outer = Rect {
        left: px.top_left.x.min(px.bottom_left.x),
        right: px.top_right.x.max(px.bottom_right.x),
        top: px.top_left.y.min(px.top_right.y),
        bottom: px.bottom_left.y.max(px.bottom_right.y),
    };

    let border_x = outer.width() * STANDARD_BORDER_FRACTION;
    let border_y = outer.height() * STANDARD_BORDER_FRACTION;
    let mid_x = (outer.left + outer.right) / 2.0;
    let mid_y = (outer.top + outer.bottom) / 2.0;
    // Tiny cards cannot afford the full margin
    let margin_x = MIDPOINT_MARGIN.min(outer.width() / 4.0);
    let margin_y = MIDPOINT_MARGIN.min(outer.height() / 4.0);

    let inner = Rect {
        left: (outer.left + border_x).min(mid_x - margin_x),
        right: (outer.right - border_x).max(mid_x + margin_x),
        top: (outer.top + border_y).min(mid_y - margin_y),
        bottom: (outer.bottom - border_y).max(mid_y + margin_y),
    };

    let boundaries = BorderBoundaries::clamped(outer, inner)?;
    Ok((boundaries, CardDimensions::from_rect(&outer)))
}
