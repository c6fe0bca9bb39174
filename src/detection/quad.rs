use crate::config::DetectorConfig;
use crate::models::CardCorners;

/// Shape measurements of an ordered quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadMetrics {
    /// Quad area over frame area
    pub area_ratio: f64,
    /// Long over short side, using the mean of each pair of opposite sides
    pub aspect_ratio: f64,
    /// Largest relative length difference between opposite sides
    pub side_difference: f64,
    /// Largest distance of an interior angle from 90 degrees
    pub max_angle_deviation: f64,
    pub min_angle: f64,
    pub max_angle: f64,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QuadRejection {
    #[error("degenerate quad")]
    Degenerate,
    #[error("area ratio {0:.3} outside allowed band")]
    Area(f64),
    #[error("aspect ratio {0:.3} outside allowed band")]
    Aspect(f64),
    #[error("opposite sides differ by {0:.3}")]
    NotParallel(f64),
    #[error("corner angle {0:.1} outside allowed band")]
    Angle(f64),
}

/// Rounding allowance on the aspect band edges.
const ASPECT_EPSILON: f64 = 1e-9;

fn relative_difference(a: f64, b: f64) -> f64 {
    let longest = a.max(b);
    if longest <= 0.0 {
        return 1.0;
    }
    (a - b).abs() / longest
}

/// Measure a quad, or `None` when it has a zero-length side.
pub fn measure(corners: &CardCorners, frame_area: f64) -> Option<QuadMetrics> {
    let [top, right, bottom, left] = corners.side_lengths();
    if [top, right, bottom, left].iter().any(|s| !s.is_finite() || *s <= 0.0) || frame_area <= 0.0
    {
        return None;
    }

    let horizontal = (top + bottom) / 2.0;
    let vertical = (left + right) / 2.0;
    let aspect_ratio = horizontal.max(vertical) / horizontal.min(vertical);

    let angles = corners.interior_angles();
    let min_angle = angles.iter().copied().fold(f64::INFINITY, f64::min);
    let max_angle = angles.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_angle_deviation = angles
        .iter()
        .map(|a| (a - 90.0).abs())
        .fold(0.0, f64::max);

    Some(QuadMetrics {
        area_ratio: corners.area() / frame_area,
        aspect_ratio,
        side_difference: relative_difference(top, bottom).max(relative_difference(left, right)),
        max_angle_deviation,
        min_angle,
        max_angle,
    })
}

/// Check a quad against the detector's shape bands.
pub fn validate(
    corners: &CardCorners,
    frame_area: f64,
    config: &DetectorConfig,
) -> Result<QuadMetrics, QuadRejection> {
    let metrics = measure(corners, frame_area).ok_or(QuadRejection::Degenerate)?;

    if metrics.area_ratio < config.min_area_ratio || metrics.area_ratio > config.max_area_ratio {
        return Err(QuadRejection::Area(metrics.area_ratio));
    }
    if metrics.aspect_ratio < config.min_aspect_ratio() - ASPECT_EPSILON
        || metrics.aspect_ratio > config.max_aspect_ratio() + ASPECT_EPSILON
    {
        return Err(QuadRejection::Aspect(metrics.aspect_ratio));
    }
    if metrics.side_difference > config.max_side_difference {
        return Err(QuadRejection::NotParallel(metrics.side_difference));
    }
    if metrics.min_angle < config.min_corner_angle {
        return Err(QuadRejection::Angle(metrics.min_angle));
    }
    if metrics.max_angle > config.max_corner_angle {
        return Err(QuadRejection::Angle(metrics.max_angle));
    }

    Ok(metrics)
}

fn closeness(value: f64, target: f64, range: f64) -> f64 {
    if range <= 0.0 {
        return if value == target { 1.0 } else { 0.0 };
    }
    1.0 - ((value - target).abs() / range).min(1.0)
}

/// Weighted confidence in [0, 1] that a valid quad is the card.
pub fn score(metrics: &QuadMetrics, config: &DetectorConfig) -> f64 {
    let area = closeness(
        metrics.area_ratio,
        config.optimal_area_ratio,
        config.optimal_area_ratio,
    );
    let aspect = closeness(
        metrics.aspect_ratio,
        config.target_aspect_ratio,
        config.target_aspect_ratio * config.aspect_ratio_tolerance,
    );
    let parallel = closeness(metrics.side_difference, 0.0, config.max_side_difference);
    let angle = closeness(metrics.max_angle_deviation, 0.0, 45.0);

    0.3 * area + 0.4 * aspect + 0.2 * parallel + 0.1 * angle
}
