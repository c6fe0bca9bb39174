use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};

use crate::models::Point;

/// Outer borders of the top-level regions in a binary edge image.
///
/// Holes and anything nested inside another region are dropped, so a card
/// outline yields one contour no matter how much artwork it encloses.
pub fn external_contours(edges: &GrayImage) -> Vec<Vec<Point>> {
    let contours: Vec<Contour<i32>> = find_contours(edges);
    contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter(|c| c.points.len() > 2)
        .map(|c| {
            c.points
                .iter()
                .map(|p| Point::new(p.x as f64, p.y as f64))
                .collect()
        })
        .collect()
}

/// Shoelace area of a closed polygon
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() / 2.0
}

/// Length of a closed curve
pub fn perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    (0..points.len())
        .map(|i| points[i].distance(&points[(i + 1) % points.len()]))
        .sum()
}

fn perpendicular_distance(p: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f64::EPSILON {
        return p.distance(&start);
    }
    ((p.x - start.x) * dy - (p.y - start.y) * dx).abs() / len
}

fn farthest_from(points: &[Point], origin: Point) -> usize {
    let mut best = 0;
    let mut best_dist = -1.0;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance(&origin);
        if d > best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Pushes the kept vertices of an open chain, excluding its last point.
fn simplify_chain(points: &[Point], epsilon: f64, out: &mut Vec<Point>) {
    let Some((&start, rest)) = points.split_first() else {
        return;
    };
    let Some(&end) = rest.last() else {
        out.push(start);
        return;
    };

    let mut max_dist = 0.0;
    let mut index = 0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = perpendicular_distance(*p, start, end);
        if d > max_dist {
            max_dist = d;
            index = i;
        }
    }

    if max_dist > epsilon {
        simplify_chain(&points[..=index], epsilon, out);
        simplify_chain(&points[index..], epsilon, out);
    } else {
        out.push(start);
    }
}

/// Douglas-Peucker simplification of a closed curve.
///
/// The curve is split at two mutually distant points so that the arbitrary
/// starting point of the trace never survives as a spurious vertex.
pub fn approx_poly_dp(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let a = farthest_from(points, points[0]);
    let mut ring: Vec<Point> = points[a..].iter().chain(&points[..a]).copied().collect();
    let b = farthest_from(&ring, ring[0]);
    if b == 0 {
        return vec![ring[0]];
    }

    let mut out = Vec::new();
    simplify_chain(&ring[..=b], epsilon, &mut out);
    ring.push(ring[0]);
    simplify_chain(&ring[b..], epsilon, &mut out);
    out
}
