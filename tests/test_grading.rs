//! Integration tests for centering measurement and grade resolution.
//!
//! Tests cover:
//! - Percentage splits and the degenerate 50/50 case
//! - End-to-end boundary scenarios through to a PSA grade
//! - Monotonicity and threshold inclusivity of the grade tables
//! - Grading every company at once

mod common;

use approx::assert_relative_eq;
use tcg_grader::grading::{
    calculate_all_grades, calculate_grade, calculate_grade_for_key, GradeBasis, GradeResolver,
    GradingError, Measurement,
};
use tcg_grader::measurement::{
    calculate_border_wear, calculate_centering, corners_to_initial_boundaries, CardDimensions,
    Edge, Layer,
};

use common::*;

#[test]
fn test_splits_sum_to_one_hundred() {
    for (left, right, top, bottom) in [
        (15.0, 15.0, 20.0, 20.0),
        (3.0, 41.0, 7.5, 2.5),
        (0.5, 120.0, 60.0, 1.0),
        (0.0, 10.0, 10.0, 0.0),
    ] {
        let c = calculate_centering(&boundaries_with_borders(left, right, top, bottom));
        assert_relative_eq!(c.left_right.left + c.left_right.right, 100.0, epsilon = 1e-9);
        assert_relative_eq!(c.top_bottom.top + c.top_bottom.bottom, 100.0, epsilon = 1e-9);
    }
}

#[test]
fn test_zero_width_borders_are_centered() {
    let c = calculate_centering(&boundaries_with_borders(0.0, 0.0, 0.0, 0.0));
    assert_eq!(c, CenteringMeasurements::new(50.0, 50.0, 50.0, 50.0));
}

#[test]
fn test_even_borders_grade_gem_mint() {
    let boundaries = boundaries_with_inner(Rect::new(20.0, 380.0, 15.0, 285.0));
    let c = calculate_centering(&boundaries);
    assert_eq!(c, CenteringMeasurements::new(50.0, 50.0, 50.0, 50.0));

    let grade = calculate_grade(&c, CardSide::Front, Company::Psa);
    assert_eq!(grade.score, 10.0);
    assert_eq!(grade.grade_name, "Gem Mint");
}

#[test]
fn test_symmetric_shift_keeps_even_split() {
    let boundaries = boundaries_with_inner(Rect::new(20.0, 380.0, 30.0, 270.0));
    let c = calculate_centering(&boundaries);
    assert_eq!(c.left_right.left, 50.0);
    assert_eq!(c.left_right.right, 50.0);
}

#[test]
fn test_uneven_borders_grade_mint() {
    let boundaries = boundaries_with_inner(Rect::new(20.0, 380.0, 45.0, 270.0));
    let c = calculate_centering(&boundaries);
    assert_relative_eq!(c.left_right.left, 60.0, epsilon = 1e-9);
    assert_relative_eq!(c.left_right.right, 40.0, epsilon = 1e-9);
    assert_relative_eq!(c.left_right_deviation(), 10.0, epsilon = 1e-9);

    let grade = calculate_grade(&c, CardSide::Front, Company::Psa);
    assert_eq!(grade.score, 9.0);
    assert_eq!(grade.grade_name, "Mint");
}

#[test]
fn test_grades_are_monotonic_in_deviation() {
    let steps: Vec<f64> = (0..=100).map(|i| i as f64 * 0.5).collect();
    for company in Company::ALL {
        for side in [CardSide::Front, CardSide::Back] {
            for pair in steps.windows(2) {
                let better = calculate_grade(&centering_with_deviation(pair[0], pair[0]), side, company);
                let worse = calculate_grade(&centering_with_deviation(pair[1], pair[1]), side, company);
                assert!(
                    better.score >= worse.score,
                    "{company} {side}: {} at {} < {} at {}",
                    better.score,
                    pair[0],
                    worse.score,
                    pair[1]
                );
            }
        }
    }
}

#[test]
fn test_front_thresholds_are_inclusive() {
    for company in Company::ALL {
        for threshold in GradingStandard::for_company(company).grades {
            let max = threshold.max_centering_deviation_front;
            let lr = threshold.min_centering_deviation_front.unwrap_or(max);
            let grade = calculate_grade(&centering_with_deviation(lr, max), CardSide::Front, company);
            assert_eq!(grade.score, threshold.score, "{company} {}", threshold.name);
            assert_eq!(grade.grade_name, threshold.name, "{company} {}", threshold.score);
        }
    }
}

#[test]
fn test_psa_front_five_percent_is_gem_mint() {
    let grade = calculate_grade(&centering_with_deviation(5.0, 5.0), CardSide::Front, Company::Psa);
    assert_eq!(grade.score, 10.0);
    assert_eq!(grade.grade_name, "Gem Mint");
}

#[test]
fn test_all_grades_cover_every_company() {
    for (lr, tb) in [(0.0, 0.0), (7.0, 12.0), (30.0, 2.0), (50.0, 50.0)] {
        for side in [CardSide::Front, CardSide::Back] {
            let all = calculate_all_grades(&centering_with_deviation(lr, tb), side);
            let keys: Vec<&str> = all.keys().map(|c| c.as_str()).collect();
            assert_eq!(keys, ["PSA", "BGS", "CGC"]);
            for result in all.values() {
                assert!((1.0..=10.0).contains(&result.score));
                assert_eq!(result.side, side);
            }
        }
    }
}

#[test]
fn test_unknown_company_key() {
    let c = centering_with_deviation(0.0, 0.0);
    assert_eq!(
        calculate_grade_for_key(&c, CardSide::Front, "SGC"),
        Err(GradingError::UnknownCompany("SGC".to_string()))
    );
    assert_eq!(
        calculate_grade_for_key(&c, CardSide::Front, "psa").map(|r| r.score),
        Ok(10.0)
    );
}

#[test]
fn test_result_serializes_company_key() -> anyhow::Result<()> {
    let grade = calculate_grade(&centering_with_deviation(10.0, 2.0), CardSide::Back, Company::Bgs);
    let json = serde_json::to_value(&grade)?;
    assert_eq!(json["company"], "BGS");
    assert_eq!(json["side"], serde_json::json!(grade.side));
    assert!(json["timestamp"].is_string());
    assert_eq!(
        grade.basis,
        GradeBasis::Centering {
            left_right_deviation: 10.0,
            top_bottom_deviation: 2.0,
        }
    );
    Ok(())
}

#[test]
fn test_adjusted_boundaries_change_the_grade() -> anyhow::Result<()> {
    let mut boundaries = boundaries_with_borders(15.0, 15.0, 20.0, 20.0);
    let before = calculate_grade(&calculate_centering(&boundaries), CardSide::Front, Company::Psa);
    assert_eq!(before.score, 10.0);

    // Drag the inner left edge 10px right: borders 25/15 -> 62.5/37.5
    boundaries.move_edge(Layer::Inner, Edge::Left, 10.0);
    let c = calculate_centering(&boundaries);
    assert_relative_eq!(c.left_right.left, 62.5, epsilon = 1e-9);
    let after = calculate_grade(&c, CardSide::Front, Company::Psa);
    assert_eq!(after.score, 8.0);

    // Dragging far past the outer edge is clamped instead of inverting
    boundaries.move_edge(Layer::Inner, Edge::Left, -500.0);
    assert!(boundaries.inner().left >= boundaries.outer().left);
    Ok(())
}

#[test]
fn test_normalized_boundaries_can_be_dragged() -> anyhow::Result<()> {
    let mut boundaries = BorderBoundaries::new(
        Rect::new(0.0, 1.0, 0.0, 1.0),
        Rect::new(0.05, 0.95, 0.05, 0.95),
    )?;
    boundaries.move_edge(Layer::Inner, Edge::Left, 0.01);
    boundaries.move_edge(Layer::Inner, Edge::Right, 0.5);
    assert!((boundaries.inner().left - 0.06).abs() < 1e-12);
    assert_eq!(boundaries.inner().right, 1.0);

    // Borders 0.06 / 0.0 put all the slack on the left
    let c = calculate_centering(&boundaries);
    assert_relative_eq!(c.left_right.left, 100.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_detected_corners_to_grades() -> anyhow::Result<()> {
    let corners = CardCorners {
        top_left: Point::new(0.25, 0.2),
        top_right: Point::new(0.75, 0.2),
        bottom_right: Point::new(0.75, 0.8),
        bottom_left: Point::new(0.25, 0.8),
    };
    let (boundaries, dimensions): (BorderBoundaries, CardDimensions) =
        corners_to_initial_boundaries(&corners, 1000.0, 1000.0)?;

    assert_eq!(dimensions.width, 500.0);
    assert_eq!(dimensions.height, 600.0);
    let c = calculate_centering(&boundaries);
    assert_relative_eq!(c.left_right_deviation(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(c.top_bottom_deviation(), 0.0, epsilon = 1e-9);
    // Default 3.5% border: 21px top/bottom on a 500px short side
    assert_relative_eq!(calculate_border_wear(&boundaries, &dimensions), 4.2, epsilon = 1e-9);

    let grades = calculate_all_grades(&c, CardSide::Front);
    assert!(grades.values().all(|g| g.score == 10.0));
    Ok(())
}

#[test]
fn test_resolver_grades_border_wear_per_company() {
    use std::sync::Arc;
    use tcg_grader::grading::BorderWearModel;

    let resolver = GradeResolver::new().with_model(Company::Psa, Arc::new(BorderWearModel));
    let results = resolver.grade_all(&Measurement::BorderWear(1.0), CardSide::Front);

    assert_eq!(results[&Company::Psa].as_ref().map(|r| r.score), Ok(10.0));
    assert!(matches!(
        results[&Company::Cgc],
        Err(GradingError::UnsupportedMeasurement { .. })
    ));
}
