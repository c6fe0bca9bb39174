use std::collections::BTreeMap;

use time::OffsetDateTime;

use super::standards::{GradeThreshold, GradingStandard};
use super::{CardSide, Company, GradeBasis, GradingError, GradingResult};
use crate::measurement::CenteringMeasurements;

/// Whether `threshold` accepts the two axis deviations on the given side.
fn meets_centering(threshold: &GradeThreshold, side: CardSide, lr: f64, tb: f64) -> bool {
    match side {
        CardSide::Front => {
            let max = threshold.max_centering_deviation_front;
            match threshold.min_centering_deviation_front {
                // One axis near perfect, the other merely close
                Some(min) => (lr <= min && tb <= max) || (tb <= min && lr <= max),
                None => lr <= max && tb <= max,
            }
        }
        CardSide::Back => {
            let max = threshold.max_centering_deviation_back;
            lr <= max && tb <= max
        }
    }
}

/// Resolve the best grade whose centering requirements are met.
pub fn calculate_grade(
    centering: &CenteringMeasurements,
    side: CardSide,
    company: Company,
) -> GradingResult {
    let standard = GradingStandard::for_company(company);
    let lr = centering.left_right_deviation();
    let tb = centering.top_bottom_deviation();

    let matched = standard
        .grades
        .iter()
        .find(|threshold| meets_centering(threshold, side, lr, tb))
        .unwrap_or_else(|| {
            log::warn!(
                "{company} {side}: no grade matched deviations {lr:.2}/{tb:.2}, using lowest"
            );
            standard.lowest_grade()
        });

    GradingResult {
        company,
        side,
        score: matched.score,
        grade_name: matched.name,
        basis: GradeBasis::Centering {
            left_right_deviation: lr,
            top_bottom_deviation: tb,
        },
        timestamp: OffsetDateTime::now_utc(),
    }
}

/// Same as [`calculate_grade`] for a company given by its string key.
pub fn calculate_grade_for_key(
    centering: &CenteringMeasurements,
    side: CardSide,
    company: &str,
) -> Result<GradingResult, GradingError> {
    let company = company.parse::<Company>()?;
    Ok(calculate_grade(centering, side, company))
}

/// Grade the same measurement for every supported company.
pub fn calculate_all_grades(
    centering: &CenteringMeasurements,
    side: CardSide,
) -> BTreeMap<Company, GradingResult> {
    Company::ALL
        .iter()
        .map(|&company| (company, calculate_grade(centering, side, company)))
        .collect()
}

/// Look up the threshold behind a numeric score.
///
/// The pristine 10 is skipped unless `include_pristine` is set, so a plain
/// `10.0` lookup describes the ordinary 10.
pub fn get_grade_threshold(
    score: f64,
    company: Company,
    include_pristine: bool,
) -> Option<&'static GradeThreshold> {
    GradingStandard::for_company(company)
        .grades
        .iter()
        .find(|g| g.score == score && (include_pristine || !g.is_pristine))
}

pub fn grade_name(score: f64, company: Company) -> &'static str {
    get_grade_threshold(score, company, false).map_or("Unknown", |g| g.name)
}

pub fn grade_description(score: f64, company: Company) -> &'static str {
    get_grade_threshold(score, company, false).map_or("Unknown grade", |g| g.description)
}
