//! Grade resolution per grading company.
//!
//! `standards` holds the ordered threshold tables, `resolver` walks them for
//! centering measurements and `model` puts the centering and legacy wear
//! rules behind one `GradingModel` trait.

pub mod model;
pub mod resolver;
pub mod standards;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::measurement::{CenteringMeasurements, CornerWearPercentages};

pub use model::{BorderWearModel, CenteringModel, CornerWearModel, GradeResolver, GradingModel};
pub use resolver::{
    calculate_all_grades, calculate_grade, calculate_grade_for_key, get_grade_threshold,
    grade_description, grade_name,
};
pub use standards::{GradeThreshold, GradingStandard, WearThreshold};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GradingError {
    #[error("unknown grading company: {0}")]
    UnknownCompany(String),
    #[error("unknown card side: {0}")]
    UnknownSide(String),
    #[error("{model} model cannot grade a {measurement} measurement")]
    UnsupportedMeasurement {
        model: &'static str,
        measurement: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Company {
    #[serde(rename = "PSA")]
    Psa,
    #[serde(rename = "BGS")]
    Bgs,
    #[serde(rename = "CGC")]
    Cgc,
}

impl Company {
    pub const ALL: [Company; 3] = [Company::Psa, Company::Bgs, Company::Cgc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Company::Psa => "PSA",
            Company::Bgs => "BGS",
            Company::Cgc => "CGC",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Company {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PSA" => Ok(Company::Psa),
            "BGS" => Ok(Company::Bgs),
            "CGC" => Ok(Company::Cgc),
            _ => Err(GradingError::UnknownCompany(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    Front,
    Back,
}

impl fmt::Display for CardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardSide::Front => f.write_str("front"),
            CardSide::Back => f.write_str("back"),
        }
    }
}

impl FromStr for CardSide {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(CardSide::Front),
            "back" => Ok(CardSide::Back),
            _ => Err(GradingError::UnknownSide(s.to_string())),
        }
    }
}

/// Input to a grading model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Centering(CenteringMeasurements),
    CornerWear(CornerWearPercentages),
    /// Worst-side border wear percentage.
    BorderWear(f64),
}

impl Measurement {
    pub fn kind(&self) -> &'static str {
        match self {
            Measurement::Centering(_) => "centering",
            Measurement::CornerWear(_) => "corner wear",
            Measurement::BorderWear(_) => "border wear",
        }
    }
}

impl From<CenteringMeasurements> for Measurement {
    fn from(value: CenteringMeasurements) -> Self {
        Measurement::Centering(value)
    }
}

impl From<CornerWearPercentages> for Measurement {
    fn from(value: CornerWearPercentages) -> Self {
        Measurement::CornerWear(value)
    }
}

/// The raw numbers a grade was derived from, kept so callers can explain it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum GradeBasis {
    Centering {
        left_right_deviation: f64,
        top_bottom_deviation: f64,
    },
    CornerWear {
        max_wear: f64,
    },
    BorderWear {
        wear_percent: f64,
    },
}

/// Outcome of grading one card side for one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingResult {
    pub company: Company,
    pub side: CardSide,
    pub score: f64,
    pub grade_name: &'static str,
    pub basis: GradeBasis,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: OffsetDateTime,
}

impl GradingResult {
    /// Left/right and top/bottom deviations when graded on centering.
    pub fn centering_deviations(&self) -> Option<(f64, f64)> {
        match self.basis {
            GradeBasis::Centering {
                left_right_deviation,
                top_bottom_deviation,
            } => Some((left_right_deviation, top_bottom_deviation)),
            _ => None,
        }
    }
}

fn serialize_timestamp<S: Serializer>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let text = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_company_keys() {
        assert_eq!("PSA".parse::<Company>(), Ok(Company::Psa));
        assert_eq!(" bgs ".parse::<Company>(), Ok(Company::Bgs));
        assert_eq!("Cgc".parse::<Company>(), Ok(Company::Cgc));
        assert_eq!(
            "SGC".parse::<Company>(),
            Err(GradingError::UnknownCompany("SGC".to_string()))
        );
    }

    #[test]
    fn parses_sides() {
        assert_eq!("front".parse::<CardSide>(), Ok(CardSide::Front));
        assert_eq!("BACK".parse::<CardSide>(), Ok(CardSide::Back));
        assert!("edge".parse::<CardSide>().is_err());
    }

    #[test]
    fn company_display_round_trips() {
        for company in Company::ALL {
            assert_eq!(company.to_string().parse::<Company>(), Ok(company));
        }
    }
}
