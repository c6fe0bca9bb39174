use std::collections::BTreeMap;
use std::sync::Arc;

use time::OffsetDateTime;

use super::standards::{GradingStandard, WearThreshold};
use super::{CardSide, Company, GradeBasis, GradingError, GradingResult, Measurement, resolver};

/// Maps a measurement to a grade for one company.
pub trait GradingModel: Send + Sync {
    fn grade(
        &self,
        measurement: &Measurement,
        side: CardSide,
        company: Company,
    ) -> Result<GradingResult, GradingError>;

    /// Human-readable name for this model (used in errors and logs)
    fn name(&self) -> &'static str;
}

/// Current model: border centering deviation against the centering tables.
pub struct CenteringModel;

impl GradingModel for CenteringModel {
    fn grade(
        &self,
        measurement: &Measurement,
        side: CardSide,
        company: Company,
    ) -> Result<GradingResult, GradingError> {
        match measurement {
            Measurement::Centering(centering) => Ok(resolver::calculate_grade(centering, side, company)),
            other => Err(GradingError::UnsupportedMeasurement {
                model: self.name(),
                measurement: other.kind(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "centering"
    }
}

/// Legacy model: worst-corner wear against the wear tables.
pub struct CornerWearModel;

impl GradingModel for CornerWearModel {
    fn grade(
        &self,
        measurement: &Measurement,
        side: CardSide,
        company: Company,
    ) -> Result<GradingResult, GradingError> {
        match measurement {
            Measurement::CornerWear(wear) => {
                let matched = match_wear(company, wear.max_wear);
                Ok(wear_result(company, side, matched, GradeBasis::CornerWear {
                    max_wear: wear.max_wear,
                }))
            }
            other => Err(GradingError::UnsupportedMeasurement {
                model: self.name(),
                measurement: other.kind(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "corner wear"
    }
}

/// Legacy model: worst-side border wear against the wear tables.
pub struct BorderWearModel;

impl GradingModel for BorderWearModel {
    fn grade(
        &self,
        measurement: &Measurement,
        side: CardSide,
        company: Company,
    ) -> Result<GradingResult, GradingError> {
        match measurement {
            Measurement::BorderWear(wear_percent) => {
                let matched = match_wear(company, *wear_percent);
                Ok(wear_result(company, side, matched, GradeBasis::BorderWear {
                    wear_percent: *wear_percent,
                }))
            }
            other => Err(GradingError::UnsupportedMeasurement {
                model: self.name(),
                measurement: other.kind(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "border wear"
    }
}

fn match_wear(company: Company, wear: f64) -> &'static WearThreshold {
    let standard = GradingStandard::for_company(company);
    standard
        .wear_grades
        .iter()
        .find(|g| wear <= g.max_wear_percent)
        .unwrap_or_else(|| standard.lowest_wear_grade())
}

fn wear_result(
    company: Company,
    side: CardSide,
    matched: &'static WearThreshold,
    basis: GradeBasis,
) -> GradingResult {
    GradingResult {
        company,
        side,
        score: matched.score,
        grade_name: matched.name,
        basis,
        timestamp: OffsetDateTime::now_utc(),
    }
}

/// Chooses a grading model per company.
///
/// Every company starts on [`CenteringModel`]; `with_model` swaps in another
/// rule set for a single company without touching the others.
#[derive(Clone)]
pub struct GradeResolver {
    models: BTreeMap<Company, Arc<dyn GradingModel>>,
}

impl GradeResolver {
    pub fn new() -> Self {
        let centering: Arc<dyn GradingModel> = Arc::new(CenteringModel);
        Self {
            models: Company::ALL
                .iter()
                .map(|&company| (company, centering.clone()))
                .collect(),
        }
    }

    pub fn with_model(mut self, company: Company, model: Arc<dyn GradingModel>) -> Self {
        self.models.insert(company, model);
        self
    }

    pub fn model_for(&self, company: Company) -> &dyn GradingModel {
        // Populated for every company in `new`
        self.models
            .get(&company)
            .map(|m| m.as_ref())
            .unwrap_or(&CenteringModel)
    }

    pub fn grade(
        &self,
        measurement: &Measurement,
        side: CardSide,
        company: Company,
    ) -> Result<GradingResult, GradingError> {
        self.model_for(company).grade(measurement, side, company)
    }

    /// Grade every company; a failure for one company leaves the others intact.
    pub fn grade_all(
        &self,
        measurement: &Measurement,
        side: CardSide,
    ) -> BTreeMap<Company, Result<GradingResult, GradingError>> {
        Company::ALL
            .iter()
            .map(|&company| (company, self.grade(measurement, side, company)))
            .collect()
    }
}

impl Default for GradeResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{CenteringMeasurements, CornerWearPercentages};

    fn corner_wear(max_wear: f64) -> CornerWearPercentages {
        CornerWearPercentages {
            top_left: max_wear,
            top_right: 0.0,
            bottom_left: 0.0,
            bottom_right: 0.0,
            max_wear,
        }
    }

    #[test]
    fn corner_wear_grades_on_worst_corner() {
        let r = CornerWearModel
            .grade(&corner_wear(1.5).into(), CardSide::Front, Company::Psa)
            .unwrap();
        assert_eq!(r.score, 9.0);
        assert_eq!(r.basis, GradeBasis::CornerWear { max_wear: 1.5 });
    }

    #[test]
    fn border_wear_boundary_is_inclusive() {
        let r = BorderWearModel
            .grade(&Measurement::BorderWear(5.0), CardSide::Back, Company::Cgc)
            .unwrap();
        assert_eq!(r.grade_name, "NM/Mint");
    }

    #[test]
    fn models_reject_foreign_measurements() {
        let err = CenteringModel.grade(&Measurement::BorderWear(2.0), CardSide::Front, Company::Psa);
        assert_eq!(
            err,
            Err(GradingError::UnsupportedMeasurement {
                model: "centering",
                measurement: "border wear",
            })
        );
    }

    #[test]
    fn resolver_isolates_companies() {
        let resolver = GradeResolver::new().with_model(Company::Bgs, Arc::new(CornerWearModel));
        let centering = CenteringMeasurements::new(50.0, 50.0, 50.0, 50.0);
        let results = resolver.grade_all(&centering.into(), CardSide::Front);

        assert_eq!(results.len(), 3);
        assert_eq!(results[&Company::Psa].as_ref().unwrap().score, 10.0);
        assert_eq!(results[&Company::Cgc].as_ref().unwrap().grade_name, "Pristine");
        assert!(results[&Company::Bgs].is_err());
        assert_eq!(resolver.model_for(Company::Bgs).name(), "corner wear");
    }
}
