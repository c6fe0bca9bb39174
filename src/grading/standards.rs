//! Grade threshold tables for each supported company.
//!
//! Tables are ordered from the best grade to the worst and resolution stops
//! at the first entry whose requirements are met, so order is significant.
//! Centering values are deviations of the larger share from 50 (55/45 is a
//! deviation of 5). The worst centering entry of every table allows 50, the
//! largest possible deviation, so every measurement resolves.

use serde::Serialize;

use super::Company;

/// One centering rule in a company's table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeThreshold {
    pub score: f64,
    pub name: &'static str,
    pub max_centering_deviation_front: f64,
    /// When set, the front only needs one axis within this bound and the
    /// other within `max_centering_deviation_front`.
    pub min_centering_deviation_front: Option<f64>,
    pub max_centering_deviation_back: f64,
    pub description: &'static str,
    /// Marks the top 10 variant listed above the ordinary 10.
    pub is_pristine: bool,
}

/// One rule of the legacy wear-based model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WearThreshold {
    pub score: f64,
    pub name: &'static str,
    pub max_wear_percent: f64,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GradingStandard {
    pub company: Company,
    pub grades: &'static [GradeThreshold],
    pub wear_grades: &'static [WearThreshold],
}

impl GradingStandard {
    pub fn for_company(company: Company) -> &'static GradingStandard {
        match company {
            Company::Psa => &PSA_STANDARD,
            Company::Bgs => &BGS_STANDARD,
            Company::Cgc => &CGC_STANDARD,
        }
    }

    /// Worst centering entry, used when nothing else matches.
    pub fn lowest_grade(&self) -> &'static GradeThreshold {
        &self.grades[self.grades.len() - 1]
    }

    pub fn lowest_wear_grade(&self) -> &'static WearThreshold {
        &self.wear_grades[self.wear_grades.len() - 1]
    }
}

const fn grade(
    score: f64,
    name: &'static str,
    front: f64,
    back: f64,
    description: &'static str,
) -> GradeThreshold {
    GradeThreshold {
        score,
        name,
        max_centering_deviation_front: front,
        min_centering_deviation_front: None,
        max_centering_deviation_back: back,
        description,
        is_pristine: false,
    }
}

const fn pristine(front: f64, back: f64, description: &'static str) -> GradeThreshold {
    GradeThreshold {
        score: 10.0,
        name: "Pristine",
        max_centering_deviation_front: front,
        min_centering_deviation_front: None,
        max_centering_deviation_back: back,
        description,
        is_pristine: true,
    }
}

const fn asymmetric(
    score: f64,
    name: &'static str,
    min_front: f64,
    max_front: f64,
    back: f64,
    description: &'static str,
) -> GradeThreshold {
    GradeThreshold {
        score,
        name,
        max_centering_deviation_front: max_front,
        min_centering_deviation_front: Some(min_front),
        max_centering_deviation_back: back,
        description,
        is_pristine: false,
    }
}

const fn wear(
    score: f64,
    name: &'static str,
    max_wear_percent: f64,
    description: &'static str,
) -> WearThreshold {
    WearThreshold {
        score,
        name,
        max_wear_percent,
        description,
    }
}

static PSA_GRADES: [GradeThreshold; 11] = [
    grade(10.0, "Gem Mint", 5.0, 25.0, "Virtually perfect card with sharp focus and 55/45 or better centering"),
    grade(9.0, "Mint", 10.0, 40.0, "Superb card with one minor flaw and 60/40 or better centering"),
    grade(8.0, "NM-MT", 15.0, 40.0, "Near Mint to Mint with 65/35 or better centering"),
    grade(7.0, "Near Mint", 20.0, 40.0, "Slight surface wear visible on close inspection, 70/30 or better centering"),
    grade(6.0, "EX-MT", 30.0, 40.0, "Excellent to Mint with visible border wear, 80/20 or better centering"),
    grade(5.0, "Excellent", 35.0, 40.0, "Minor rounding of corners, 85/15 or better centering"),
    grade(4.0, "VG-EX", 37.5, 42.5, "Very Good to Excellent with noticeable corner and border wear"),
    grade(3.0, "Very Good", 40.0, 45.0, "Some rounding of corners and obvious surface wear, 90/10 or better centering"),
    grade(2.0, "Good", 45.0, 47.5, "Accelerated corner rounding and heavily worn borders"),
    grade(1.5, "Fair", 47.5, 49.0, "Extreme wear that may affect framing of the subject"),
    grade(1.0, "Poor", 50.0, 50.0, "Card has significant damage and wear"),
];

// Pristine and 9.5 front values for BGS and CGC are inferred from the published
// 50/50 and 55/45 wording, not from official tables.
static BGS_GRADES: [GradeThreshold; 13] = [
    pristine(1.0, 5.0, "Flawless centering front and back, museum quality"),
    grade(10.0, "Gem Mint", 5.0, 10.0, "55/45 or better on the front, 60/40 on the back"),
    asymmetric(9.5, "Gem Mint", 5.0, 10.0, 10.0, "55/45 one way and 60/40 the other on the front"),
    grade(9.0, "Mint", 10.0, 15.0, "60/40 or better both ways on the front"),
    grade(8.5, "NM-MT+", 15.0, 20.0, "65/35 or better both ways on the front"),
    grade(8.0, "NM-MT", 20.0, 25.0, "70/30 or better both ways on the front"),
    grade(7.0, "Near Mint", 25.0, 30.0, "75/25 or better both ways on the front"),
    grade(6.0, "EX-MT", 30.0, 35.0, "80/20 or better both ways on the front"),
    grade(5.0, "Excellent", 35.0, 40.0, "85/15 or better both ways on the front"),
    grade(4.0, "VG-EX", 40.0, 45.0, "90/10 or better both ways on the front"),
    grade(3.0, "Very Good", 45.0, 45.0, "95/5 or better both ways on the front"),
    grade(2.0, "Good", 48.0, 48.0, "Border nearly missing on one side"),
    grade(1.0, "Poor", 50.0, 50.0, "Miscut or border missing entirely"),
];

static CGC_GRADES: [GradeThreshold; 15] = [
    pristine(1.0, 5.0, "Perfect centering front and back"),
    grade(10.0, "Gem Mint", 5.0, 25.0, "55/45 or better on the front, 75/25 on the back"),
    asymmetric(9.5, "Mint+", 5.0, 10.0, 25.0, "55/45 one way and 60/40 the other on the front"),
    grade(9.0, "Mint", 10.0, 40.0, "60/40 or better on the front, 90/10 on the back"),
    grade(8.5, "NM/Mint+", 12.5, 40.0, "62.5/37.5 or better on the front"),
    grade(8.0, "NM/Mint", 15.0, 40.0, "65/35 or better on the front"),
    grade(7.5, "Near Mint+", 17.5, 40.0, "67.5/32.5 or better on the front"),
    grade(7.0, "Near Mint", 20.0, 40.0, "70/30 or better on the front"),
    grade(6.0, "Ex/NM", 30.0, 45.0, "80/20 or better on the front"),
    grade(5.0, "Excellent", 35.0, 45.0, "85/15 or better on the front"),
    grade(4.0, "VG/Ex", 40.0, 45.0, "90/10 or better on the front"),
    grade(3.0, "Very Good", 45.0, 45.0, "95/5 or better on the front"),
    grade(2.0, "Good", 48.0, 48.0, "Border nearly missing on one side"),
    grade(1.5, "Fair", 49.0, 49.0, "Border missing on one side"),
    grade(1.0, "Poor", 50.0, 50.0, "Miscut card"),
];

static PSA_WEAR: [WearThreshold; 10] = [
    wear(10.0, "Gem Mint", 1.0, "Virtually perfect card with sharp borders and focus"),
    wear(9.0, "Mint", 2.0, "Super high-end card with only minor imperfections"),
    wear(8.0, "NM-MT", 5.0, "Near Mint to Mint condition with minimal wear"),
    wear(7.0, "Near Mint", 10.0, "Card has slight surface wear visible upon close inspection"),
    wear(6.0, "EX-MT", 15.0, "Excellent to Mint with minor wear on borders"),
    wear(5.0, "Excellent", 25.0, "Borders may show wear, surface wear evident"),
    wear(4.0, "VG-EX", 35.0, "Very Good to Excellent with noticeable border wear"),
    wear(3.0, "Very Good", 50.0, "Obvious border wear and surface scratching"),
    wear(2.0, "Good", 70.0, "Heavily worn borders and edges"),
    wear(1.0, "Poor", 100.0, "Card has significant damage and wear"),
];

static BGS_WEAR: [WearThreshold; 7] = [
    wear(10.0, "Pristine", 0.5, "The best of the best - museum quality"),
    wear(9.5, "Gem Mint", 1.0, "Near perfect card"),
    wear(9.0, "Mint", 2.0, "Excellent condition with minor flaws"),
    wear(8.0, "NM-MT", 5.0, "Light wear visible on close inspection"),
    wear(6.0, "EX-MT", 15.0, "Noticeable wear on corners and edges"),
    wear(4.0, "VG-EX", 35.0, "Heavy wear on borders"),
    wear(1.0, "Poor", 100.0, "Card has significant damage and wear"),
];

static CGC_WEAR: [WearThreshold; 7] = [
    wear(10.0, "Pristine", 1.0, "Perfect or near-perfect card"),
    wear(9.5, "Mint+", 1.5, "Outstanding card with minimal wear"),
    wear(9.0, "Mint", 2.0, "High quality card with slight imperfections"),
    wear(8.0, "NM/Mint", 5.0, "Minor wear visible on close inspection"),
    wear(6.0, "Ex/NM", 15.0, "Moderate wear on corners and edges"),
    wear(4.0, "VG/Ex", 35.0, "Heavy wear on borders"),
    wear(1.0, "Poor", 100.0, "Card has significant damage and wear"),
];

pub static PSA_STANDARD: GradingStandard = GradingStandard {
    company: Company::Psa,
    grades: &PSA_GRADES,
    wear_grades: &PSA_WEAR,
};

pub static BGS_STANDARD: GradingStandard = GradingStandard {
    company: Company::Bgs,
    grades: &BGS_GRADES,
    wear_grades: &BGS_WEAR,
};

pub static CGC_STANDARD: GradingStandard = GradingStandard {
    company: Company::Cgc,
    grades: &CGC_GRADES,
    wear_grades: &CGC_WEAR,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_run_best_to_worst() {
        for company in Company::ALL {
            let standard = GradingStandard::for_company(company);
            assert_eq!(standard.company, company);
            for pair in standard.grades.windows(2) {
                assert!(pair[0].score >= pair[1].score, "{company}: {pair:?}");
                // Each entry must be reachable on the front
                assert!(
                    pair[0].max_centering_deviation_front <= pair[1].max_centering_deviation_front,
                    "{company}: {pair:?}"
                );
            }
            for pair in standard.wear_grades.windows(2) {
                assert!(pair[0].score > pair[1].score);
                assert!(pair[0].max_wear_percent < pair[1].max_wear_percent);
            }
        }
    }

    #[test]
    fn worst_entry_accepts_any_deviation() {
        for company in Company::ALL {
            let standard = GradingStandard::for_company(company);
            let last = standard.lowest_grade();
            assert_eq!(last.score, 1.0);
            assert_eq!(last.max_centering_deviation_front, 50.0);
            assert_eq!(last.max_centering_deviation_back, 50.0);
            assert_eq!(standard.lowest_wear_grade().max_wear_percent, 100.0);
        }
    }

    #[test]
    fn pristine_only_at_the_top() {
        for company in Company::ALL {
            let grades = GradingStandard::for_company(company).grades;
            for (i, g) in grades.iter().enumerate() {
                if g.is_pristine {
                    assert_eq!(i, 0);
                    assert_eq!(g.score, 10.0);
                }
            }
        }
    }

    #[test]
    fn asymmetric_rules_are_tighter_one_way() {
        for company in Company::ALL {
            for g in GradingStandard::for_company(company).grades {
                if let Some(min) = g.min_centering_deviation_front {
                    assert!(min < g.max_centering_deviation_front);
                }
            }
        }
    }

    #[test]
    fn scores_use_half_steps() {
        for company in Company::ALL {
            for g in GradingStandard::for_company(company).grades {
                assert!((1.0..=10.0).contains(&g.score));
                assert_eq!((g.score * 2.0).fract(), 0.0);
            }
        }
    }
}
