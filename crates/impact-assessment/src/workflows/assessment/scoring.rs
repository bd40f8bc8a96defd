//! Pure aggregation over recorded answers and the carbon questionnaire.
//!
//! Nothing here is cached; every summary re-derives its numbers from the
//! current answers.

use super::answers::Answers;
use super::domain::{
    CarbonAnswer, CarbonAssessment, CarbonStandard, Domain, ImpactCategory, ImpactCounts,
};

pub fn domain_counts(domain: &Domain, answers: &Answers) -> ImpactCounts {
    let mut counts = ImpactCounts::default();
    for question in &domain.questions {
        if let Some(answer) = answers.get(question.id) {
            counts.record(answer);
        }
    }
    counts
}

pub fn total_counts(domains: &[Domain], answers: &Answers) -> ImpactCounts {
    domains
        .iter()
        .map(|domain| domain_counts(domain, answers))
        .sum()
}

/// Only positive and negative answers form the denominator. A positive share
/// must be a strict majority; anything else with a negative answer is negative.
pub fn category_of(counts: &ImpactCounts) -> ImpactCategory {
    let responded = counts.positive + counts.negative;
    if responded == 0 {
        return ImpactCategory::Neutral;
    }

    if counts.positive * 2 > responded {
        ImpactCategory::PositiveImpact
    } else if counts.negative > 0 {
        ImpactCategory::NegativeImpact
    } else {
        ImpactCategory::Neutral
    }
}

pub fn carbon_standard(assessment: &CarbonAssessment) -> CarbonStandard {
    let flags = [
        assessment.has_carbon_plan,
        assessment.has_lifecycle_analysis,
        assessment.has_carbon_impact,
    ];
    let points = flags
        .iter()
        .filter(|flag| **flag == CarbonAnswer::Yes)
        .count()
        + usize::from(assessment.evergreen_level.is_some());

    match points {
        4 => CarbonStandard::Gold,
        2 | 3 => CarbonStandard::Silver,
        1 => CarbonStandard::Bronze,
        _ => CarbonStandard::NeedsImprovement,
    }
}
