use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Impact judgement recorded against a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Answer {
    Positive,
    Negative,
    NoImpact,
    Unknown,
}

impl Answer {
    pub const fn ordered() -> [Self; 4] {
        [Self::Positive, Self::Negative, Self::NoImpact, Self::Unknown]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive Impact",
            Self::Negative => "Negative Impact",
            Self::NoImpact => "No Impact",
            Self::Unknown => "Unknown Impact",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::NoImpact => "no-impact",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightingCategory {
    KeyMetricUn,
    KeyMetric,
    UnGoals,
    Standard,
}

impl WeightingCategory {
    /// Badge shown next to a question; standard questions carry none.
    pub const fn badge(self) -> Option<&'static str> {
        match self {
            Self::KeyMetricUn => Some("Key Metric & UN Goals"),
            Self::KeyMetric => Some("Key Metric"),
            Self::UnGoals => Some("UN Goals"),
            Self::Standard => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    pub category: WeightingCategory,
}

#[derive(Debug, Clone, Serialize)]
pub struct Domain {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub questions: Vec<Question>,
}

impl Domain {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == question_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarbonAnswer {
    Yes,
    #[default]
    No,
    InProgress,
}

impl CarbonAnswer {
    pub const fn ordered() -> [Self; 3] {
        [Self::Yes, Self::No, Self::InProgress]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::InProgress => "In Progress",
        }
    }
}

/// Self-declared Evergreen maturity level, 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EvergreenLevel(u8);

impl EvergreenLevel {
    pub const FOUNDATION: Self = Self(1);

    pub fn new(level: u8) -> Result<Self, InvalidEvergreenLevel> {
        match level {
            1..=4 => Ok(Self(level)),
            other => Err(InvalidEvergreenLevel(other)),
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Foundation",
            2 => "Intermediate",
            3 => "Advanced",
            _ => "Excellence",
        }
    }
}

impl TryFrom<u8> for EvergreenLevel {
    type Error = InvalidEvergreenLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EvergreenLevel> for u8 {
    fn from(level: EvergreenLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("evergreen level must be between 1 and 4, got {0}")]
pub struct InvalidEvergreenLevel(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CarbonAssessment {
    pub has_carbon_plan: CarbonAnswer,
    pub has_lifecycle_analysis: CarbonAnswer,
    pub has_carbon_impact: CarbonAnswer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evergreen_level: Option<EvergreenLevel>,
}

impl CarbonAssessment {
    /// Applies the answer to "completed the Evergreen assessment?".
    ///
    /// `Yes` keeps an existing level or starts at level 1; anything else clears it.
    pub fn with_evergreen_status(mut self, status: CarbonAnswer) -> Self {
        self.evergreen_level = match status {
            CarbonAnswer::Yes => Some(self.evergreen_level.unwrap_or(EvergreenLevel::FOUNDATION)),
            CarbonAnswer::No | CarbonAnswer::InProgress => None,
        };
        self
    }

    pub fn evergreen_status(&self) -> CarbonAnswer {
        if self.evergreen_level.is_some() {
            CarbonAnswer::Yes
        } else {
            CarbonAnswer::No
        }
    }
}

/// Identifying details captured on the first screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrganisationDetails {
    pub organisation_name: String,
    pub completion_date: Option<NaiveDate>,
    pub completed_by: String,
    pub job_role: String,
}

impl OrganisationDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.organisation_name.trim().is_empty() {
            missing.push(RequiredField::OrganisationName);
        }
        if self.completion_date.is_none() {
            missing.push(RequiredField::CompletionDate);
        }
        if self.completed_by.trim().is_empty() {
            missing.push(RequiredField::CompletedBy);
        }
        if self.job_role.trim().is_empty() {
            missing.push(RequiredField::JobRole);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AssessmentData {
    pub organisation: OrganisationDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_assessment: Option<CarbonAssessment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImpactCounts {
    pub positive: usize,
    pub negative: usize,
    pub no_impact: usize,
    pub unknown: usize,
}

impl ImpactCounts {
    pub fn record(&mut self, answer: Answer) {
        match answer {
            Answer::Positive => self.positive += 1,
            Answer::Negative => self.negative += 1,
            Answer::NoImpact => self.no_impact += 1,
            Answer::Unknown => self.unknown += 1,
        }
    }

    pub fn get(&self, answer: Answer) -> usize {
        match answer {
            Answer::Positive => self.positive,
            Answer::Negative => self.negative,
            Answer::NoImpact => self.no_impact,
            Answer::Unknown => self.unknown,
        }
    }

    pub fn answered(&self) -> usize {
        self.positive + self.negative + self.no_impact + self.unknown
    }
}

impl std::ops::Add for ImpactCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            positive: self.positive + other.positive,
            negative: self.negative + other.negative,
            no_impact: self.no_impact + other.no_impact,
            unknown: self.unknown + other.unknown,
        }
    }
}

impl std::iter::Sum for ImpactCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, counts| acc + counts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactCategory {
    PositiveImpact,
    NegativeImpact,
    Neutral,
}

impl ImpactCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PositiveImpact => "Positive Environmental Impact",
            Self::NegativeImpact => "Negative Impact - Proceed with Care",
            Self::Neutral => "Neutral",
        }
    }

    /// Short terminal badge standing in for the category colour.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::PositiveImpact => "[+]",
            Self::NegativeImpact => "[!]",
            Self::Neutral => "[-]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarbonStandard {
    Gold,
    Silver,
    Bronze,
    NeedsImprovement,
}

impl CarbonStandard {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
            Self::NeedsImprovement => "Net Zero Improvement Needed",
        }
    }

    pub const fn marker(self) -> &'static str {
        match self {
            Self::Gold => "[G]",
            Self::Silver => "[S]",
            Self::Bronze => "[B]",
            Self::NeedsImprovement => "[!]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    OrganisationName,
    CompletionDate,
    CompletedBy,
    JobRole,
}

impl RequiredField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OrganisationName => "organisation name",
            Self::CompletionDate => "completion date",
            Self::CompletedBy => "completed by",
            Self::JobRole => "job role",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<RequiredField>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.missing.iter().map(|field| field.label()).collect();
        write!(f, "required fields missing: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> OrganisationDetails {
        OrganisationDetails {
            organisation_name: "Northfield Community Trust".to_string(),
            completion_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            completed_by: "Sam Okafor".to_string(),
            job_role: "Sustainability Lead".to_string(),
        }
    }

    #[test]
    fn validation_lists_every_missing_field() {
        let err = OrganisationDetails::default()
            .validate()
            .expect_err("empty details rejected");
        assert_eq!(
            err.missing,
            vec![
                RequiredField::OrganisationName,
                RequiredField::CompletionDate,
                RequiredField::CompletedBy,
                RequiredField::JobRole,
            ]
        );
        assert!(err.to_string().contains("organisation name"));
    }

    #[test]
    fn whitespace_only_text_counts_as_missing() {
        let mut form = details();
        form.job_role = "   ".to_string();
        let err = form.validate().expect_err("blank role rejected");
        assert_eq!(err.missing, vec![RequiredField::JobRole]);
        assert!(details().validate().is_ok());
    }

    #[test]
    fn evergreen_level_rejects_out_of_range_values() {
        assert!(EvergreenLevel::new(0).is_err());
        assert!(EvergreenLevel::new(5).is_err());
        assert_eq!(EvergreenLevel::new(3).expect("valid").label(), "Advanced");
    }

    #[test]
    fn evergreen_status_defaults_to_foundation_and_clears() {
        let assessment = CarbonAssessment::default().with_evergreen_status(CarbonAnswer::Yes);
        assert_eq!(assessment.evergreen_level, Some(EvergreenLevel::FOUNDATION));

        let kept = CarbonAssessment {
            evergreen_level: Some(EvergreenLevel::new(3).expect("valid")),
            ..CarbonAssessment::default()
        }
        .with_evergreen_status(CarbonAnswer::Yes);
        assert_eq!(kept.evergreen_level.map(EvergreenLevel::value), Some(3));

        let cleared = kept.with_evergreen_status(CarbonAnswer::InProgress);
        assert!(cleared.evergreen_level.is_none());
        assert_eq!(cleared.evergreen_status(), CarbonAnswer::No);
    }

    #[test]
    fn answers_serialize_as_kebab_case_codes() {
        let json = serde_json::to_string(&Answer::NoImpact).expect("serialize");
        assert_eq!(json, "\"no-impact\"");
        assert_eq!(Answer::NoImpact.code(), "no-impact");
    }
}
