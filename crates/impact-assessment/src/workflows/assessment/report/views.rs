use super::super::domain::{CarbonStandard, ImpactCategory, ImpactCounts};
use super::super::mitigation::MitigationAction;
use chrono::NaiveDate;
use serde::Serialize;

pub const MITIGATION_GUIDANCE: [&str; 3] = [
    "The mitigation plan helps manage and reduce environmental risks associated with your project. Focus on key actions that will have the most impact.",
    "For each action, include: Action - steps to address the environmental impact; Lead - responsible individual or team; Due Date - deadline for completion.",
    "Items can be removed from the plan if you don't plan to address them at this time.",
];

#[derive(Debug, Clone, Serialize)]
pub struct OrganisationView {
    pub organisation_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    pub completion_date_label: String,
    pub completed_by: String,
    pub job_role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarbonSummaryView {
    pub standard: CarbonStandard,
    pub standard_label: &'static str,
    pub carbon_plan_label: &'static str,
    pub lifecycle_analysis_label: &'static str,
    pub carbon_impact_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evergreen_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evergreen_label: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainResultEntry {
    pub index: usize,
    pub domain_id: &'static str,
    pub title: &'static str,
    pub counts: ImpactCounts,
    pub category: ImpactCategory,
    pub category_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummary {
    pub organisation: OrganisationView,
    pub overall_category: ImpactCategory,
    pub overall_category_label: &'static str,
    pub totals: ImpactCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon: Option<CarbonSummaryView>,
    pub domains: Vec<DomainResultEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionableQuestionView {
    pub question_id: &'static str,
    pub question_text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<&'static str>,
    pub draft: MitigationAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct MitigationSection {
    pub domain_id: &'static str,
    pub domain_title: &'static str,
    pub negative_count: usize,
    pub questions: Vec<ActionableQuestionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledActionView {
    pub due_date: NaiveDate,
    pub due_date_label: String,
    pub domain_title: &'static str,
    pub question_id: &'static str,
    pub question_text: &'static str,
    pub action: String,
    pub lead: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MitigationPlanView {
    pub organisation: OrganisationView,
    pub guidance: Vec<&'static str>,
    pub sections: Vec<MitigationSection>,
    pub scheduled: Vec<ScheduledActionView>,
}
