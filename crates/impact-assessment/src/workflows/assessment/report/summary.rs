use super::super::answers::Answers;
use super::super::catalog::DomainCatalog;
use super::super::domain::{AssessmentData, CarbonAssessment, OrganisationDetails};
use super::super::mitigation::MitigationPlan;
use super::super::scoring::{carbon_standard, category_of, domain_counts, total_counts};
use super::format_date;
use super::views::{
    ActionableQuestionView, AssessmentSummary, CarbonSummaryView, DomainResultEntry,
    MitigationPlanView, MitigationSection, OrganisationView, ScheduledActionView,
    MITIGATION_GUIDANCE,
};
use tracing::warn;

pub fn build_summary(
    catalog: &DomainCatalog,
    data: &AssessmentData,
    answers: &Answers,
) -> AssessmentSummary {
    let totals = total_counts(catalog.domains(), answers);
    let overall_category = category_of(&totals);

    let domains = catalog
        .domains()
        .iter()
        .enumerate()
        .map(|(index, domain)| {
            let counts = domain_counts(domain, answers);
            let category = category_of(&counts);
            DomainResultEntry {
                index,
                domain_id: domain.id,
                title: domain.title,
                counts,
                category,
                category_label: category.label(),
            }
        })
        .collect();

    AssessmentSummary {
        organisation: organisation_view(&data.organisation),
        overall_category,
        overall_category_label: overall_category.label(),
        totals,
        carbon: data.carbon_assessment.as_ref().map(carbon_view),
        domains,
    }
}

pub fn build_mitigation_plan(
    catalog: &DomainCatalog,
    data: &AssessmentData,
    answers: &Answers,
    plan: &MitigationPlan,
) -> MitigationPlanView {
    let sections = catalog
        .domains()
        .iter()
        .filter_map(|domain| {
            let questions: Vec<ActionableQuestionView> = plan
                .actionable_questions(domain, answers)
                .into_iter()
                .map(|question| ActionableQuestionView {
                    question_id: question.id,
                    question_text: question.text,
                    badge: question.category.badge(),
                    draft: plan.action(question.id).cloned().unwrap_or_default(),
                })
                .collect();

            if questions.is_empty() {
                return None;
            }

            Some(MitigationSection {
                domain_id: domain.id,
                domain_title: domain.title,
                negative_count: domain_counts(domain, answers).negative,
                questions,
            })
        })
        .collect();

    let scheduled = plan
        .scheduled_actions(answers)
        .into_iter()
        .filter_map(|entry| {
            let Some(domain) = catalog.domain_for_question(entry.question_id) else {
                warn!(question = entry.question_id, "skipping action for question outside the catalog");
                return None;
            };
            let question = domain.question(entry.question_id)?;
            Some(ScheduledActionView {
                due_date: entry.due_date,
                due_date_label: format_date(entry.due_date),
                domain_title: domain.title,
                question_id: question.id,
                question_text: question.text,
                action: entry.action.action.clone(),
                lead: entry.action.lead.clone(),
            })
        })
        .collect();

    MitigationPlanView {
        organisation: organisation_view(&data.organisation),
        guidance: MITIGATION_GUIDANCE.to_vec(),
        sections,
        scheduled,
    }
}

fn organisation_view(details: &OrganisationDetails) -> OrganisationView {
    OrganisationView {
        organisation_name: details.organisation_name.clone(),
        completion_date: details.completion_date,
        completion_date_label: details
            .completion_date
            .map(format_date)
            .unwrap_or_default(),
        completed_by: details.completed_by.clone(),
        job_role: details.job_role.clone(),
    }
}

fn carbon_view(assessment: &CarbonAssessment) -> CarbonSummaryView {
    let standard = carbon_standard(assessment);
    CarbonSummaryView {
        standard,
        standard_label: standard.label(),
        carbon_plan_label: assessment.has_carbon_plan.label(),
        lifecycle_analysis_label: assessment.has_lifecycle_analysis.label(),
        carbon_impact_label: assessment.has_carbon_impact.label(),
        evergreen_level: assessment.evergreen_level.map(|level| level.value()),
        evergreen_label: assessment.evergreen_level.map(|level| level.label()),
    }
}
