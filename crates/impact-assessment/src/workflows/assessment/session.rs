use super::answers::Answers;
use super::catalog::DomainCatalog;
use super::domain::{
    Answer, AssessmentData, CarbonAssessment, Domain, OrganisationDetails, ValidationError,
};
use super::mitigation::{MitigationAction, MitigationError, MitigationField, MitigationPlan};
use super::report::views::{AssessmentSummary, MitigationPlanView};
use super::report::{build_mitigation_plan, build_summary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Screen currently shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum AssessmentStep {
    OrganisationForm,
    CarbonForm,
    DomainAssessment { index: usize },
    Results,
    MitigationPlan,
}

impl AssessmentStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OrganisationForm => "organisation details",
            Self::CarbonForm => "carbon assessment",
            Self::DomainAssessment { .. } => "domain assessment",
            Self::Results => "results",
            Self::MitigationPlan => "mitigation plan",
        }
    }
}

impl fmt::Display for AssessmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomainAssessment { index } => write!(f, "{} #{}", self.label(), index + 1),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    SubmitOrganisation,
    SubmitCarbon,
    AnswerChanged,
    AttachEvidence,
    Next,
    Back,
    EditDomain,
    Complete,
    UpdateMitigation,
    ExcludeQuestion,
}

impl SessionAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubmitOrganisation => "submit organisation details",
            Self::SubmitCarbon => "submit carbon assessment",
            Self::AnswerChanged => "answer question",
            Self::AttachEvidence => "attach evidence",
            Self::Next => "next",
            Self::Back => "back",
            Self::EditDomain => "edit domain",
            Self::Complete => "complete",
            Self::UpdateMitigation => "update mitigation action",
            Self::ExcludeQuestion => "remove from plan",
        }
    }
}

/// Evidence picked for a question. Kept for the session only; never exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceAttachment {
    pub file_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot {} on the {} screen", .action.label(), .step.label())]
    InvalidAction {
        action: SessionAction,
        step: AssessmentStep,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("question {0} is not part of the assessment")]
    UnknownQuestion(String),
    #[error("domain {index} is out of range, the assessment has {count} domains")]
    DomainOutOfRange { index: usize, count: usize },
    #[error("the assessment catalog has no domains")]
    EmptyCatalog,
    #[error(transparent)]
    Mitigation(#[from] MitigationError),
}

/// One user's pass through the wizard.
///
/// Owns every piece of collected state; views and documents are derived from
/// it on demand and never write back.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    catalog: DomainCatalog,
    step: AssessmentStep,
    data: AssessmentData,
    answers: Answers,
    evidence: BTreeMap<&'static str, EvidenceAttachment>,
    mitigation: MitigationPlan,
}

impl AssessmentSession {
    pub fn new(catalog: DomainCatalog) -> Self {
        Self {
            catalog,
            step: AssessmentStep::OrganisationForm,
            data: AssessmentData::default(),
            answers: Answers::new(),
            evidence: BTreeMap::new(),
            mitigation: MitigationPlan::new(),
        }
    }

    pub fn step(&self) -> AssessmentStep {
        self.step
    }

    pub fn catalog(&self) -> &DomainCatalog {
        &self.catalog
    }

    pub fn data(&self) -> &AssessmentData {
        &self.data
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn mitigation(&self) -> &MitigationPlan {
        &self.mitigation
    }

    pub fn evidence(&self, question_id: &str) -> Option<&EvidenceAttachment> {
        self.evidence.get(question_id)
    }

    pub fn current_domain_index(&self) -> Option<usize> {
        match self.step {
            AssessmentStep::DomainAssessment { index } => Some(index),
            _ => None,
        }
    }

    pub fn current_domain(&self) -> Option<&Domain> {
        self.current_domain_index()
            .and_then(|index| self.catalog.domain(index))
    }

    /// 1-based position and total while a domain screen is shown.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.current_domain_index()
            .map(|index| (index + 1, self.catalog.len()))
    }

    pub fn is_last_domain(&self) -> bool {
        self.current_domain_index()
            .is_some_and(|index| Some(index) == self.catalog.last_index())
    }

    /// Values the carbon form starts from; a revisit shows what was submitted.
    pub fn carbon_form_defaults(&self) -> CarbonAssessment {
        self.data.carbon_assessment.unwrap_or_default()
    }

    pub fn submit_organisation(
        &mut self,
        details: OrganisationDetails,
    ) -> Result<AssessmentStep, SessionError> {
        self.require(SessionAction::SubmitOrganisation, |step| {
            step == AssessmentStep::OrganisationForm
        })?;
        details.validate()?;

        self.data.organisation = details;
        Ok(self.transition(AssessmentStep::CarbonForm))
    }

    pub fn submit_carbon(
        &mut self,
        assessment: CarbonAssessment,
    ) -> Result<AssessmentStep, SessionError> {
        self.require(SessionAction::SubmitCarbon, |step| {
            step == AssessmentStep::CarbonForm
        })?;
        if self.catalog.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }

        self.data.carbon_assessment = Some(assessment);
        Ok(self.transition(AssessmentStep::DomainAssessment { index: 0 }))
    }

    /// Upserts a single answer, returning the one it replaced.
    pub fn answer_changed(
        &mut self,
        question_id: &str,
        answer: Answer,
    ) -> Result<Option<Answer>, SessionError> {
        self.require(SessionAction::AnswerChanged, is_domain_screen)?;
        let question = self
            .catalog
            .question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;

        let previous = self.answers.record(question, answer);
        debug!(question = question.id, answer = answer.code(), "answer recorded");
        Ok(previous)
    }

    pub fn attach_evidence(
        &mut self,
        question_id: &str,
        attachment: EvidenceAttachment,
    ) -> Result<(), SessionError> {
        self.require(SessionAction::AttachEvidence, is_domain_screen)?;
        let question = self
            .catalog
            .question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;

        debug!(question = question.id, file = %attachment.file_name, "evidence attached");
        self.evidence.insert(question.id, attachment);
        Ok(())
    }

    pub fn next(&mut self) -> Result<AssessmentStep, SessionError> {
        let index = match self.step {
            AssessmentStep::DomainAssessment { index } => index,
            step => return Err(invalid(SessionAction::Next, step)),
        };

        let to = if index + 1 < self.catalog.len() {
            AssessmentStep::DomainAssessment { index: index + 1 }
        } else {
            AssessmentStep::Results
        };
        Ok(self.transition(to))
    }

    pub fn back(&mut self) -> Result<AssessmentStep, SessionError> {
        let to = match self.step {
            AssessmentStep::OrganisationForm => {
                return Err(invalid(SessionAction::Back, self.step))
            }
            AssessmentStep::CarbonForm => AssessmentStep::OrganisationForm,
            AssessmentStep::DomainAssessment { index: 0 } => AssessmentStep::CarbonForm,
            AssessmentStep::DomainAssessment { index } => {
                AssessmentStep::DomainAssessment { index: index - 1 }
            }
            AssessmentStep::Results => {
                let index = self.catalog.last_index().ok_or(SessionError::EmptyCatalog)?;
                AssessmentStep::DomainAssessment { index }
            }
            AssessmentStep::MitigationPlan => AssessmentStep::Results,
        };
        Ok(self.transition(to))
    }

    pub fn edit_domain(&mut self, index: usize) -> Result<AssessmentStep, SessionError> {
        self.require(SessionAction::EditDomain, |step| step == AssessmentStep::Results)?;
        if index >= self.catalog.len() {
            return Err(SessionError::DomainOutOfRange {
                index,
                count: self.catalog.len(),
            });
        }
        Ok(self.transition(AssessmentStep::DomainAssessment { index }))
    }

    pub fn complete(&mut self) -> Result<AssessmentStep, SessionError> {
        self.require(SessionAction::Complete, |step| step == AssessmentStep::Results)?;
        Ok(self.transition(AssessmentStep::MitigationPlan))
    }

    pub fn update_mitigation(
        &mut self,
        question_id: &str,
        field: MitigationField,
    ) -> Result<&MitigationAction, SessionError> {
        self.require(SessionAction::UpdateMitigation, |step| {
            step == AssessmentStep::MitigationPlan
        })?;
        let question = self
            .catalog
            .question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;

        Ok(self.mitigation.update(question, &self.answers, field)?)
    }

    /// One-way: there is no operation that brings an excluded question back.
    pub fn exclude_question(
        &mut self,
        question_id: &str,
    ) -> Result<Option<MitigationAction>, SessionError> {
        self.require(SessionAction::ExcludeQuestion, |step| {
            step == AssessmentStep::MitigationPlan
        })?;
        let question = self
            .catalog
            .question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;

        debug!(question = question.id, "question removed from mitigation plan");
        Ok(self.mitigation.exclude(question))
    }

    pub fn summary(&self) -> AssessmentSummary {
        build_summary(&self.catalog, &self.data, &self.answers)
    }

    pub fn mitigation_plan(&self) -> MitigationPlanView {
        build_mitigation_plan(&self.catalog, &self.data, &self.answers, &self.mitigation)
    }

    fn require(
        &self,
        action: SessionAction,
        allowed: impl Fn(AssessmentStep) -> bool,
    ) -> Result<(), SessionError> {
        if allowed(self.step) {
            Ok(())
        } else {
            Err(invalid(action, self.step))
        }
    }

    fn transition(&mut self, to: AssessmentStep) -> AssessmentStep {
        debug!(from = %self.step, to = %to, "assessment step changed");
        self.step = to;
        to
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new(DomainCatalog::standard())
    }
}

fn is_domain_screen(step: AssessmentStep) -> bool {
    matches!(step, AssessmentStep::DomainAssessment { .. })
}

fn invalid(action: SessionAction, step: AssessmentStep) -> SessionError {
    SessionError::InvalidAction { action, step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::domain::{CarbonAnswer, RequiredField};
    use chrono::NaiveDate;

    fn details() -> OrganisationDetails {
        OrganisationDetails {
            organisation_name: "Riverside Health Partnership".to_string(),
            completion_date: NaiveDate::from_ymd_opt(2024, 4, 9),
            completed_by: "Priya Natarajan".to_string(),
            job_role: "Programme Manager".to_string(),
        }
    }

    fn at_first_domain() -> AssessmentSession {
        let mut session = AssessmentSession::default();
        session.submit_organisation(details()).expect("details accepted");
        session
            .submit_carbon(CarbonAssessment::default())
            .expect("carbon accepted");
        session
    }

    #[test]
    fn starts_on_empty_organisation_form() {
        let session = AssessmentSession::default();
        assert_eq!(session.step(), AssessmentStep::OrganisationForm);
        assert!(session.answers().is_empty());
        assert_eq!(session.data(), &AssessmentData::default());
        assert!(session.progress().is_none());
    }

    #[test]
    fn invalid_details_keep_the_form_open() {
        let mut session = AssessmentSession::default();
        let mut form = details();
        form.completed_by.clear();

        let err = session
            .submit_organisation(form)
            .expect_err("missing name blocks progress");
        match err {
            SessionError::Validation(validation) => {
                assert_eq!(validation.missing, vec![RequiredField::CompletedBy]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(session.step(), AssessmentStep::OrganisationForm);
    }

    #[test]
    fn carbon_submission_merges_with_organisation_details() {
        let mut session = AssessmentSession::default();
        session.submit_organisation(details()).expect("details accepted");
        let carbon = CarbonAssessment {
            has_carbon_plan: CarbonAnswer::Yes,
            ..CarbonAssessment::default()
        };
        let step = session.submit_carbon(carbon).expect("carbon accepted");

        assert_eq!(step, AssessmentStep::DomainAssessment { index: 0 });
        assert_eq!(session.data().organisation, details());
        assert_eq!(session.data().carbon_assessment, Some(carbon));
    }

    #[test]
    fn resubmitting_details_keeps_carbon_answers() {
        let mut session = at_first_domain();
        session.back().expect("to carbon form");
        session.back().expect("to organisation form");

        let mut form = details();
        form.job_role = "Director of Estates".to_string();
        session.submit_organisation(form).expect("details accepted");

        assert_eq!(session.step(), AssessmentStep::CarbonForm);
        assert!(session.data().carbon_assessment.is_some());
        assert_eq!(session.data().organisation.job_role, "Director of Estates");
    }

    #[test]
    fn answers_only_accepted_on_domain_screens() {
        let mut session = AssessmentSession::default();
        let err = session
            .answer_changed("moc-1", Answer::Positive)
            .expect_err("no answers on the organisation form");
        assert_eq!(
            err,
            SessionError::InvalidAction {
                action: SessionAction::AnswerChanged,
                step: AssessmentStep::OrganisationForm,
            }
        );
    }

    #[test]
    fn answer_changed_upserts_without_touching_others() {
        let mut session = at_first_domain();
        session.answer_changed("moc-1", Answer::Positive).expect("recorded");
        session.answer_changed("moc-2", Answer::Unknown).expect("recorded");
        let previous = session
            .answer_changed("moc-1", Answer::Negative)
            .expect("recorded");

        assert_eq!(previous, Some(Answer::Positive));
        assert_eq!(session.answers().get("moc-1"), Some(Answer::Negative));
        assert_eq!(session.answers().get("moc-2"), Some(Answer::Unknown));
        assert_eq!(session.answers().len(), 2);
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut session = at_first_domain();
        let err = session
            .answer_changed("moc-42", Answer::Positive)
            .expect_err("unknown id");
        assert_eq!(err, SessionError::UnknownQuestion("moc-42".to_string()));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn back_from_first_domain_returns_to_carbon_form() {
        let mut session = at_first_domain();
        assert_eq!(session.back().expect("back"), AssessmentStep::CarbonForm);
        assert_eq!(session.back().expect("back"), AssessmentStep::OrganisationForm);
        assert!(session.back().is_err());
    }

    #[test]
    fn next_from_last_domain_shows_results() {
        let mut session = at_first_domain();
        let total = session.catalog().len();
        for expected in 1..total {
            assert_eq!(
                session.next().expect("advance"),
                AssessmentStep::DomainAssessment { index: expected }
            );
        }
        assert!(session.is_last_domain());
        assert_eq!(session.progress(), Some((total, total)));
        assert_eq!(session.next().expect("finish"), AssessmentStep::Results);
    }

    #[test]
    fn results_back_returns_to_last_domain_after_edit() {
        let mut session = at_first_domain();
        while session.step() != AssessmentStep::Results {
            session.next().expect("advance");
        }
        session.edit_domain(2).expect("edit");
        while session.step() != AssessmentStep::Results {
            session.next().expect("advance");
        }

        let last = session.catalog().last_index().expect("non-empty");
        assert_eq!(
            session.back().expect("back"),
            AssessmentStep::DomainAssessment { index: last }
        );
    }

    #[test]
    fn edit_domain_validates_index_and_step() {
        let mut session = at_first_domain();
        assert!(matches!(
            session.edit_domain(0),
            Err(SessionError::InvalidAction { .. })
        ));

        while session.step() != AssessmentStep::Results {
            session.next().expect("advance");
        }
        let count = session.catalog().len();
        assert_eq!(
            session.edit_domain(count),
            Err(SessionError::DomainOutOfRange { index: count, count })
        );
        assert_eq!(session.step(), AssessmentStep::Results);
    }

    #[test]
    fn mitigation_edits_require_the_plan_screen() {
        let mut session = at_first_domain();
        session.answer_changed("moc-3", Answer::Negative).expect("recorded");
        assert!(session
            .update_mitigation("moc-3", MitigationField::Lead("Ops".into()))
            .is_err());

        while session.step() != AssessmentStep::Results {
            session.next().expect("advance");
        }
        session.complete().expect("to plan");
        session
            .update_mitigation("moc-3", MitigationField::Lead("Ops".into()))
            .expect("actionable on plan screen");
        assert_eq!(
            session.mitigation().action("moc-3").map(|a| a.lead.as_str()),
            Some("Ops")
        );

        assert_eq!(session.back().expect("back"), AssessmentStep::Results);
    }

    #[test]
    fn evidence_is_kept_per_question() {
        let mut session = at_first_domain();
        session
            .attach_evidence(
                "moc-4",
                EvidenceAttachment {
                    file_name: "clinic-audit.pdf".to_string(),
                    description: "Appointment audit".to_string(),
                },
            )
            .expect("attached");
        assert_eq!(
            session.evidence("moc-4").map(|e| e.file_name.as_str()),
            Some("clinic-audit.pdf")
        );
        assert!(session.evidence("moc-1").is_none());
    }

    #[test]
    fn carbon_form_defaults_follow_submitted_values() {
        let mut session = at_first_domain();
        assert_eq!(session.carbon_form_defaults(), CarbonAssessment::default());
        session.back().expect("back to carbon form");
        let updated = CarbonAssessment::default().with_evergreen_status(CarbonAnswer::Yes);
        session.submit_carbon(updated).expect("carbon accepted");
        assert_eq!(session.carbon_form_defaults(), updated);
    }

    #[test]
    fn empty_catalog_cannot_start_domain_screens() {
        let catalog = DomainCatalog::from_domains(Vec::new()).expect("empty catalog");
        let mut session = AssessmentSession::new(catalog);
        session.submit_organisation(details()).expect("details accepted");
        assert_eq!(
            session.submit_carbon(CarbonAssessment::default()),
            Err(SessionError::EmptyCatalog)
        );
        assert_eq!(session.step(), AssessmentStep::CarbonForm);
    }
}
