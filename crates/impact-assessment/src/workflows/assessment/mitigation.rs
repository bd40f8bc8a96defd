use super::answers::Answers;
use super::domain::{Domain, Question};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Remediation drafted for a negatively answered question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MitigationAction {
    pub action: String,
    pub lead: String,
    pub due_date: Option<NaiveDate>,
}

/// Single field edit, merged into any existing draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MitigationField {
    Action(String),
    Lead(String),
    DueDate(Option<NaiveDate>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAction<'a> {
    pub question_id: &'static str,
    pub due_date: NaiveDate,
    pub action: &'a MitigationAction,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MitigationError {
    #[error("question {0} is not answered negative or has been removed from the plan")]
    NotActionable(String),
}

/// Drafted actions plus the one-way exclusion set.
///
/// Drafts are never deleted when an answer moves away from negative; they are
/// filtered out whenever the plan is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MitigationPlan {
    actions: BTreeMap<&'static str, MitigationAction>,
    excluded: BTreeSet<&'static str>,
}

impl MitigationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_excluded(&self, question_id: &str) -> bool {
        self.excluded.contains(question_id)
    }

    pub fn is_actionable(&self, question_id: &str, answers: &Answers) -> bool {
        answers.is_negative(question_id) && !self.is_excluded(question_id)
    }

    pub fn actionable_questions<'d>(&self, domain: &'d Domain, answers: &Answers) -> Vec<&'d Question> {
        domain
            .questions
            .iter()
            .filter(|question| self.is_actionable(question.id, answers))
            .collect()
    }

    pub fn action(&self, question_id: &str) -> Option<&MitigationAction> {
        self.actions.get(question_id)
    }

    pub fn update(
        &mut self,
        question: &Question,
        answers: &Answers,
        field: MitigationField,
    ) -> Result<&MitigationAction, MitigationError> {
        if !self.is_actionable(question.id, answers) {
            return Err(MitigationError::NotActionable(question.id.to_string()));
        }

        let entry = self.actions.entry(question.id).or_default();
        match field {
            MitigationField::Action(action) => entry.action = action,
            MitigationField::Lead(lead) => entry.lead = lead,
            MitigationField::DueDate(due_date) => entry.due_date = due_date,
        }
        Ok(entry)
    }

    pub fn replace(
        &mut self,
        question: &Question,
        answers: &Answers,
        action: MitigationAction,
    ) -> Result<(), MitigationError> {
        if !self.is_actionable(question.id, answers) {
            return Err(MitigationError::NotActionable(question.id.to_string()));
        }
        self.actions.insert(question.id, action);
        Ok(())
    }

    /// Removes the question from the plan for the rest of the session,
    /// returning any draft that was discarded.
    pub fn exclude(&mut self, question: &Question) -> Option<MitigationAction> {
        self.excluded.insert(question.id);
        self.actions.remove(question.id)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.excluded.iter().copied()
    }

    /// Dated drafts for actionable questions, earliest first.
    pub fn scheduled_actions(&self, answers: &Answers) -> Vec<ScheduledAction<'_>> {
        let mut scheduled: Vec<ScheduledAction<'_>> = self
            .actions
            .iter()
            .filter(|(question_id, _)| self.is_actionable(question_id, answers))
            .filter_map(|(question_id, action)| {
                action.due_date.map(|due_date| ScheduledAction {
                    question_id: *question_id,
                    due_date,
                    action,
                })
            })
            .collect();

        scheduled.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        scheduled
    }
}
