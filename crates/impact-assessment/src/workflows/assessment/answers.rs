use super::domain::{Answer, Question};
use serde::Serialize;
use std::collections::BTreeMap;

/// Recorded answers keyed by catalog question id. A missing key means unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Answers {
    entries: BTreeMap<&'static str, Answer>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<Answer> {
        self.entries.get(question_id).copied()
    }

    /// Upserts the answer for `question`, returning the previous answer if any.
    pub fn record(&mut self, question: &Question, answer: Answer) -> Option<Answer> {
        self.entries.insert(question.id, answer)
    }

    pub fn is_negative(&self, question_id: &str) -> bool {
        self.get(question_id) == Some(Answer::Negative)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Answer)> + '_ {
        self.entries.iter().map(|(id, answer)| (*id, *answer))
    }
}
