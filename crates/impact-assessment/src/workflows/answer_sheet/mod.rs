//! Offline answer sheets: a CSV of question answers, optionally carrying the
//! mitigation draft for negatively answered rows.

mod normalizer;
mod parser;

use crate::workflows::assessment::domain::Answer;
use crate::workflows::assessment::{
    Answers, DomainCatalog, MitigationAction, MitigationError, MitigationPlan,
};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use parser::AnswerRecord;

#[derive(Debug, thiserror::Error)]
pub enum AnswerSheetImportError {
    #[error("failed to read answer sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid answer sheet CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: question id '{question_id}' is not in the catalog")]
    UnknownQuestion { line: usize, question_id: String },
    #[error("line {line}: '{value}' is not a recognised answer")]
    UnrecognisedAnswer { line: usize, value: String },
    #[error("line {line}: due date '{value}' must be YYYY-MM-DD or DD/MM/YYYY")]
    InvalidDueDate { line: usize, value: String },
    #[error("line {line}: {source}")]
    Mitigation {
        line: usize,
        #[source]
        source: MitigationError,
    },
}

/// Answers and mitigation drafts recovered from a sheet.
#[derive(Debug, Clone, Default)]
pub struct ImportedSheet {
    pub answers: Answers,
    pub mitigation: MitigationPlan,
}

pub struct AnswerSheetImporter;

impl AnswerSheetImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        catalog: &DomainCatalog,
    ) -> Result<ImportedSheet, AnswerSheetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, catalog)
    }

    /// Later rows for the same question overwrite earlier ones.
    pub fn from_reader<R: Read>(
        reader: R,
        catalog: &DomainCatalog,
    ) -> Result<ImportedSheet, AnswerSheetImportError> {
        let records = parser::parse_records(reader)?;
        let mut sheet = ImportedSheet::default();
        let mut drafts = Vec::new();

        for record in records {
            let Some(question) = catalog.question(&record.question_id) else {
                return Err(AnswerSheetImportError::UnknownQuestion {
                    line: record.line,
                    question_id: record.question_id,
                });
            };

            let Some(raw_answer) = record.answer.as_deref() else {
                debug!(question = question.id, "blank answer left unanswered");
                continue;
            };
            let answer = normalizer::answer_from_cell(raw_answer).ok_or_else(|| {
                AnswerSheetImportError::UnrecognisedAnswer {
                    line: record.line,
                    value: raw_answer.to_string(),
                }
            })?;
            sheet.answers.record(question, answer);

            if record.has_mitigation() {
                drafts.push((question, answer, record));
            }
        }

        for (question, answer, record) in drafts {
            if answer != Answer::Negative || !sheet.answers.is_negative(question.id) {
                warn!(
                    question = question.id,
                    line = record.line,
                    "dropping mitigation columns on a row not answered negative"
                );
                continue;
            }
            let line = record.line;
            let action = mitigation_action(record)?;
            sheet
                .mitigation
                .replace(question, &sheet.answers, action)
                .map_err(|source| AnswerSheetImportError::Mitigation { line, source })?;
        }

        debug!(
            answered = sheet.answers.len(),
            "answer sheet imported"
        );
        Ok(sheet)
    }
}

fn mitigation_action(record: AnswerRecord) -> Result<MitigationAction, AnswerSheetImportError> {
    let due_date = match record.due_date {
        Some(value) => Some(parser::parse_due_date(&value).ok_or(
            AnswerSheetImportError::InvalidDueDate {
                line: record.line,
                value,
            },
        )?),
        None => None,
    };

    Ok(MitigationAction {
        action: record.action.unwrap_or_default(),
        lead: record.lead.unwrap_or_default(),
        due_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn import(csv: &str) -> Result<ImportedSheet, AnswerSheetImportError> {
        AnswerSheetImporter::from_reader(Cursor::new(csv.to_string()), &DomainCatalog::standard())
    }

    #[test]
    fn imports_answers_and_negative_drafts() {
        let sheet = import(
            "Question ID,Answer,Action,Lead,Due Date\n\
travel-1,Positive Impact,,,\n\
cons-1,negative,Switch to reusable trays,Procurement,2024-03-01\n\
cons-2,No Impact,,,\n",
        )
        .expect("import succeeds");

        assert_eq!(sheet.answers.len(), 3);
        assert_eq!(sheet.answers.get("travel-1"), Some(Answer::Positive));
        assert_eq!(sheet.answers.get("cons-2"), Some(Answer::NoImpact));

        let draft = sheet.mitigation.action("cons-1").expect("draft imported");
        assert_eq!(draft.action, "Switch to reusable trays");
        assert_eq!(draft.lead, "Procurement");
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn blank_answers_stay_unanswered() {
        let sheet = import("Question ID,Answer\nres-1,\nres-2,unknown\n").expect("import");
        assert_eq!(sheet.answers.get("res-1"), None);
        assert_eq!(sheet.answers.get("res-2"), Some(Answer::Unknown));
    }

    #[test]
    fn drafts_on_non_negative_rows_are_dropped() {
        let sheet = import(
            "Question ID,Answer,Action,Lead,Due Date\nwork-1,positive,Train staff,HR,2024-05-01\n",
        )
        .expect("import");
        assert!(sheet.mitigation.action("work-1").is_none());
    }

    #[test]
    fn later_rows_override_earlier_answers() {
        let sheet = import(
            "Question ID,Answer,Action,Lead,Due Date\n\
adapt-1,negative,Flood plan,Estates,01/06/2024\n\
adapt-1,positive,,,\n",
        )
        .expect("import");
        assert_eq!(sheet.answers.get("adapt-1"), Some(Answer::Positive));
        assert!(sheet.mitigation.action("adapt-1").is_none());
    }

    #[test]
    fn unknown_question_names_the_line() {
        let err = import("Question ID,Answer\ntravel-1,positive\nbogus-9,negative\n")
            .expect_err("unknown id");
        match err {
            AnswerSheetImportError::UnknownQuestion { line, question_id } => {
                assert_eq!(line, 3);
                assert_eq!(question_id, "bogus-9");
            }
            other => panic!("expected unknown question, got {other:?}"),
        }
    }

    #[test]
    fn unrecognised_answer_is_rejected() {
        let err = import("Question ID,Answer\nsoc-1,somewhat\n").expect_err("bad answer");
        assert_eq!(
            err.to_string(),
            "line 2: 'somewhat' is not a recognised answer"
        );
    }

    #[test]
    fn invalid_due_date_is_rejected() {
        let err = import("Question ID,Answer,Due Date\nit-1,negative,next spring\n")
            .expect_err("bad date");
        assert!(matches!(
            err,
            AnswerSheetImportError::InvalidDueDate { line: 2, .. }
        ));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let err = AnswerSheetImporter::from_path("./does-not-exist.csv", &DomainCatalog::standard())
            .expect_err("expected io error");
        assert!(matches!(err, AnswerSheetImportError::Io(_)));
    }
}
