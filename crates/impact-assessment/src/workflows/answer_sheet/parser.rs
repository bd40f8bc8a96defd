use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct AnswerRecord {
    /// File line the row came from, counting the header as line 1.
    pub(crate) line: usize,
    pub(crate) question_id: String,
    pub(crate) answer: Option<String>,
    pub(crate) action: Option<String>,
    pub(crate) lead: Option<String>,
    pub(crate) due_date: Option<String>,
}

impl AnswerRecord {
    pub(crate) fn has_mitigation(&self) -> bool {
        self.action.is_some() || self.lead.is_some() || self.due_date.is_some()
    }
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<AnswerRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<AnswerRow>().enumerate() {
        let row = record?;
        records.push(AnswerRecord {
            line: index + 2,
            question_id: row.question_id,
            answer: row.answer,
            action: row.action,
            lead: row.lead,
            due_date: row.due_date,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    #[serde(rename = "Question ID")]
    question_id: String,
    #[serde(rename = "Answer", default, deserialize_with = "empty_string_as_none")]
    answer: Option<String>,
    #[serde(rename = "Action", default, deserialize_with = "empty_string_as_none")]
    action: Option<String>,
    #[serde(rename = "Lead", default, deserialize_with = "empty_string_as_none")]
    lead: Option<String>,
    #[serde(rename = "Due Date", default, deserialize_with = "empty_string_as_none")]
    due_date: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts ISO dates and the day-first form used in exported documents.
pub(crate) fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn optional_columns_may_be_missing() {
        let records = parse_records(Cursor::new("Question ID,Answer\ntravel-1,positive\n"))
            .expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[0].answer.as_deref(), Some("positive"));
        assert!(!records[0].has_mitigation());
    }

    #[test]
    fn blank_cells_become_none() {
        let records = parse_records(Cursor::new(
            "Question ID,Answer,Action,Lead,Due Date\ncons-2,  ,, Estates ,\n",
        ))
        .expect("parse");
        assert!(records[0].answer.is_none());
        assert!(records[0].action.is_none());
        assert_eq!(records[0].lead.as_deref(), Some("Estates"));
        assert!(records[0].has_mitigation());
    }

    #[test]
    fn due_dates_accept_iso_and_day_first() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_due_date("2024-03-01"), expected);
        assert_eq!(parse_due_date(" 01/03/2024 "), expected);
        assert_eq!(parse_due_date("March 1st"), None);
    }
}
