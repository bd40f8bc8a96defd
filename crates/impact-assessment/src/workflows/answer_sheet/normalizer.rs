use crate::workflows::assessment::domain::Answer;

pub(crate) fn normalize_cell(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Matches an answer cell against answer codes and display labels.
pub(crate) fn answer_from_cell(value: &str) -> Option<Answer> {
    let normalized = normalize_cell(value);
    Answer::ordered().into_iter().find(|answer| {
        normalized == answer.code()
            || normalized == answer.label().to_ascii_lowercase()
            || normalized == answer.code().replace('-', " ")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_bom_and_collapses_whitespace() {
        assert_eq!(normalize_cell("\u{feff}  No   Impact "), "no impact");
    }

    #[test]
    fn answers_match_codes_and_labels() {
        assert_eq!(answer_from_cell("Positive"), Some(Answer::Positive));
        assert_eq!(answer_from_cell("Negative Impact"), Some(Answer::Negative));
        assert_eq!(answer_from_cell("no-impact"), Some(Answer::NoImpact));
        assert_eq!(answer_from_cell("NO  IMPACT"), Some(Answer::NoImpact));
        assert_eq!(answer_from_cell("unknown impact"), Some(Answer::Unknown));
        assert_eq!(answer_from_cell("maybe"), None);
    }
}
