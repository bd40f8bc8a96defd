use crate::infra::{parse_carbon_answer, parse_date, parse_evergreen_level};
use chrono::NaiveDate;
use impact_assessment::workflows::assessment::domain::{
    Answer, CarbonAnswer, CarbonAssessment, OrganisationDetails,
};
use impact_assessment::workflows::assessment::report::format_date;
use impact_assessment::workflows::assessment::{
    AssessmentSession, AssessmentStep, DocumentExporter, EvidenceAttachment, MitigationField,
    SessionError,
};
use std::io::{self, BufRead, Write};
use tracing::warn;

const DOMAIN_HELP: &str = "Answer with '<number> <p|n|0|?>' (positive, negative, no impact, unknown), \
'evidence <number> <file> [description]', 'next', 'back' or 'quit'.";
const RESULTS_HELP: &str = "Commands: 'edit <domain number>', 'complete', 'back', 'export', 'quit'.";
const MITIGATION_HELP: &str = "Commands: 'action <n> <text>', 'lead <n> <name>', \
'due <n> <YYYY-MM-DD|clear>', 'remove <n>', 'export', 'back', 'quit'.";

/// A single line typed on the domain, results or mitigation screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Answer { number: usize, answer: Answer },
    Evidence { number: usize, file_name: String, description: String },
    Next,
    Back,
    Edit(usize),
    Complete,
    Action { number: usize, text: String },
    Lead { number: usize, text: String },
    Due { number: usize, date: Option<NaiveDate> },
    Remove(usize),
    Export,
    Help,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "next" | "n" if rest.is_empty() => Ok(Command::Next),
        "back" | "b" => Ok(Command::Back),
        "complete" => Ok(Command::Complete),
        "export" => Ok(Command::Export),
        "help" | "h" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "edit" => Ok(Command::Edit(parse_number(rest)?)),
        "remove" => Ok(Command::Remove(parse_number(rest)?)),
        "evidence" => {
            let (number, rest) = split_number(rest)?;
            let (file_name, description) = match rest.split_once(char::is_whitespace) {
                Some((file, description)) => (file, description.trim()),
                None => (rest, ""),
            };
            if file_name.is_empty() {
                return Err("evidence needs a file name".to_string());
            }
            Ok(Command::Evidence {
                number,
                file_name: file_name.to_string(),
                description: description.to_string(),
            })
        }
        "action" => {
            let (number, text) = split_number(rest)?;
            Ok(Command::Action {
                number,
                text: text.to_string(),
            })
        }
        "lead" => {
            let (number, text) = split_number(rest)?;
            Ok(Command::Lead {
                number,
                text: text.to_string(),
            })
        }
        "due" => {
            let (number, raw) = split_number(rest)?;
            let date = match raw.to_ascii_lowercase().as_str() {
                "" | "clear" | "none" => None,
                _ => Some(parse_date(raw)?),
            };
            Ok(Command::Due { number, date })
        }
        _ => {
            let number = parse_number(head)?;
            let answer = parse_answer(rest)?;
            Ok(Command::Answer { number, answer })
        }
    }
}

fn parse_number(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(format!("'{}' is not a number from the list", raw.trim())),
    }
}

fn split_number(raw: &str) -> Result<(usize, &str), String> {
    let (number, rest) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
    Ok((parse_number(number)?, rest.trim()))
}

fn parse_answer(raw: &str) -> Result<Answer, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    let answer = match normalized.as_str() {
        "p" | "+" => Answer::Positive,
        "n" | "-" => Answer::Negative,
        "0" => Answer::NoImpact,
        "?" => Answer::Unknown,
        other => Answer::ordered()
            .into_iter()
            .find(|answer| answer.code() == other)
            .ok_or_else(|| format!("'{}' is not an answer; use p, n, 0 or ?", raw.trim()))?,
    };
    Ok(answer)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Terminal front end over an [`AssessmentSession`].
pub(crate) struct Wizard<R, W> {
    input: R,
    output: W,
    session: AssessmentSession,
    exporter: DocumentExporter,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    pub(crate) fn new(input: R, output: W, exporter: DocumentExporter) -> Self {
        Self {
            input,
            output,
            session: AssessmentSession::default(),
            exporter,
        }
    }

    /// Runs until the user quits or input ends, returning the session as left.
    pub(crate) fn run(mut self) -> io::Result<AssessmentSession> {
        writeln!(self.output, "Environmental Impact Assessment")?;
        loop {
            let flow = match self.session.step() {
                AssessmentStep::OrganisationForm => self.organisation_screen()?,
                AssessmentStep::CarbonForm => self.carbon_screen()?,
                AssessmentStep::DomainAssessment { .. } => self.domain_screen()?,
                AssessmentStep::Results => self.results_screen()?,
                AssessmentStep::MitigationPlan => self.mitigation_screen()?,
            };
            if flow == Flow::Quit {
                break;
            }
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        Ok(self.session)
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn organisation_screen(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\nOrganisation Details")?;
        let current = self.session.data().organisation.clone();

        let Some(organisation_name) = self.read_field("Organisation name", &current.organisation_name)?
        else {
            return Ok(Flow::Quit);
        };
        let current_date = current.completion_date.map(|date| date.to_string()).unwrap_or_default();
        let Some(raw_date) = self.read_field("Completion date (YYYY-MM-DD)", &current_date)? else {
            return Ok(Flow::Quit);
        };
        let completion_date = if raw_date.is_empty() {
            None
        } else {
            match parse_date(&raw_date) {
                Ok(date) => Some(date),
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    None
                }
            }
        };
        let Some(completed_by) = self.read_field("Completed by", &current.completed_by)? else {
            return Ok(Flow::Quit);
        };
        let Some(job_role) = self.read_field("Job role", &current.job_role)? else {
            return Ok(Flow::Quit);
        };

        let details = OrganisationDetails {
            organisation_name,
            completion_date,
            completed_by,
            job_role,
        };
        if let Err(err) = self.session.submit_organisation(details) {
            writeln!(self.output, "{err}")?;
        }
        Ok(Flow::Continue)
    }

    /// Reads one form field; an empty line keeps `current`.
    fn read_field(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        let prompt = if current.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{current}]: ")
        };
        Ok(self.read_line(&prompt)?.map(|value| {
            if value.is_empty() {
                current.to_string()
            } else {
                value
            }
        }))
    }

    fn carbon_screen(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\nCarbon Assessment (type 'back' to return)")?;
        let defaults = self.session.carbon_form_defaults();

        let questions = [
            ("Do you have a carbon reduction plan?", defaults.has_carbon_plan),
            (
                "Have you completed a lifecycle analysis?",
                defaults.has_lifecycle_analysis,
            ),
            (
                "Have you quantified your carbon impact?",
                defaults.has_carbon_impact,
            ),
            (
                "Have you completed the Evergreen sustainable supplier assessment?",
                defaults.evergreen_status(),
            ),
        ];
        let mut responses = [CarbonAnswer::No; 4];
        for (slot, (question, default)) in responses.iter_mut().zip(questions) {
            match self.read_carbon_answer(question, default)? {
                CarbonInput::Answer(answer) => *slot = answer,
                CarbonInput::Back => return self.go_back(),
                CarbonInput::Quit => return Ok(Flow::Quit),
            }
        }
        let [has_carbon_plan, has_lifecycle_analysis, has_carbon_impact, evergreen] = responses;

        let mut assessment = CarbonAssessment {
            has_carbon_plan,
            has_lifecycle_analysis,
            has_carbon_impact,
            evergreen_level: defaults.evergreen_level,
        }
        .with_evergreen_status(evergreen);

        if let Some(current) = assessment.evergreen_level {
            loop {
                let prompt = format!("Evergreen level 1-4 [{}]: ", current.value());
                let Some(raw) = self.read_line(&prompt)? else {
                    return Ok(Flow::Quit);
                };
                if raw.is_empty() {
                    break;
                }
                match parse_evergreen_level(&raw) {
                    Ok(level) => {
                        assessment.evergreen_level = Some(level);
                        break;
                    }
                    Err(err) => writeln!(self.output, "{err}")?,
                }
            }
        }

        if let Err(err) = self.session.submit_carbon(assessment) {
            writeln!(self.output, "{err}")?;
        }
        Ok(Flow::Continue)
    }

    fn read_carbon_answer(&mut self, question: &str, default: CarbonAnswer) -> io::Result<CarbonInput> {
        loop {
            let prompt = format!("{question} (yes/no/in-progress) [{}]: ", default.label());
            let Some(raw) = self.read_line(&prompt)? else {
                return Ok(CarbonInput::Quit);
            };
            match raw.to_ascii_lowercase().as_str() {
                "" => return Ok(CarbonInput::Answer(default)),
                "back" => return Ok(CarbonInput::Back),
                "quit" => return Ok(CarbonInput::Quit),
                _ => match parse_carbon_answer(&raw) {
                    Ok(answer) => return Ok(CarbonInput::Answer(answer)),
                    Err(err) => writeln!(self.output, "{err}")?,
                },
            }
        }
    }

    fn domain_screen(&mut self) -> io::Result<Flow> {
        let Some(domain) = self.session.current_domain().cloned() else {
            return self.report(SessionError::EmptyCatalog);
        };
        let (position, total) = self.session.progress().unwrap_or((1, 1));

        writeln!(self.output, "\nDomain {position} of {total}: {}", domain.title)?;
        if let Some(description) = domain.description {
            writeln!(self.output, "{description}")?;
        }
        for (number, question) in domain.questions.iter().enumerate() {
            let answer = self
                .session
                .answers()
                .get(question.id)
                .map(|answer| answer.label())
                .unwrap_or("not answered");
            let badge = question
                .category
                .badge()
                .map(|badge| format!(" [{badge}]"))
                .unwrap_or_default();
            let evidence = self
                .session
                .evidence(question.id)
                .map(|attachment| format!(" (evidence: {})", attachment.file_name))
                .unwrap_or_default();
            writeln!(
                self.output,
                "{}. {}{badge}\n   -> {answer}{evidence}",
                number + 1,
                question.text
            )?;
        }
        if self.session.is_last_domain() {
            writeln!(self.output, "This is the last domain; 'next' shows the results.")?;
        }

        let Some(command) = self.read_command()? else {
            return Ok(Flow::Quit);
        };
        let question_id = |number: usize| {
            domain
                .questions
                .get(number - 1)
                .map(|question| question.id)
                .ok_or_else(|| format!("question {number} is not on this screen"))
        };

        let outcome = match command {
            Command::Answer { number, answer } => match question_id(number) {
                Ok(id) => self.session.answer_changed(id, answer).map(|_| ()),
                Err(message) => return self.message(&message),
            },
            Command::Evidence {
                number,
                file_name,
                description,
            } => match question_id(number) {
                Ok(id) => self.session.attach_evidence(
                    id,
                    EvidenceAttachment {
                        file_name,
                        description,
                    },
                ),
                Err(message) => return self.message(&message),
            },
            Command::Next => self.session.next().map(|_| ()),
            Command::Back => self.session.back().map(|_| ()),
            Command::Help => return self.message(DOMAIN_HELP),
            Command::Quit => return Ok(Flow::Quit),
            _ => return self.message(DOMAIN_HELP),
        };
        self.finish(outcome)
    }

    fn results_screen(&mut self) -> io::Result<Flow> {
        let summary = self.session.summary();
        writeln!(self.output, "\nAssessment Results")?;
        writeln!(
            self.output,
            "Overall: {} {} (positive {}, negative {}, no impact {}, unknown {})",
            summary.overall_category.marker(),
            summary.overall_category_label,
            summary.totals.positive,
            summary.totals.negative,
            summary.totals.no_impact,
            summary.totals.unknown
        )?;
        if let Some(carbon) = &summary.carbon {
            writeln!(
                self.output,
                "Carbon standard: {} {}",
                carbon.standard.marker(),
                carbon.standard_label
            )?;
        }
        for entry in &summary.domains {
            writeln!(
                self.output,
                "{}. {} {}: {} (P {} / N {} / 0 {} / ? {})",
                entry.index + 1,
                entry.category.marker(),
                entry.title,
                entry.category_label,
                entry.counts.positive,
                entry.counts.negative,
                entry.counts.no_impact,
                entry.counts.unknown
            )?;
        }

        let Some(command) = self.read_command()? else {
            return Ok(Flow::Quit);
        };
        let outcome = match command {
            Command::Edit(number) => self.session.edit_domain(number - 1).map(|_| ()),
            Command::Complete => self.session.complete().map(|_| ()),
            Command::Back => self.session.back().map(|_| ()),
            Command::Export => return self.export_summary(),
            Command::Quit => return Ok(Flow::Quit),
            _ => return self.message(RESULTS_HELP),
        };
        self.finish(outcome)
    }

    fn mitigation_screen(&mut self) -> io::Result<Flow> {
        let plan = self.session.mitigation_plan();
        writeln!(self.output, "\nMitigation Plan")?;
        for paragraph in &plan.guidance {
            writeln!(self.output, "{paragraph}")?;
        }

        let mut numbered = Vec::new();
        if plan.sections.is_empty() {
            writeln!(self.output, "\nNo questions need mitigation actions.")?;
        }
        for section in &plan.sections {
            writeln!(
                self.output,
                "\n{} ({} negative)",
                section.domain_title, section.negative_count
            )?;
            for question in &section.questions {
                numbered.push(question.question_id);
                let badge = question
                    .badge
                    .map(|badge| format!(" [{badge}]"))
                    .unwrap_or_default();
                let due = question
                    .draft
                    .due_date
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    self.output,
                    "{}. {}{badge}\n   action: {} | lead: {} | due: {due}",
                    numbered.len(),
                    question.question_text,
                    display_or_dash(&question.draft.action),
                    display_or_dash(&question.draft.lead),
                )?;
            }
        }
        writeln!(self.output, "\nScheduled actions: {}", plan.scheduled.len())?;

        let Some(command) = self.read_command()? else {
            return Ok(Flow::Quit);
        };
        let question_id = |number: usize| {
            numbered
                .get(number - 1)
                .copied()
                .ok_or_else(|| format!("item {number} is not in the plan"))
        };

        let (number, field) = match command {
            Command::Action { number, text } => (number, MitigationField::Action(text)),
            Command::Lead { number, text } => (number, MitigationField::Lead(text)),
            Command::Due { number, date } => (number, MitigationField::DueDate(date)),
            Command::Remove(number) => {
                let outcome = match question_id(number) {
                    Ok(id) => self.session.exclude_question(id).map(|_| ()),
                    Err(message) => return self.message(&message),
                };
                return self.finish(outcome);
            }
            Command::Back => {
                let outcome = self.session.back().map(|_| ());
                return self.finish(outcome);
            }
            Command::Export => return self.export_plan(),
            Command::Quit => return Ok(Flow::Quit),
            _ => return self.message(MITIGATION_HELP),
        };
        let outcome = match question_id(number) {
            Ok(id) => self.session.update_mitigation(id, field).map(|_| ()),
            Err(message) => return self.message(&message),
        };
        self.finish(outcome)
    }

    fn read_command(&mut self) -> io::Result<Option<Command>> {
        loop {
            let Some(line) = self.read_line("> ")? else {
                return Ok(None);
            };
            if line.is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(command) => return Ok(Some(command)),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }

    fn go_back(&mut self) -> io::Result<Flow> {
        let outcome = self.session.back().map(|_| ());
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: Result<(), SessionError>) -> io::Result<Flow> {
        match outcome {
            Ok(()) => Ok(Flow::Continue),
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: SessionError) -> io::Result<Flow> {
        writeln!(self.output, "{err}")?;
        if err == SessionError::EmptyCatalog {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    fn message(&mut self, message: &str) -> io::Result<Flow> {
        writeln!(self.output, "{message}")?;
        Ok(Flow::Continue)
    }

    fn export_summary(&mut self) -> io::Result<Flow> {
        let summary = self.session.summary();
        match self.exporter.export_summary(&summary) {
            Ok(path) => writeln!(self.output, "Summary written to {}", path.display())?,
            Err(err) => {
                warn!(error = %err, "summary export failed");
                writeln!(self.output, "Export failed: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn export_plan(&mut self) -> io::Result<Flow> {
        let plan = self.session.mitigation_plan();
        match self.exporter.export_mitigation_plan(&plan) {
            Ok(paths) => {
                for path in paths {
                    writeln!(self.output, "Mitigation plan written to {}", path.display())?;
                }
            }
            Err(err) => {
                warn!(error = %err, "mitigation plan export failed");
                writeln!(self.output, "Export failed: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }
}

enum CarbonInput {
    Answer(CarbonAnswer),
    Back,
    Quit,
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
