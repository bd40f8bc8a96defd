use crate::infra::{bootstrap, parse_carbon_answer, parse_date, parse_evergreen_level, ExportArgs};
use chrono::{Local, NaiveDate};
use clap::Args;
use impact_assessment::error::AppError;
use impact_assessment::workflows::answer_sheet::AnswerSheetImporter;
use impact_assessment::workflows::assessment::domain::{
    Answer, AssessmentData, CarbonAnswer, CarbonAssessment, EvergreenLevel, OrganisationDetails,
};
use impact_assessment::workflows::assessment::report::{
    build_mitigation_plan, build_summary, views::AssessmentSummary, views::MitigationPlanView,
    MitigationDocument, SummaryDocument,
};
use impact_assessment::workflows::assessment::{
    AssessmentSession, DocumentExporter, DomainCatalog, MitigationField, SessionError,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Completion date recorded for the demo organisation (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) completion_date: Option<NaiveDate>,
    /// Write the summary and mitigation plan to the export directory.
    #[arg(long)]
    pub(crate) export: bool,
    #[command(flatten)]
    pub(crate) export_args: ExportArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Answer sheet CSV (Question ID, Answer, optional Action, Lead, Due Date)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Organisation being assessed
    #[arg(long)]
    pub(crate) organisation: String,
    /// Person who completed the assessment
    #[arg(long)]
    pub(crate) completed_by: String,
    /// Job role of the person who completed the assessment
    #[arg(long)]
    pub(crate) job_role: String,
    /// Completion date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) completion_date: Option<NaiveDate>,
    /// Carbon reduction plan status (yes, no, in-progress)
    #[arg(long, value_parser = parse_carbon_answer)]
    pub(crate) carbon_plan: Option<CarbonAnswer>,
    /// Lifecycle analysis status (yes, no, in-progress)
    #[arg(long, value_parser = parse_carbon_answer)]
    pub(crate) lifecycle_analysis: Option<CarbonAnswer>,
    /// Carbon impact quantified status (yes, no, in-progress)
    #[arg(long, value_parser = parse_carbon_answer)]
    pub(crate) carbon_impact: Option<CarbonAnswer>,
    /// Evergreen assessment level (1-4) when that assessment was completed
    #[arg(long, value_parser = parse_evergreen_level)]
    pub(crate) evergreen_level: Option<EvergreenLevel>,
    /// Write the documents to the export directory instead of only printing them.
    #[arg(long)]
    pub(crate) export: bool,
    #[command(flatten)]
    pub(crate) export_args: ExportArgs,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        completion_date,
        export,
        export_args,
    } = args;
    let (_, exporter) = bootstrap(export_args)?;
    let completion_date = completion_date.unwrap_or_else(|| Local::now().date_naive());

    let session = demo_session(completion_date)?;
    let summary = session.summary();
    let plan = session.mitigation_plan();

    println!("Environmental impact assessment demo");
    println!("Data source: scripted session ({} answers)", session.answers().len());
    render_documents(&summary, &plan);

    if export {
        export_documents(&exporter, &summary, &plan)?;
    }
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        answers,
        organisation,
        completed_by,
        job_role,
        completion_date,
        carbon_plan,
        lifecycle_analysis,
        carbon_impact,
        evergreen_level,
        export,
        export_args,
    } = args;
    let (_, exporter) = bootstrap(export_args)?;

    let organisation = OrganisationDetails {
        organisation_name: organisation,
        completion_date: Some(completion_date.unwrap_or_else(|| Local::now().date_naive())),
        completed_by,
        job_role,
    };
    organisation.validate().map_err(SessionError::from)?;

    let any_carbon_flag = carbon_plan.is_some()
        || lifecycle_analysis.is_some()
        || carbon_impact.is_some()
        || evergreen_level.is_some();
    let carbon_assessment = any_carbon_flag.then(|| CarbonAssessment {
        has_carbon_plan: carbon_plan.unwrap_or_default(),
        has_lifecycle_analysis: lifecycle_analysis.unwrap_or_default(),
        has_carbon_impact: carbon_impact.unwrap_or_default(),
        evergreen_level,
    });

    let catalog = DomainCatalog::standard();
    let sheet = AnswerSheetImporter::from_path(&answers, &catalog)?;
    info!(
        path = %answers.display(),
        answered = sheet.answers.len(),
        "answer sheet loaded"
    );

    let data = AssessmentData {
        organisation,
        carbon_assessment,
    };
    let summary = build_summary(&catalog, &data, &sheet.answers);
    let plan = build_mitigation_plan(&catalog, &data, &sheet.answers, &sheet.mitigation);

    println!("Data source: answer sheet {}", answers.display());
    render_documents(&summary, &plan);

    if export {
        export_documents(&exporter, &summary, &plan)?;
    }
    Ok(())
}

pub(crate) fn run_catalog() -> Result<(), AppError> {
    let catalog = DomainCatalog::standard();
    println!(
        "Assessment catalog: {} domains, {} questions",
        catalog.len(),
        catalog.questions().count()
    );
    for (index, domain) in catalog.domains().iter().enumerate() {
        println!("\n{}. {} ({})", index + 1, domain.title, domain.id);
        if let Some(description) = domain.description {
            println!("   {description}");
        }
        for question in &domain.questions {
            let badge = question
                .category
                .badge()
                .map(|badge| format!(" [{badge}]"))
                .unwrap_or_default();
            println!("- {}{badge}: {}", question.id, question.text);
        }
    }
    Ok(())
}

/// Drives a session through every screen with a fixed set of answers.
pub(crate) fn demo_session(completion_date: NaiveDate) -> Result<AssessmentSession, SessionError> {
    let mut session = AssessmentSession::default();
    session.submit_organisation(OrganisationDetails {
        organisation_name: "Greenfield Community Health".to_string(),
        completion_date: Some(completion_date),
        completed_by: "Demo User".to_string(),
        job_role: "Sustainability Lead".to_string(),
    })?;
    session.submit_carbon(
        CarbonAssessment {
            has_carbon_plan: CarbonAnswer::Yes,
            has_lifecycle_analysis: CarbonAnswer::InProgress,
            has_carbon_impact: CarbonAnswer::Yes,
            evergreen_level: None,
        }
        .with_evergreen_status(CarbonAnswer::Yes),
    )?;

    let answers = [
        ("moc-1", Answer::Positive),
        ("moc-2", Answer::Positive),
        ("travel-1", Answer::Negative),
        ("travel-2", Answer::Positive),
        ("cons-1", Answer::Negative),
        ("cons-2", Answer::NoImpact),
        ("it-1", Answer::Positive),
        ("res-1", Answer::Unknown),
        ("res-2", Answer::Negative),
        ("work-1", Answer::Positive),
        ("adapt-1", Answer::Negative),
        ("soc-1", Answer::Positive),
    ];
    while let Some(domain) = session.current_domain().cloned() {
        for (question_id, answer) in answers {
            if domain.question(question_id).is_some() {
                session.answer_changed(question_id, answer)?;
            }
        }
        session.next()?;
    }
    session.complete()?;

    let drafts = [
        ("travel-1", "Introduce a staff car-share scheme", "Travel Planner", 90),
        ("cons-1", "Move to reusable sharps containers", "Procurement", 30),
        ("res-2", "Install water-saving taps", "Estates", 180),
    ];
    for (question_id, action, lead, days) in drafts {
        session.update_mitigation(question_id, MitigationField::Action(action.to_string()))?;
        session.update_mitigation(question_id, MitigationField::Lead(lead.to_string()))?;
        session.update_mitigation(
            question_id,
            MitigationField::DueDate(Some(completion_date + chrono::Duration::days(days))),
        )?;
    }
    session.exclude_question("adapt-1")?;

    Ok(session)
}

fn render_documents(summary: &AssessmentSummary, plan: &MitigationPlanView) {
    println!("\n{}", SummaryDocument(summary));
    println!("{}", MitigationDocument(plan));
}

fn export_documents(
    exporter: &DocumentExporter,
    summary: &AssessmentSummary,
    plan: &MitigationPlanView,
) -> Result<(), AppError> {
    let summary_path = exporter.export_summary(summary)?;
    println!("Summary written to {}", summary_path.display());
    for path in exporter.export_mitigation_plan(plan)? {
        println!("Mitigation plan written to {}", path.display());
    }
    Ok(())
}
