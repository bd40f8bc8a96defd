use super::views::{AssessmentSummary, MitigationPlanView, OrganisationView, ScheduledActionView};
use serde::Serialize;
use std::fmt;
use std::io;

/// Plain-text rendering of the assessment summary.
pub struct SummaryDocument<'a>(pub &'a AssessmentSummary);

/// Plain-text rendering of the mitigation plan.
pub struct MitigationDocument<'a>(pub &'a MitigationPlanView);

pub fn render_summary_document(summary: &AssessmentSummary) -> String {
    SummaryDocument(summary).to_string()
}

pub fn render_mitigation_document(plan: &MitigationPlanView) -> String {
    MitigationDocument(plan).to_string()
}

impl fmt::Display for SummaryDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(f, "Environmental Impact Assessment Summary")?;
        write_organisation(f, &summary.organisation)?;

        writeln!(f, "\nOverall Assessment")?;
        writeln!(
            f,
            "Category: {} {}",
            summary.overall_category.marker(),
            summary.overall_category_label
        )?;
        writeln!(f, "Impact Counts:")?;
        writeln!(f, "- Positive: {}", summary.totals.positive)?;
        writeln!(f, "- Negative: {}", summary.totals.negative)?;
        writeln!(f, "- No Impact: {}", summary.totals.no_impact)?;
        writeln!(f, "- Unknown: {}", summary.totals.unknown)?;

        if let Some(carbon) = &summary.carbon {
            writeln!(f, "\nCarbon Assessment")?;
            writeln!(f, "Standard: {} {}", carbon.standard.marker(), carbon.standard_label)?;
            writeln!(f, "- Carbon reduction plan: {}", carbon.carbon_plan_label)?;
            writeln!(f, "- Lifecycle analysis: {}", carbon.lifecycle_analysis_label)?;
            writeln!(f, "- Carbon impact quantified: {}", carbon.carbon_impact_label)?;
            if let (Some(level), Some(label)) = (carbon.evergreen_level, carbon.evergreen_label) {
                writeln!(f, "- Evergreen level: {level} ({label})")?;
            }
        }

        writeln!(f, "\nDomain Results")?;
        for entry in &summary.domains {
            writeln!(f, "{} {}", entry.category.marker(), entry.title)?;
            writeln!(
                f,
                "  Positive: {}, Negative: {}, No Impact: {}, Unknown: {}",
                entry.counts.positive,
                entry.counts.negative,
                entry.counts.no_impact,
                entry.counts.unknown
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for MitigationDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        writeln!(f, "Environmental Impact Mitigation Plan")?;
        write_organisation(f, &plan.organisation)?;

        writeln!(f)?;
        for paragraph in &plan.guidance {
            writeln!(f, "{paragraph}")?;
        }

        if plan.scheduled.is_empty() {
            writeln!(f, "\nNo mitigation actions have been scheduled.")?;
            return Ok(());
        }

        writeln!(f, "\nActions by Due Date")?;
        for row in &plan.scheduled {
            writeln!(f)?;
            writeln!(f, "Due Date: {}", row.due_date_label)?;
            writeln!(f, "Domain: {}", row.domain_title)?;
            writeln!(f, "Question: {}", row.question_text)?;
            writeln!(f, "Action: {}", row.action)?;
            writeln!(f, "Lead: {}", row.lead)?;
        }
        Ok(())
    }
}

fn write_organisation(f: &mut fmt::Formatter<'_>, organisation: &OrganisationView) -> fmt::Result {
    writeln!(f, "\nOrganisation Details:")?;
    writeln!(f, "Organisation: {}", organisation.organisation_name)?;
    writeln!(f, "Completed By: {}", organisation.completed_by)?;
    writeln!(f, "Job Role: {}", organisation.job_role)?;
    writeln!(f, "Date: {}", organisation.completion_date_label)
}

#[derive(Serialize)]
struct ScheduledRow<'a> {
    #[serde(rename = "Due Date")]
    due_date: &'a str,
    #[serde(rename = "Domain")]
    domain: &'a str,
    #[serde(rename = "Question")]
    question: &'a str,
    #[serde(rename = "Action")]
    action: &'a str,
    #[serde(rename = "Lead")]
    lead: &'a str,
}

/// Writes the dated action table with a `Due Date,Domain,Question,Action,Lead` header.
pub fn write_scheduled_csv<W: io::Write>(
    rows: &[ScheduledActionView],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(["Due Date", "Domain", "Question", "Action", "Lead"])?;
    for row in rows {
        csv_writer.serialize(ScheduledRow {
            due_date: &row.due_date_label,
            domain: row.domain_title,
            question: row.question_text,
            action: &row.action,
            lead: &row.lead,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::domain::{CarbonStandard, ImpactCategory, ImpactCounts};
    use crate::workflows::assessment::report::views::{CarbonSummaryView, MITIGATION_GUIDANCE};
    use chrono::NaiveDate;

    fn organisation() -> OrganisationView {
        OrganisationView {
            organisation_name: "Riverside Surgery".to_string(),
            completion_date: NaiveDate::from_ymd_opt(2024, 4, 9),
            completion_date_label: "09/04/2024".to_string(),
            completed_by: "Sam Patel".to_string(),
            job_role: "Estates Lead".to_string(),
        }
    }

    fn scheduled_row() -> ScheduledActionView {
        ScheduledActionView {
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
            due_date_label: "15/01/2024".to_string(),
            domain_title: "Travel",
            question_id: "travel-1",
            question_text: "Will it reduce patient travel?",
            action: "Offer video consultations, where clinically safe".to_string(),
            lead: "Digital team".to_string(),
        }
    }

    #[test]
    fn summary_document_lists_carbon_standard_and_domains() {
        let summary = AssessmentSummary {
            organisation: organisation(),
            overall_category: ImpactCategory::NegativeImpact,
            overall_category_label: ImpactCategory::NegativeImpact.label(),
            totals: ImpactCounts {
                positive: 1,
                negative: 3,
                no_impact: 0,
                unknown: 2,
            },
            carbon: Some(CarbonSummaryView {
                standard: CarbonStandard::Silver,
                standard_label: CarbonStandard::Silver.label(),
                carbon_plan_label: "Yes",
                lifecycle_analysis_label: "Yes",
                carbon_impact_label: "No",
                evergreen_level: Some(2),
                evergreen_label: Some("Intermediate"),
            }),
            domains: Vec::new(),
        };

        let text = render_summary_document(&summary);
        assert!(text.starts_with("Environmental Impact Assessment Summary"));
        assert!(text.contains("Date: 09/04/2024"));
        assert!(text.contains("Category: [!] Negative Impact - Proceed with Care"));
        assert!(text.contains("- Unknown: 2"));
        assert!(text.contains("Standard: [S] Silver"));
        assert!(text.contains("- Evergreen level: 2 (Intermediate)"));
    }

    #[test]
    fn mitigation_document_reports_when_nothing_is_scheduled() {
        let plan = MitigationPlanView {
            organisation: organisation(),
            guidance: MITIGATION_GUIDANCE.to_vec(),
            sections: Vec::new(),
            scheduled: Vec::new(),
        };

        let text = render_mitigation_document(&plan);
        assert!(text.contains("No mitigation actions have been scheduled."));
        assert!(!text.contains("Actions by Due Date"));
    }

    #[test]
    fn mitigation_document_lists_scheduled_rows() {
        let plan = MitigationPlanView {
            organisation: organisation(),
            guidance: Vec::new(),
            sections: Vec::new(),
            scheduled: vec![scheduled_row()],
        };

        let text = MitigationDocument(&plan).to_string();
        assert!(text.contains("Actions by Due Date"));
        assert!(text.contains("Due Date: 15/01/2024"));
        assert!(text.contains("Lead: Digital team"));
    }

    #[test]
    fn csv_export_quotes_fields_with_commas() {
        let mut buffer = Vec::new();
        write_scheduled_csv(&[scheduled_row()], &mut buffer).expect("csv written");
        let output = String::from_utf8(buffer).expect("utf8");
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("Due Date,Domain,Question,Action,Lead"));
        assert_eq!(
            lines.next(),
            Some("15/01/2024,Travel,Will it reduce patient travel?,\"Offer video consultations, where clinically safe\",Digital team")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_export_writes_header_for_empty_plan() {
        let mut buffer = Vec::new();
        write_scheduled_csv(&[], &mut buffer).expect("csv written");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "Due Date,Domain,Question,Action,Lead\n"
        );
    }
}
