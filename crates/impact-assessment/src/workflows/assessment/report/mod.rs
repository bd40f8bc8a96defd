mod document;
mod summary;
pub mod views;

pub use document::{
    render_mitigation_document, render_summary_document, write_scheduled_csv, MitigationDocument,
    SummaryDocument,
};
pub use summary::{build_mitigation_plan, build_summary};

use chrono::NaiveDate;

/// Day/month/year with two-digit day and month, e.g. `09/04/2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
