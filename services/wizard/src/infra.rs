use chrono::NaiveDate;
use clap::Args;
use impact_assessment::config::{AppConfig, ExportFormat};
use impact_assessment::error::AppError;
use impact_assessment::telemetry;
use impact_assessment::workflows::assessment::domain::{CarbonAnswer, EvergreenLevel};
use impact_assessment::workflows::assessment::DocumentExporter;
use std::path::PathBuf;
use tracing::info;

/// Flags shared by every command that can write documents.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ExportArgs {
    /// Override the configured export directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
    /// Override the configured document format (text or json)
    #[arg(long, value_parser = parse_format)]
    pub(crate) format: Option<ExportFormat>,
}

/// Loads configuration, applies command-line overrides and starts logging.
pub(crate) fn bootstrap(args: ExportArgs) -> Result<(AppConfig, DocumentExporter), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(directory) = args.export_dir {
        config.export.directory = directory;
    }
    if let Some(format) = args.format {
        config.export.format = format;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        ?config.environment,
        export_dir = %config.export.directory.display(),
        format = config.export.format.label(),
        "impact assessment tooling configured"
    );

    let exporter = DocumentExporter::from_config(&config.export);
    Ok((config, exporter))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse::<ExportFormat>().map_err(|err| err.to_string())
}

pub(crate) fn parse_carbon_answer(raw: &str) -> Result<CarbonAnswer, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(CarbonAnswer::Yes),
        "n" | "no" => Ok(CarbonAnswer::No),
        "i" | "in-progress" | "in progress" | "inprogress" => Ok(CarbonAnswer::InProgress),
        _ => Err(format!("'{raw}' must be yes, no or in-progress")),
    }
}

pub(crate) fn parse_evergreen_level(raw: &str) -> Result<EvergreenLevel, String> {
    let level = raw
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    EvergreenLevel::new(level).map_err(|err| err.to_string())
}
