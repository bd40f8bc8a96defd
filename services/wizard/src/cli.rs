use crate::demo::{run_catalog, run_demo, run_report, DemoArgs, ReportArgs};
use crate::infra::{bootstrap, ExportArgs};
use crate::wizard::Wizard;
use clap::{Args, Parser, Subcommand};
use impact_assessment::error::AppError;
use std::io;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Environmental Impact Assessment",
    about = "Complete an environmental impact assessment and build its mitigation plan",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through the assessment interactively (default command)
    Run(RunArgs),
    /// Run a scripted assessment and print its summary and mitigation plan
    Demo(DemoArgs),
    /// Build the summary and mitigation plan from an answer-sheet CSV
    Report(ReportArgs),
    /// List the assessment domains and questions
    Catalog,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) export_args: ExportArgs,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    match command {
        Command::Run(args) => run_wizard(args),
        Command::Demo(args) => run_demo(args),
        Command::Report(args) => run_report(args),
        Command::Catalog => run_catalog(),
    }
}

fn run_wizard(args: RunArgs) -> Result<(), AppError> {
    let (_, exporter) = bootstrap(args.export_args)?;
    let stdin = io::stdin();
    let stdout = io::stdout();

    let session = Wizard::new(stdin.lock(), stdout.lock(), exporter).run()?;
    info!(step = %session.step(), answered = session.answers().len(), "wizard closed");
    Ok(())
}
