mod cli;
mod demo;
mod infra;
mod wizard;

use impact_assessment::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
