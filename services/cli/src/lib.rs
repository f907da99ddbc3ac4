mod cli;
mod commands;
mod report;
mod workspace;

use bidprep::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
