mod cli;
mod demo;
mod infra;
mod quote;

use registration_fees::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
