mod cli;
mod demo;
mod infra;
mod render;

use exit_window::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
