mod cli;
mod demo;
mod infra;

use storefront::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
