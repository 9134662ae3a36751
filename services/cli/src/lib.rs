mod cli;
mod commands;
mod infra;

use khadamat::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
