mod access;
mod cli;
mod infra;
mod routes;
mod server;

use hotel_catalog::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
