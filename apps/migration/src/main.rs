//! Migration CLI tool.
//!
//! `run_cli` installs its own tracing subscriber; do not install one here.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(migration::Migrator).await;
}
