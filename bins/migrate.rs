//! Apply or inspect the explore schema migrations

use anyhow::Result;
use clap::{Parser, ValueEnum};
use migration::{Migrator, MigratorTrait};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    Up,
    Down,
    Status,
    Fresh,
}

#[derive(Debug, Parser)]
#[command(name = "explore-migrate")]
#[command(about = "Run schema migrations against the configured database", long_about = None)]
struct Cli {
    #[arg(long, value_enum, default_value_t = Action::Up)]
    migrate: Action,
    /// Number of migrations to roll back with `down`
    #[arg(long)]
    steps: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_default();
    let cli = Cli::parse();

    let cfg = configs::AppConfig::load_or_env()?;
    let db = models::db::connect_with_config(&cfg.database).await?;

    match cli.migrate {
        Action::Up => Migrator::up(&db, None).await?,
        Action::Down => Migrator::down(&db, Some(cli.steps.unwrap_or(1))).await?,
        Action::Status => Migrator::status(&db).await?,
        Action::Fresh => Migrator::fresh(&db).await?,
    }
    info!(action = ?cli.migrate, "migration finished");
    Ok(())
}
