//! Schema migration command

use anyhow::Result;
use clap::Parser;

use super::{prepare_database, DbArgs};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Connect, apply migrations, and exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = prepare_database(&args.db).await?;
    pool.close().await;
    Ok(())
}
