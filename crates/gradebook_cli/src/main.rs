//! `gradebook` entry point.
//!
//! # Responsibility
//! - Parse configuration, start logging, then either serve the HTTP API or
//!   print one derived view as JSON.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use gradebook_core::db::open_db;
use gradebook_core::{
    default_log_level, init_logging, AssessmentService, LoggingOptions,
    SqliteAssessmentRepository,
};
use gradebook_server::ServerConfig;
use log::info;
use serde::Serialize;

use cli::{resolve_log_dir, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let mut logging = LoggingOptions::new(
        cli.log_level.as_deref().unwrap_or(default_log_level()),
        resolve_log_dir(cli.log_dir.as_deref(), &cwd),
    );
    logging.echo_stderr = matches!(cli.command, Commands::Serve { .. });
    init_logging(&logging).context("failed to initialize logging")?;

    match cli.command {
        Commands::Serve { addr } => serve(ServerConfig {
            db_path: cli.db,
            addr,
        }),
        Commands::List => with_service(&cli.db, |service| service.list_assessments()),
        Commands::Current => with_service(&cli.db, |service| service.current_stats()),
        Commands::WhatIf { target } => with_service(&cli.db, |service| service.what_if(target)),
        Commands::Validate => with_service(&cli.db, |service| service.validate_weights()),
    }
}

fn serve(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async {
        gradebook_server::serve(&config, async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("event=shutdown_signal module=cli status=ok");
            }
        })
        .await
        .context("server exited with an error")
    })
}

fn with_service<T: Serialize>(
    db_path: &std::path::Path,
    f: impl FnOnce(
        &AssessmentService<SqliteAssessmentRepository<'_>>,
    ) -> gradebook_core::RepoResult<T>,
) -> Result<()> {
    let conn = open_db(db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    let repo = SqliteAssessmentRepository::try_new(&conn)?;
    let view = f(&AssessmentService::new(repo))?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
