//! Waypost CLI - manage map markers and drawings from the terminal
//!
//! Works against the same local-first store the viewer uses: every mutation
//! commits locally first, and the remote service is best-effort.

mod cli;
mod commands;
mod error;

use clap::Parser;

use cli::{Cli, Commands};
use commands::add::{run_add, AddArgs};
use commands::common::{resolve_api_url, resolve_data_dir};
use commands::completions::run_completions;
use commands::delete::run_delete;
use commands::draw::run_draw;
use commands::export::run_export;
use commands::list::run_list;
use commands::rename::run_rename;
use commands::sync::{run_pull, run_push, run_status};
use error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("waypost=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir);
    let api_url = resolve_api_url(cli.api_url);

    match cli.command {
        Commands::Add {
            name,
            lat,
            lng,
            icon,
            note,
        } => {
            run_add(
                AddArgs {
                    name: &name,
                    lat,
                    lng,
                    icon,
                    note,
                },
                &data_dir,
                api_url.as_deref(),
            )
            .await?;
        }
        Commands::Draw {
            name,
            kind,
            points,
            color,
        } => {
            run_draw(
                &name,
                kind.into(),
                &points,
                color,
                &data_dir,
                api_url.as_deref(),
            )
            .await?;
        }
        Commands::List { collection, json } => run_list(collection, json, &data_dir)?,
        Commands::Rename {
            collection,
            id,
            name,
        } => run_rename(collection, &id, &name, &data_dir)?,
        Commands::Delete { collection, id } => {
            run_delete(collection, &id, &data_dir, api_url.as_deref()).await?;
        }
        Commands::Pull => run_pull(&data_dir, api_url.as_deref()).await?,
        Commands::Push => run_push(&data_dir, api_url.as_deref()).await?,
        Commands::Status => run_status(&data_dir, api_url.as_deref()).await?,
        Commands::Export { output } => run_export(output.as_deref(), &data_dir)?,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
