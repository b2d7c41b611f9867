use std::path::Path;

use waypost_core::{PushOutcome, ReconcileOutcome};

use crate::commands::common::open_stores;
use crate::error::CliError;

/// Replace both local collections with the remote snapshot (remote wins).
pub async fn run_pull(data_dir: &Path, api_url: Option<&str>) -> Result<(), CliError> {
    let stores = open_stores(data_dir, api_url)?;
    if stores.remote.is_none() {
        return Err(CliError::RemoteNotConfigured);
    }

    let markers = stores.markers.fetch_and_reconcile().await?;
    let drawings = stores.drawings.fetch_and_reconcile().await?;

    report_reconcile("markers", markers);
    report_reconcile("drawings", drawings);
    Ok(())
}

/// Replace both remote collections with the local ones (client wins).
pub async fn run_push(data_dir: &Path, api_url: Option<&str>) -> Result<(), CliError> {
    let stores = open_stores(data_dir, api_url)?;
    if stores.remote.is_none() {
        return Err(CliError::RemoteNotConfigured);
    }

    let markers = stores.markers.push_all().await;
    let drawings = stores.drawings.push_all().await;

    report_push("markers", markers);
    report_push("drawings", drawings);
    Ok(())
}

/// Show local record counts and remote reachability.
pub async fn run_status(data_dir: &Path, api_url: Option<&str>) -> Result<(), CliError> {
    let stores = open_stores(data_dir, api_url)?;

    println!("markers:  {}", stores.markers.list().len());
    println!("drawings: {}", stores.drawings.list().len());

    match &stores.remote {
        None => println!("remote:   not configured"),
        Some(remote) => match remote.health().await {
            Ok(()) => println!("remote:   reachable"),
            Err(error) => {
                tracing::debug!(%error, "health probe failed");
                println!("remote:   unreachable");
            }
        },
    }
    Ok(())
}

fn report_reconcile(collection: &str, outcome: ReconcileOutcome) {
    match outcome {
        ReconcileOutcome::Reconciled(count) => {
            println!("{collection}: pulled {count} records");
        }
        ReconcileOutcome::RemoteUnavailable => {
            println!("{collection}: remote unavailable, kept local records");
        }
        ReconcileOutcome::NoRemote => {}
    }
}

fn report_push(collection: &str, outcome: PushOutcome) {
    match outcome {
        PushOutcome::Pushed(count) => println!("{collection}: pushed {count} records"),
        PushOutcome::RemoteUnavailable => println!("{collection}: remote unavailable"),
        PushOutcome::NoRemote => {}
    }
}
