use std::path::Path;

use serde::Serialize;
use waypost_core::{Drawing, Marker};

use crate::commands::common::open_stores;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ExportDocument {
    markers: Vec<Marker>,
    drawings: Vec<Drawing>,
}

/// Export both collections as one JSON document.
pub fn run_export(output_path: Option<&Path>, data_dir: &Path) -> Result<(), CliError> {
    let stores = open_stores(data_dir, None)?;
    let document = ExportDocument {
        markers: stores.markers.list(),
        drawings: stores.drawings.list(),
    };
    let rendered = serde_json::to_string_pretty(&document)?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
