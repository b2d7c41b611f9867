use std::path::Path;

use crate::cli::Collection;
use crate::commands::common::{normalize_record_identifier, open_stores, resolve_record_id};
use crate::error::CliError;

/// Rename is a local-only mutation; the new name reaches the remote on the
/// next `waypost push`.
pub fn run_rename(
    collection: Collection,
    id: &str,
    new_name: &str,
    data_dir: &Path,
) -> Result<(), CliError> {
    let query = normalize_record_identifier(id)?;
    let stores = open_stores(data_dir, None)?;

    let resolved = match collection {
        Collection::Markers => {
            let resolved = resolve_record_id(&stores.markers, &query)?;
            stores.markers.rename(&resolved, new_name)?;
            resolved
        }
        Collection::Drawings => {
            let resolved = resolve_record_id(&stores.drawings, &query)?;
            stores.drawings.rename(&resolved, new_name)?;
            resolved
        }
    };

    println!("{resolved}");
    Ok(())
}
