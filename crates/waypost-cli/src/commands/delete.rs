use std::path::Path;

use crate::cli::Collection;
use crate::commands::common::{
    normalize_record_identifier, open_stores, resolve_record_id, settle_background_pushes,
};
use crate::error::CliError;

pub async fn run_delete(
    collection: Collection,
    id: &str,
    data_dir: &Path,
    api_url: Option<&str>,
) -> Result<(), CliError> {
    let query = normalize_record_identifier(id)?;
    let stores = open_stores(data_dir, api_url)?;

    let resolved = match collection {
        Collection::Markers => {
            let resolved = resolve_record_id(&stores.markers, &query)?;
            stores.markers.delete(&resolved)?;
            resolved
        }
        Collection::Drawings => {
            let resolved = resolve_record_id(&stores.drawings, &query)?;
            stores.drawings.delete(&resolved)?;
            resolved
        }
    };
    settle_background_pushes(stores.remote.is_some()).await;

    println!("{resolved}");
    Ok(())
}
