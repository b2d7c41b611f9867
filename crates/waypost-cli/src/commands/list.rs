use std::path::Path;

use crate::cli::Collection;
use crate::commands::common::{
    drawing_to_list_item, format_drawing_lines, format_marker_lines, marker_to_list_item,
    open_stores,
};
use crate::error::CliError;

pub fn run_list(
    collection: Collection,
    as_json: bool,
    data_dir: &Path,
) -> Result<(), CliError> {
    let stores = open_stores(data_dir, None)?;

    match collection {
        Collection::Markers => {
            let markers = stores.markers.list();
            if as_json {
                let items: Vec<_> = markers.iter().map(marker_to_list_item).collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for line in format_marker_lines(&markers) {
                    println!("{line}");
                }
            }
        }
        Collection::Drawings => {
            let drawings = stores.drawings.list();
            if as_json {
                let items: Vec<_> = drawings.iter().map(drawing_to_list_item).collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for line in format_drawing_lines(&drawings) {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
