use std::path::Path;

use waypost_core::util::normalize_text_option;
use waypost_core::Marker;

use crate::commands::common::{open_stores, settle_background_pushes};
use crate::error::CliError;

pub struct AddArgs<'a> {
    pub name: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub icon: Option<String>,
    pub note: Option<String>,
}

pub async fn run_add(
    args: AddArgs<'_>,
    data_dir: &Path,
    api_url: Option<&str>,
) -> Result<(), CliError> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(CliError::EmptyName);
    }

    let stores = open_stores(data_dir, api_url)?;
    let mut marker = Marker::new(name, [args.lat, args.lng]);
    marker.icon = normalize_text_option(args.icon);
    marker.description = normalize_text_option(args.note);

    let id = marker.id;
    stores.markers.create(marker)?;
    settle_background_pushes(stores.remote.is_some()).await;

    println!("{id}");
    Ok(())
}
