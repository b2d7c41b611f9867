use std::path::Path;

use waypost_core::util::normalize_text_option;
use waypost_core::{Drawing, DrawingKind};

use crate::commands::common::{open_stores, parse_point, settle_background_pushes};
use crate::error::CliError;

pub async fn run_draw(
    name: &str,
    kind: DrawingKind,
    raw_points: &[String],
    color: Option<String>,
    data_dir: &Path,
    api_url: Option<&str>,
) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::EmptyName);
    }

    let points = raw_points
        .iter()
        .map(|raw| parse_point(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let stores = open_stores(data_dir, api_url)?;
    let mut drawing = Drawing::new(name, kind, points);
    drawing.color = normalize_text_option(color);

    let id = drawing.id;
    stores.drawings.create(drawing)?;
    settle_background_pushes(stores.remote.is_some()).await;

    println!("{id}");
    Ok(())
}
