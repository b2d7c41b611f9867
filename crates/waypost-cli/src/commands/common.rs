use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use waypost_core::remote::{HttpRemote, RemoteCollection};
use waypost_core::storage::{storage_dir, FileStorage};
use waypost_core::util::normalize_text_option;
use waypost_core::{Drawing, Marker, RecordId, SyncRecord, SyncStore};

use crate::error::CliError;

/// Both stores plus the shared remote handle, opened once per invocation.
pub struct StoreSet {
    pub markers: SyncStore<Marker>,
    pub drawings: SyncStore<Drawing>,
    pub remote: Option<HttpRemote>,
}

pub fn open_stores(data_dir: &Path, api_url: Option<&str>) -> Result<StoreSet, CliError> {
    let storage = Arc::new(FileStorage::new(storage_dir(data_dir))?);

    let remote = match api_url {
        Some(url) => Some(HttpRemote::new(url)?),
        None => None,
    };

    let marker_remote = remote
        .clone()
        .map(|client| Arc::new(client) as Arc<dyn RemoteCollection<Marker>>);
    let drawing_remote = remote
        .clone()
        .map(|client| Arc::new(client) as Arc<dyn RemoteCollection<Drawing>>);

    Ok(StoreSet {
        markers: SyncStore::new(storage.clone(), marker_remote),
        drawings: SyncStore::new(storage, drawing_remote),
        remote,
    })
}

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>) -> PathBuf {
    cli_data_dir
        .or_else(|| env::var_os("WAYPOST_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(default_data_dir)
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("waypost")
}

pub fn resolve_api_url(cli_api_url: Option<String>) -> Option<String> {
    normalize_text_option(cli_api_url).or_else(|| normalize_text_option(env::var("WAYPOST_API_URL").ok()))
}

/// Parse a "LAT,LNG" vertex argument.
pub fn parse_point(raw: &str) -> Result<[f64; 2], CliError> {
    let mut parts = raw.splitn(2, ',');
    let lat = parts
        .next()
        .and_then(|part| part.trim().parse::<f64>().ok());
    let lng = parts
        .next()
        .and_then(|part| part.trim().parse::<f64>().ok());
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok([lat, lng]),
        _ => Err(CliError::InvalidPoint(raw.to_string())),
    }
}

pub fn normalize_record_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyRecordId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Resolve a full id or a unique id prefix against the store's collection.
pub fn resolve_record_id<R: SyncRecord>(
    store: &SyncStore<R>,
    query: &str,
) -> Result<RecordId, CliError> {
    let records = store.list();

    if let Ok(id) = query.parse::<RecordId>() {
        if records.iter().any(|record| record.id() == &id) {
            return Ok(id);
        }
    }

    let matching: Vec<&RecordId> = records
        .iter()
        .map(SyncRecord::id)
        .filter(|id| id.to_string().starts_with(query))
        .collect();

    match matching.len() {
        0 => Err(CliError::RecordNotFound(query.to_string())),
        1 => Ok(*matching[0]),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|id| id.to_string().chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousRecordId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Mutation pushes are fire-and-forget tasks; a short-lived CLI process has
/// to stay alive long enough for them to reach the wire.
pub async fn settle_background_pushes(remote_configured: bool) {
    if remote_configured {
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    }
}

#[derive(Debug, Serialize)]
pub struct MarkerListItem {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub relative_time: String,
}

#[derive(Debug, Serialize)]
pub struct DrawingListItem {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub point_count: usize,
    pub color: Option<String>,
    pub created_at: String,
    pub relative_time: String,
}

pub fn marker_to_list_item(marker: &Marker) -> MarkerListItem {
    let now_ms = Utc::now().timestamp_millis();
    MarkerListItem {
        id: marker.id.to_string(),
        name: marker.name.clone(),
        lat: marker.lat(),
        lng: marker.lng(),
        icon: marker.icon.clone(),
        description: marker.description.clone(),
        created_at: marker.created_at.to_rfc3339(),
        relative_time: format_relative_time(marker.created_at.timestamp_millis(), now_ms),
    }
}

pub fn drawing_to_list_item(drawing: &Drawing) -> DrawingListItem {
    let now_ms = Utc::now().timestamp_millis();
    DrawingListItem {
        id: drawing.id.to_string(),
        name: drawing.name.clone(),
        kind: format!("{:?}", drawing.kind).to_lowercase(),
        point_count: drawing.points.len(),
        color: drawing.color.clone(),
        created_at: drawing.created_at.to_rfc3339(),
        relative_time: format_relative_time(drawing.created_at.timestamp_millis(), now_ms),
    }
}

pub fn format_marker_lines(markers: &[Marker]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    markers
        .iter()
        .map(|marker| {
            let id = marker.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let coords = format!("{:.5},{:.5}", marker.lat(), marker.lng());
            let relative_time = format_relative_time(marker.created_at.timestamp_millis(), now_ms);
            format!("{short_id:<13}  {:<24}  {coords:<22}  {relative_time}", truncate(&marker.name, 24))
        })
        .collect()
}

pub fn format_drawing_lines(drawings: &[Drawing]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    drawings
        .iter()
        .map(|drawing| {
            let id = drawing.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let kind = format!("{:?}", drawing.kind).to_lowercase();
            let relative_time = format_relative_time(drawing.created_at.timestamp_millis(), now_ms);
            format!(
                "{short_id:<13}  {:<24}  {kind:<9}  {:>3} pts  {relative_time}",
                truncate(&drawing.name, 24),
                drawing.points.len()
            )
        })
        .collect()
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = text.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Render an age like "4h ago" for list output.
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms.saturating_sub(timestamp_ms);
    if elapsed < MINUTE_MS {
        return "just now".to_string();
    }

    let (amount, unit) = if elapsed < HOUR_MS {
        (elapsed / MINUTE_MS, "m")
    } else if elapsed < DAY_MS {
        (elapsed / HOUR_MS, "h")
    } else if elapsed < 7 * DAY_MS {
        (elapsed / DAY_MS, "d")
    } else if elapsed < 30 * DAY_MS {
        (elapsed / (7 * DAY_MS), "w")
    } else if elapsed < 365 * DAY_MS {
        (elapsed / (30 * DAY_MS), "mo")
    } else {
        (elapsed / (365 * DAY_MS), "y")
    };
    format!("{amount}{unit} ago")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn open_local_stores(dir: &Path) -> StoreSet {
        open_stores(dir, None).unwrap()
    }

    #[test]
    fn parse_point_accepts_signed_decimals() {
        assert_eq!(parse_point("59.33,18.06").unwrap(), [59.33, 18.06]);
        assert_eq!(parse_point(" -33.9 , 151.2 ").unwrap(), [-33.9, 151.2]);
    }

    #[test]
    fn parse_point_rejects_garbage() {
        assert!(parse_point("59.33").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("").is_err());
    }

    #[test]
    fn normalize_record_identifier_rejects_empty() {
        assert!(matches!(
            normalize_record_identifier(" \n "),
            Err(CliError::EmptyRecordId)
        ));
        assert_eq!(
            normalize_record_identifier("  abc123  ").unwrap(),
            "abc123".to_string()
        );
    }

    #[test]
    fn resolve_record_id_supports_exact_and_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let stores = open_local_stores(dir.path());

        let marker = Marker::new("Pin", [1.0, 2.0]);
        let id = marker.id;
        stores.markers.create(marker).unwrap();

        assert_eq!(resolve_record_id(&stores.markers, &id.to_string()).unwrap(), id);

        let prefix: String = id.to_string().chars().take(13).collect();
        assert_eq!(resolve_record_id(&stores.markers, &prefix).unwrap(), id);
    }

    #[test]
    fn resolve_record_id_rejects_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let stores = open_local_stores(dir.path());
        assert!(matches!(
            resolve_record_id(&stores.markers, "does-not-exist"),
            Err(CliError::RecordNotFound(_))
        ));
    }

    #[test]
    fn format_relative_time_units() {
        let now = 400 * DAY_MS;
        assert_eq!(format_relative_time(now - 30_000, now), "just now");
        assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
        assert_eq!(format_relative_time(now - 2 * HOUR_MS, now), "2h ago");
        assert_eq!(format_relative_time(now - 3 * DAY_MS, now), "3d ago");
        assert_eq!(format_relative_time(now - 14 * DAY_MS, now), "2w ago");
        assert_eq!(format_relative_time(now - 90 * DAY_MS, now), "3mo ago");
        assert_eq!(format_relative_time(now - 366 * DAY_MS, now), "1y ago");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("a very long marker label here", 20), "a very long marke...");
    }

    #[test]
    fn resolve_api_url_prefers_flag_over_env() {
        assert_eq!(
            resolve_api_url(Some("http://flag:1".to_string())),
            Some("http://flag:1".to_string())
        );
        assert_eq!(resolve_api_url(Some("   ".to_string())), resolve_api_url(None));
    }
}
