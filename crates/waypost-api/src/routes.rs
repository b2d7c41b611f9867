use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use waypost_core::{Drawing, Marker, RecordId, SyncRecord};

use crate::collections::JsonCollection;
use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    markers: Arc<JsonCollection<Marker>>,
    drawings: Arc<JsonCollection<Drawing>>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, AppError> {
        Ok(Self {
            markers: Arc::new(JsonCollection::open(&config.data_dir)?),
            drawings: Arc::new(JsonCollection::open(&config.data_dir)?),
            config,
        })
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/markers", get(list_markers).post(create_marker))
        .route("/api/markers/sync", post(sync_markers))
        .route("/api/markers/{id}", delete(delete_marker))
        .route("/api/drawings", get(list_drawings).post(create_drawing))
        .route("/api/drawings/sync", post(sync_drawings))
        .route("/api/drawings/{id}", delete(delete_drawing))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
    })
}

async fn list_markers(State(state): State<AppState>) -> Result<Json<Vec<Marker>>, AppError> {
    state.markers.read_all().map(Json)
}

async fn create_marker(
    State(state): State<AppState>,
    Json(marker): Json<Marker>,
) -> Result<(StatusCode, Json<Marker>), AppError> {
    create_record(&state.markers, marker).await
}

async fn sync_markers(
    State(state): State<AppState>,
    Json(markers): Json<Vec<Marker>>,
) -> Result<Json<MessageResponse>, AppError> {
    sync_records(&state.markers, markers).await
}

async fn delete_marker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_record(&state.markers, &id).await
}

async fn list_drawings(State(state): State<AppState>) -> Result<Json<Vec<Drawing>>, AppError> {
    state.drawings.read_all().map(Json)
}

async fn create_drawing(
    State(state): State<AppState>,
    Json(drawing): Json<Drawing>,
) -> Result<(StatusCode, Json<Drawing>), AppError> {
    create_record(&state.drawings, drawing).await
}

async fn sync_drawings(
    State(state): State<AppState>,
    Json(drawings): Json<Vec<Drawing>>,
) -> Result<Json<MessageResponse>, AppError> {
    sync_records(&state.drawings, drawings).await
}

async fn delete_drawing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_record(&state.drawings, &id).await
}

async fn create_record<R: SyncRecord>(
    collection: &JsonCollection<R>,
    record: R,
) -> Result<(StatusCode, Json<R>), AppError> {
    record
        .validate()
        .map_err(|error| AppError::bad_request(error.to_string()))?;
    collection.append(record.clone()).await?;
    tracing::info!(collection = %R::COLLECTION, id = %record.id(), "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn sync_records<R: SyncRecord>(
    collection: &JsonCollection<R>,
    records: Vec<R>,
) -> Result<Json<MessageResponse>, AppError> {
    let count = collection.replace_all(records).await?;
    tracing::info!(collection = %R::COLLECTION, count, "collection replaced by client sync");
    Ok(Json(MessageResponse {
        message: format!("{} synced ({count} records)", R::COLLECTION),
    }))
}

async fn delete_record<R: SyncRecord>(
    collection: &JsonCollection<R>,
    raw_id: &str,
) -> Result<Json<MessageResponse>, AppError> {
    // Unparseable ids cannot match anything stored, so they fall into the
    // same silent no-op as an absent id.
    let removed = match raw_id.parse::<RecordId>() {
        Ok(id) => collection.remove(&id).await?,
        Err(_) => false,
    };

    let message = if removed {
        tracing::info!(collection = %R::COLLECTION, id = raw_id, "record deleted");
        format!("{} record deleted", R::COLLECTION)
    } else {
        format!("{} record not found, nothing deleted", R::COLLECTION)
    };
    Ok(Json(MessageResponse { message }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_state(dir: &std::path::Path) -> AppState {
        let config = Arc::new(AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            data_dir: dir.to_path_buf(),
        });
        AppState::from_config(config).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn health_reports_ok() {
        let response = health().await;
        assert_eq!(response.0.status, "ok");
        assert!(response.0.timestamp > 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_then_list_markers() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let marker = Marker::new("Harbor", [59.9, 10.7]);
        let (status, Json(created)) =
            create_marker(State(state.clone()), Json(marker.clone())).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.id, marker.id);

        let Json(listed) = list_markers(State(state)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Harbor");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_rejects_invalid_marker() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let result = create_marker(State(state), Json(Marker::new(" ", [0.0, 0.0]))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sync_replaces_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let (status, _) = create_marker(State(state.clone()), Json(Marker::new("Old", [0.0, 0.0])))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let replacement = vec![Marker::new("Only", [5.0, 5.0])];
        let Json(response) = sync_markers(State(state.clone()), Json(replacement))
            .await
            .unwrap();
        assert!(response.message.contains("1 records"));

        let Json(listed) = list_markers(State(state)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Only");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_absent_marker_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let Json(response) =
            delete_marker(State(state.clone()), Path(RecordId::new().to_string()))
                .await
                .unwrap();
        assert!(response.message.contains("not found"));

        // Unparseable ids get the same treatment.
        let Json(response) = delete_marker(State(state), Path("not-a-uuid".to_string()))
            .await
            .unwrap();
        assert!(response.message.contains("not found"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drawings_mirror_marker_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let drawing = Drawing::new(
            "Fence",
            waypost_core::DrawingKind::Polygon,
            vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]],
        );
        let id = drawing.id;
        let (status, _) = create_drawing(State(state.clone()), Json(drawing)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(listed) = list_drawings(State(state.clone())).await.unwrap();
        assert_eq!(listed.len(), 1);

        let Json(response) = delete_drawing(State(state.clone()), Path(id.to_string()))
            .await
            .unwrap();
        assert!(response.message.contains("deleted"));
        let Json(listed) = list_drawings(State(state)).await.unwrap();
        assert!(listed.is_empty());
    }
}
