//! waypost-core - Core library for Waypost
//!
//! This crate contains the shared models, the local-first sync store, and the
//! remote client used by all Waypost interfaces (CLI, API, future viewers).

pub mod error;
pub mod models;
pub mod remote;
pub mod storage;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{CollectionKind, Drawing, DrawingKind, Marker, RecordId, SyncRecord};
pub use store::{ChangeNotice, PushOutcome, ReconcileOutcome, StoreEvent, SyncStore};
