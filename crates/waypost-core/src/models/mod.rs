//! Domain models shared by every Waypost interface.

mod drawing;
mod marker;
mod record;

pub use drawing::{Drawing, DrawingKind};
pub use marker::Marker;
pub use record::{CollectionKind, RecordId, SyncRecord};
