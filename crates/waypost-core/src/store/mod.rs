//! Local-first record store with best-effort remote sync.
//!
//! The store commits every mutation to local durable storage synchronously
//! (the local write is the commit point) and pushes to the remote service as
//! fire-and-forget background work. The remote only becomes authoritative on
//! an explicit [`SyncStore::fetch_and_reconcile`]; everything else is
//! "client wins".

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::models::{RecordId, SyncRecord};
use crate::remote::RemoteCollection;
use crate::storage::KeyValueStorage;
use crate::util::unix_timestamp_ms;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Snapshot event emitted after every successful local mutation or reconcile.
#[derive(Debug, Clone)]
pub struct StoreEvent<R> {
    /// Milliseconds since the Unix epoch at emission time
    pub timestamp_ms: i64,
    /// Post-mutation deduplicated collection
    pub records: Vec<R>,
}

/// Cross-writer change signal (another process or window touched storage).
///
/// Timestamps are expected to increase monotonically; a notice that does not
/// advance past the last processed one is discarded as a duplicate or
/// out-of-order signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotice {
    pub timestamp_ms: i64,
}

/// Result of an explicit [`SyncStore::fetch_and_reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Remote snapshot now holds locally; carries the record count.
    Reconciled(usize),
    /// Remote was unreachable; local collection left untouched.
    RemoteUnavailable,
    /// Store was constructed without a remote.
    NoRemote,
}

/// Result of an explicit [`SyncStore::push_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Remote collection replaced with the local one; carries the count.
    Pushed(usize),
    /// Remote was unreachable; nothing changed anywhere.
    RemoteUnavailable,
    /// Store was constructed without a remote.
    NoRemote,
}

struct Inner<R> {
    records: Vec<R>,
    last_notice_ms: i64,
}

/// A local-first store for one collection of [`SyncRecord`]s.
///
/// Constructed once per session and shared by reference; consumers observe
/// mutations through [`SyncStore::subscribe`] instead of re-reading storage.
/// Background pushes need an ambient tokio runtime; without one the local
/// mutation still commits and the push is skipped with a log line.
pub struct SyncStore<R: SyncRecord> {
    storage: Arc<dyn KeyValueStorage>,
    remote: Option<Arc<dyn RemoteCollection<R>>>,
    inner: Mutex<Inner<R>>,
    events: broadcast::Sender<StoreEvent<R>>,
}

impl<R: SyncRecord> SyncStore<R> {
    /// Open the store, loading and deduplicating whatever storage holds.
    ///
    /// Malformed persisted data is logged and treated as an empty collection.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        remote: Option<Arc<dyn RemoteCollection<R>>>,
    ) -> Self {
        let records = load_collection::<R>(storage.as_ref());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            remote,
            inner: Mutex::new(Inner {
                records,
                last_notice_ms: 0,
            }),
            events,
        }
    }

    /// Append a record. The local write is the commit point; the remote push
    /// is spawned fire-and-forget and its failure is logged and swallowed.
    ///
    /// A record carrying an id already present replaces the existing version.
    pub fn create(&self, record: R) -> Result<()> {
        record.validate()?;

        {
            let mut inner = self.lock_inner();
            let mut candidate = inner.records.clone();
            candidate.push(record.clone());
            let candidate = dedup_latest(&candidate);
            self.persist(&candidate)?;
            inner.records = candidate;
            self.emit(&inner.records);
        }

        if let Some(remote) = &self.remote {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let remote = Arc::clone(remote);
                    handle.spawn(async move {
                        if let Err(error) = remote.push(&record).await {
                            tracing::debug!(collection = %R::COLLECTION, %error, "background push failed");
                        }
                    });
                }
                Err(_) => {
                    tracing::debug!(collection = %R::COLLECTION, "no async runtime, skipping background push");
                }
            }
        }
        Ok(())
    }

    /// Remove a record by id. Deleting an absent id is a silent success that
    /// writes nothing and emits nothing.
    pub fn delete(&self, id: &RecordId) -> Result<bool> {
        {
            let mut inner = self.lock_inner();
            if !inner.records.iter().any(|record| record.id() == id) {
                return Ok(false);
            }
            let candidate: Vec<R> = inner
                .records
                .iter()
                .filter(|record| record.id() != id)
                .cloned()
                .collect();
            self.persist(&candidate)?;
            inner.records = candidate;
            self.emit(&inner.records);
        }

        if let Some(remote) = &self.remote {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let remote = Arc::clone(remote);
                    let id = *id;
                    handle.spawn(async move {
                        if let Err(error) = remote.delete(&id).await {
                            tracing::debug!(collection = %R::COLLECTION, %error, "background delete failed");
                        }
                    });
                }
                Err(_) => {
                    tracing::debug!(collection = %R::COLLECTION, "no async runtime, skipping background delete");
                }
            }
        }
        Ok(true)
    }

    /// Rename a record in place. Local-only: the remote has no partial-update
    /// endpoint, so the new name reaches it on the next `push_all`.
    ///
    /// Returns `Ok(false)` when no record carries the id.
    pub fn rename(&self, id: &RecordId, new_name: &str) -> Result<bool> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(Error::InvalidRecord("name must not be empty".into()));
        }

        let mut inner = self.lock_inner();
        let Some(position) = inner.records.iter().position(|record| record.id() == id) else {
            return Ok(false);
        };

        let mut candidate = inner.records.clone();
        candidate[position].set_name(new_name.to_string());
        self.persist(&candidate)?;
        inner.records = candidate;
        self.emit(&inner.records);
        Ok(true)
    }

    /// Current deduplicated collection, in stable insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<R> {
        self.lock_inner().records.clone()
    }

    /// Subscribe to post-mutation snapshots.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent<R>> {
        self.events.subscribe()
    }

    /// Replace local state with the remote snapshot ("remote wins").
    ///
    /// A remote failure is logged and leaves the local collection untouched;
    /// it is reported through the outcome, never as an `Err`.
    pub async fn fetch_and_reconcile(&self) -> Result<ReconcileOutcome> {
        let Some(remote) = &self.remote else {
            return Ok(ReconcileOutcome::NoRemote);
        };

        let fetched = match remote.fetch_all().await {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(collection = %R::COLLECTION, %error, "reconcile fetch failed, keeping local state");
                return Ok(ReconcileOutcome::RemoteUnavailable);
            }
        };

        let snapshot = dedup_latest(&fetched);
        let mut inner = self.lock_inner();
        self.persist(&snapshot)?;
        inner.records = snapshot;
        self.emit(&inner.records);
        Ok(ReconcileOutcome::Reconciled(inner.records.len()))
    }

    /// Replace the remote collection with the local one ("client wins").
    pub async fn push_all(&self) -> PushOutcome {
        let Some(remote) = &self.remote else {
            return PushOutcome::NoRemote;
        };

        let records = self.list();
        match remote.sync_all(&records).await {
            Ok(()) => PushOutcome::Pushed(records.len()),
            Err(error) => {
                tracing::warn!(collection = %R::COLLECTION, %error, "bulk push failed");
                PushOutcome::RemoteUnavailable
            }
        }
    }

    /// Handle a cross-writer change notice.
    ///
    /// Notices are debounced by timestamp: one that does not advance past the
    /// last processed notice is discarded. Otherwise storage is re-read and
    /// deduplicated, then swapped in and announced only when change detection
    /// finds a real difference. Returns whether the collection changed.
    pub fn apply_change_notice(&self, notice: ChangeNotice) -> bool {
        let mut inner = self.lock_inner();
        if notice.timestamp_ms <= inner.last_notice_ms {
            tracing::debug!(
                collection = %R::COLLECTION,
                notice_ms = notice.timestamp_ms,
                last_ms = inner.last_notice_ms,
                "discarding stale change notice"
            );
            return false;
        }
        inner.last_notice_ms = notice.timestamp_ms;

        let reloaded = dedup_latest(&load_collection::<R>(self.storage.as_ref()));
        if !collections_differ(&inner.records, &reloaded) {
            return false;
        }

        inner.records = reloaded;
        self.emit(&inner.records);
        true
    }

    fn persist(&self, records: &[R]) -> Result<()> {
        let serialized = serde_json::to_string(records)?;
        self.storage.set(R::COLLECTION.storage_key(), &serialized)
    }

    fn emit(&self, records: &[R]) {
        // Nobody listening is fine; the send error is expected then.
        let _ = self.events.send(StoreEvent {
            timestamp_ms: unix_timestamp_ms(),
            records: records.to_vec(),
        });
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Inner<R>> {
        self.inner.lock().expect("store lock poisoned")
    }
}

/// Read and deserialize a collection, recovering from bad data as empty.
fn load_collection<R: SyncRecord>(storage: &dyn KeyValueStorage) -> Vec<R> {
    let raw = match storage.get(R::COLLECTION.storage_key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!(collection = %R::COLLECTION, %error, "storage read failed, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<R>>(&raw) {
        Ok(records) => dedup_latest(&records),
        Err(error) => {
            tracing::warn!(collection = %R::COLLECTION, %error, "persisted collection was malformed, starting empty");
            Vec::new()
        }
    }
}

/// Drop duplicate-id entries, keeping each id's most recently appended
/// version while preserving the relative order of the survivors.
#[must_use]
pub fn dedup_latest<R: SyncRecord>(records: &[R]) -> Vec<R> {
    let mut seen: HashSet<RecordId> = HashSet::with_capacity(records.len());
    let mut deduped: Vec<R> = Vec::with_capacity(records.len());
    for record in records.iter().rev() {
        if seen.insert(*record.id()) {
            deduped.push(record.clone());
        }
    }
    deduped.reverse();
    deduped
}

/// Detect whether two collections differ in membership or significant fields.
///
/// Cheap checks first: length, then sorted id sets, then per-id comparison of
/// the record type's significant fields.
#[must_use]
pub fn collections_differ<R: SyncRecord>(old: &[R], new: &[R]) -> bool {
    if old.len() != new.len() {
        return true;
    }

    let mut old_ids: Vec<&RecordId> = old.iter().map(SyncRecord::id).collect();
    let mut new_ids: Vec<&RecordId> = new.iter().map(SyncRecord::id).collect();
    old_ids.sort_unstable();
    new_ids.sort_unstable();
    if old_ids != new_ids {
        return true;
    }

    new.iter().any(|updated| {
        old.iter()
            .find(|existing| existing.id() == updated.id())
            .is_some_and(|existing| existing.differs_from(updated))
    })
}
