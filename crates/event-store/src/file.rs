use std::collections::HashMap;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use message_bus::{Event, EventBus};
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::{
    AggregateId, EventDescriptor, EventStoreError, ExpectedVersion, Result, Version,
    store::{EventStore, check_expected_version, publish_persisted, validate_events_for_append},
};

const JOURNAL_EXTENSION: &str = "json";

/// File-backed event store implementation.
///
/// Each aggregate gets one journal at `<root>/<aggregate_id>.json` holding
/// one JSON-encoded [`EventDescriptor`] per line. Journals are only ever
/// appended to.
///
/// Writers to the same aggregate are serialized inside this process. Two
/// processes sharing a root directory are not coordinated. A lock entry lives
/// only while a writer holds or awaits it.
pub struct FileEventStore<E: Event> {
    root: PathBuf,
    bus: Arc<EventBus<E>>,
    locks: parking_lot::Mutex<HashMap<AggregateId, Arc<tokio::sync::Mutex<()>>>>,
    _events: PhantomData<fn() -> E>,
}

impl<E> FileEventStore<E>
where
    E: Event + Serialize + DeserializeOwned,
{
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>, bus: Arc<EventBus<E>>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::info!(root = %root.display(), "file event store opened");

        Ok(Self {
            root,
            bus,
            locks: parking_lot::Mutex::new(HashMap::new()),
            _events: PhantomData,
        })
    }

    /// Gets the directory holding the journals.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Gets the journal path of an aggregate.
    ///
    /// Ids that would escape the root directory are rejected.
    pub fn path_for(&self, aggregate_id: &AggregateId) -> Result<PathBuf> {
        let id = aggregate_id.as_str();
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(EventStoreError::InvalidAggregateId(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.{JOURNAL_EXTENSION}")))
    }

    fn lock_for(&self, aggregate_id: &AggregateId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(aggregate_id.clone()).or_default())
    }

    /// Drops the aggregate's lock entry once no other writer holds or waits on it.
    fn release_lock(&self, aggregate_id: &AggregateId, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock();
        // The table and `lock` are the only owners: nobody else can clone it
        // while the table is locked.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(aggregate_id);
        }
    }

    async fn read_journal(path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn parse_line(
        aggregate_id: &AggregateId,
        line_number: usize,
        line: &str,
    ) -> Result<EventDescriptor<E>> {
        let descriptor: EventDescriptor<E> =
            serde_json::from_str(line).map_err(|e| EventStoreError::Corrupted {
                aggregate_id: aggregate_id.clone(),
                line: line_number,
                reason: e.to_string(),
            })?;

        if descriptor.aggregate_id != *aggregate_id {
            return Err(EventStoreError::Corrupted {
                aggregate_id: aggregate_id.clone(),
                line: line_number,
                reason: format!("entry belongs to {}", descriptor.aggregate_id),
            });
        }
        Ok(descriptor)
    }

    /// Parses a whole journal, checking that versions run 1, 2, 3...
    fn parse_journal(aggregate_id: &AggregateId, contents: &str) -> Result<Vec<EventDescriptor<E>>> {
        let mut descriptors = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_number = index + 1;
            let descriptor = Self::parse_line(aggregate_id, line_number, line)?;

            let expected = descriptors
                .last()
                .map_or(Version::first(), |d: &EventDescriptor<E>| d.version.next());
            if descriptor.version != expected {
                return Err(EventStoreError::Corrupted {
                    aggregate_id: aggregate_id.clone(),
                    line: line_number,
                    reason: format!("expected version {expected}, found {}", descriptor.version),
                });
            }
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }

    /// Reads the version recorded on the last entry of a journal.
    fn last_version(aggregate_id: &AggregateId, contents: &str) -> Result<Option<Version>> {
        let last = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .last();

        match last {
            Some((index, line)) => {
                Ok(Some(Self::parse_line(aggregate_id, index + 1, line)?.version))
            }
            None => Ok(None),
        }
    }

    /// Version check and append; the caller holds the aggregate's lock.
    async fn append(
        &self,
        aggregate_id: &AggregateId,
        path: &Path,
        events: Vec<E>,
        expected: ExpectedVersion,
    ) -> Result<Version> {
        let current = match Self::read_journal(path).await? {
            Some(contents) => Self::last_version(aggregate_id, &contents)?,
            None => None,
        };
        check_expected_version(aggregate_id, current, expected)?;

        if events.is_empty() {
            return Ok(current.unwrap_or_default());
        }

        let descriptors = EventDescriptor::sequence(aggregate_id, events, expected);
        let last_version = descriptors
            .last()
            .map(|d| d.version)
            .unwrap_or_else(|| expected.base());

        let mut buffer = Vec::new();
        for descriptor in &descriptors {
            serde_json::to_writer(&mut buffer, descriptor)?;
            buffer.push(b'\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(&buffer).await?;
        file.flush().await?;

        metrics::counter!("event_store_events_appended").increment(descriptors.len() as u64);
        tracing::debug!(version = %last_version, path = %path.display(), "events appended");

        publish_persisted(&self.bus, aggregate_id, &descriptors, last_version)?;

        Ok(last_version)
    }

    /// Gets every descriptor recorded for an aggregate.
    pub async fn descriptors(&self, aggregate_id: &AggregateId) -> Result<Vec<EventDescriptor<E>>> {
        let path = self.path_for(aggregate_id)?;
        match Self::read_journal(&path).await? {
            Some(contents) => Self::parse_journal(aggregate_id, &contents),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<E> EventStore<E> for FileEventStore<E>
where
    E: Event + Serialize + DeserializeOwned,
{
    #[tracing::instrument(skip(self))]
    async fn get_events_for_aggregate(&self, aggregate_id: &AggregateId) -> Result<Vec<E>> {
        let descriptors = self.descriptors(aggregate_id).await?;
        if descriptors.is_empty() {
            return Err(EventStoreError::AggregateNotFound(aggregate_id.clone()));
        }

        tracing::debug!(count = descriptors.len(), "journal loaded");
        Ok(descriptors.into_iter().map(|d| d.event).collect())
    }

    #[tracing::instrument(skip(self, events), fields(count = events.len()))]
    async fn save_events(
        &self,
        aggregate_id: &AggregateId,
        events: Vec<E>,
        expected: ExpectedVersion,
    ) -> Result<Version> {
        let path = self.path_for(aggregate_id)?;
        validate_events_for_append(aggregate_id, &events)?;

        let lock = self.lock_for(aggregate_id);
        let result = {
            let _guard = lock.lock().await;
            self.append(aggregate_id, &path, events, expected).await
        };
        self.release_lock(aggregate_id, lock);
        result
    }

    async fn get_aggregate_version(&self, aggregate_id: &AggregateId) -> Result<Option<Version>> {
        let path = self.path_for(aggregate_id)?;
        match Self::read_journal(&path).await? {
            Some(contents) => Self::last_version(aggregate_id, &contents),
            None => Ok(None),
        }
    }

    /// Lists aggregates whose journal holds at least one entry.
    ///
    /// A journal left empty by an interrupted first write is skipped, matching
    /// `get_events_for_aggregate`, which reports it as not found.
    async fn aggregate_ids(&self) -> Result<Vec<AggregateId>> {
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(JOURNAL_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let has_entries = Self::read_journal(&path)
                .await?
                .is_some_and(|contents| contents.lines().any(|line| !line.trim().is_empty()));
            if has_entries {
                ids.push(AggregateId::new(stem));
            }
        }

        ids.sort();
        Ok(ids)
    }
}
