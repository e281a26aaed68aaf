use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use event_store::{
    AggregateId, EventStore, ExpectedVersion, FileEventStore, InMemoryEventStore, Version,
};
use message_bus::{Event, EventBus, Message};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NightBooked {
    reservation_id: AggregateId,
    night: u32,
}

impl Message for NightBooked {
    fn name(&self) -> &'static str {
        "NightBooked"
    }
}

impl Event for NightBooked {
    fn aggregate_id(&self) -> &AggregateId {
        &self.reservation_id
    }
}

fn make_events(id: &AggregateId, count: u32) -> Vec<NightBooked> {
    (1..=count)
        .map(|night| NightBooked {
            reservation_id: id.clone(),
            night,
        })
        .collect()
}

fn memory_store() -> InMemoryEventStore<NightBooked> {
    InMemoryEventStore::new(Arc::new(EventBus::new()))
}

fn bench_append_single_event(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("event_store/append_single_event", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = memory_store();
                let id = AggregateId::new("R1");
                store
                    .save_events(&id, make_events(&id, 1), ExpectedVersion::New)
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_append_batch_10(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("event_store/append_batch_10", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = memory_store();
                let id = AggregateId::new("R1");
                store
                    .save_events(&id, make_events(&id, 10), ExpectedVersion::New)
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_get_events_for_aggregate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = memory_store();
    let id = AggregateId::new("R1");

    // Pre-populate with 100 events
    rt.block_on(async {
        store
            .save_events(&id, make_events(&id, 100), ExpectedVersion::New)
            .await
            .unwrap();
    });

    c.bench_function("event_store/get_events_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                store.get_events_for_aggregate(&id).await.unwrap();
            });
        });
    });
}

fn bench_file_append_with_version_check(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::TempDir::new().unwrap();
    let store = rt
        .block_on(FileEventStore::open(dir.path(), Arc::new(EventBus::new())))
        .unwrap();
    let id = AggregateId::new("R1");
    let mut version = Version::initial();

    c.bench_function("event_store/file_append_with_version_check", |b| {
        b.iter(|| {
            version = rt.block_on(async {
                store
                    .save_events(&id, make_events(&id, 1), ExpectedVersion::Exact(version))
                    .await
                    .unwrap()
            });
        });
    });
}

fn bench_file_replay_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::TempDir::new().unwrap();
    let store = rt
        .block_on(FileEventStore::open(dir.path(), Arc::new(EventBus::new())))
        .unwrap();
    let id = AggregateId::new("R1");

    rt.block_on(async {
        store
            .save_events(&id, make_events(&id, 100), ExpectedVersion::New)
            .await
            .unwrap();
    });

    c.bench_function("event_store/file_replay_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                store.get_events_for_aggregate(&id).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_append_single_event,
    bench_append_batch_10,
    bench_get_events_for_aggregate,
    bench_file_append_with_version_check,
    bench_file_replay_100,
);
criterion_main!(benches);
