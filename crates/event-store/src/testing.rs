//! Event fixtures shared by the backend tests.

use std::sync::{Arc, Mutex};

use message_bus::{Event, EventBus, Message};
use serde::{Deserialize, Serialize};

use crate::AggregateId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TestEvent {
    Created { id: AggregateId },
    Renamed { id: AggregateId, name: String },
}

impl TestEvent {
    pub fn created(id: &str) -> Self {
        TestEvent::Created {
            id: AggregateId::new(id),
        }
    }

    pub fn renamed(id: &str, name: &str) -> Self {
        TestEvent::Renamed {
            id: AggregateId::new(id),
            name: name.to_string(),
        }
    }
}

impl Message for TestEvent {
    fn name(&self) -> &'static str {
        match self {
            TestEvent::Created { .. } => "Created",
            TestEvent::Renamed { .. } => "Renamed",
        }
    }
}

impl Event for TestEvent {
    fn aggregate_id(&self) -> &AggregateId {
        match self {
            TestEvent::Created { id } | TestEvent::Renamed { id, .. } => id,
        }
    }
}

/// A bus that records every published event.
pub fn recording_bus() -> (Arc<EventBus<TestEvent>>, Arc<Mutex<Vec<TestEvent>>>) {
    let published = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    for name in ["Created", "Renamed"] {
        let sink = Arc::clone(&published);
        bus.register_handler(name, move |event: &TestEvent| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        });
    }
    (Arc::new(bus), published)
}

/// A bus whose only subscriber always fails.
pub fn failing_bus() -> Arc<EventBus<TestEvent>> {
    let mut bus = EventBus::new();
    bus.register_handler("Created", |_: &TestEvent| Err("read model offline".into()));
    Arc::new(bus)
}
