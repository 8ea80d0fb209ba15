//! Structured migration event stream.
//!
//! The engine reports progress as [`MigrationEvent`] values pushed into an
//! [`EventSink`]. Rendering is left to the consumer; only the event shapes
//! are contractual. On the wire an event is a JSON object with a `kind`
//! field plus kind-specific camelCase fields:
//!
//! | kind        | fields                          |
//! |-------------|---------------------------------|
//! | `created`   | `path`                          |
//! | `migrating` | `name`                          |
//! | `migrated`  | `name`, `durationSeconds`       |
//! | `reverting` | `name`                          |
//! | `reverted`  | `name`, `durationSeconds`       |
//! | `up`        | `message`, `totalMigrations`?   |
//! | `down`      | `message`, `totalMigrations`?   |
//!
//! Anything else, including a known kind with an unexpected shape, is kept
//! verbatim in [`MigrationEvent::Other`] so that converting to and from JSON
//! never loses information.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::sync::Mutex;

/// One event in the migration event stream
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationEvent {
    /// A migration file was scaffolded
    Created { path: String },
    /// A migration is about to be applied
    Migrating { name: String },
    /// A migration was applied
    Migrated { name: String, duration_seconds: f64 },
    /// A migration is about to be reverted
    Reverting { name: String },
    /// A migration was reverted
    Reverted { name: String, duration_seconds: f64 },
    /// Summary of an up run
    Up {
        message: String,
        total_migrations: Option<usize>,
    },
    /// Summary of a down run
    Down {
        message: String,
        total_migrations: Option<usize>,
    },
    /// Unrecognized event, passed through unchanged
    Other(Value),
}

impl MigrationEvent {
    /// The `kind` discriminator, or `None` for a passthrough value without one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            MigrationEvent::Created { .. } => Some("created"),
            MigrationEvent::Migrating { .. } => Some("migrating"),
            MigrationEvent::Migrated { .. } => Some("migrated"),
            MigrationEvent::Reverting { .. } => Some("reverting"),
            MigrationEvent::Reverted { .. } => Some("reverted"),
            MigrationEvent::Up { .. } => Some("up"),
            MigrationEvent::Down { .. } => Some("down"),
            MigrationEvent::Other(value) => value.get("kind").and_then(Value::as_str),
        }
    }

    /// Convert to the JSON wire shape.
    pub fn to_value(&self) -> Value {
        match self {
            MigrationEvent::Created { path } => json!({ "kind": "created", "path": path }),
            MigrationEvent::Migrating { name } => json!({ "kind": "migrating", "name": name }),
            MigrationEvent::Migrated {
                name,
                duration_seconds,
            } => json!({
                "kind": "migrated",
                "name": name,
                "durationSeconds": duration_seconds,
            }),
            MigrationEvent::Reverting { name } => json!({ "kind": "reverting", "name": name }),
            MigrationEvent::Reverted {
                name,
                duration_seconds,
            } => json!({
                "kind": "reverted",
                "name": name,
                "durationSeconds": duration_seconds,
            }),
            MigrationEvent::Up {
                message,
                total_migrations,
            } => summary_value("up", message, *total_migrations),
            MigrationEvent::Down {
                message,
                total_migrations,
            } => summary_value("down", message, *total_migrations),
            MigrationEvent::Other(value) => value.clone(),
        }
    }

    /// Parse the JSON wire shape. Never fails: unrecognized input becomes
    /// [`MigrationEvent::Other`].
    pub fn from_value(value: Value) -> Self {
        match parse_known(&value) {
            Some(event) => event,
            None => MigrationEvent::Other(value),
        }
    }
}

fn summary_value(kind: &str, message: &str, total_migrations: Option<usize>) -> Value {
    let mut map = Map::new();
    map.insert("kind".to_string(), json!(kind));
    map.insert("message".to_string(), json!(message));
    if let Some(total) = total_migrations {
        map.insert("totalMigrations".to_string(), json!(total));
    }
    Value::Object(map)
}

fn parse_known(value: &Value) -> Option<MigrationEvent> {
    let obj = value.as_object()?;
    let kind = obj.get("kind")?.as_str()?;

    let only = |allowed: &[&str]| {
        obj.keys()
            .all(|k| k == "kind" || allowed.contains(&k.as_str()))
    };
    let string = |key: &str| obj.get(key)?.as_str().map(str::to_string);
    let seconds = |key: &str| obj.get(key)?.as_f64();
    // Absent is fine; present but not a count is not.
    let total = || match obj.get("totalMigrations") {
        None => Some(None),
        Some(v) => v.as_u64().map(|n| Some(n as usize)),
    };

    match kind {
        "created" if only(&["path"]) => Some(MigrationEvent::Created {
            path: string("path")?,
        }),
        "migrating" if only(&["name"]) => Some(MigrationEvent::Migrating {
            name: string("name")?,
        }),
        "migrated" if only(&["name", "durationSeconds"]) => Some(MigrationEvent::Migrated {
            name: string("name")?,
            duration_seconds: seconds("durationSeconds")?,
        }),
        "reverting" if only(&["name"]) => Some(MigrationEvent::Reverting {
            name: string("name")?,
        }),
        "reverted" if only(&["name", "durationSeconds"]) => Some(MigrationEvent::Reverted {
            name: string("name")?,
            duration_seconds: seconds("durationSeconds")?,
        }),
        "up" if only(&["message", "totalMigrations"]) => Some(MigrationEvent::Up {
            message: string("message")?,
            total_migrations: total()?,
        }),
        "down" if only(&["message", "totalMigrations"]) => Some(MigrationEvent::Down {
            message: string("message")?,
            total_migrations: total()?,
        }),
        _ => None,
    }
}

impl Serialize for MigrationEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MigrationEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(MigrationEvent::from_value)
    }
}

/// Consumer of the migration event stream.
///
/// Sinks are called synchronously from the engine between datastore calls,
/// so implementations should not block.
///
/// Under [`TransactionStrategy::Single`](crate::TransactionStrategy::Single)
/// a `migrated` or `reverted` event is provisional until the run commits. A
/// later failure rolls those steps back without a compensating event; the
/// run's error is the only signal.
pub trait EventSink: Send + Sync {
    /// Receive one event
    fn emit(&self, event: &MigrationEvent);
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &MigrationEvent) {}
}

/// Sink that forwards events to the `log` facade as JSON at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &MigrationEvent) {
        log::info!("{}", event.to_value());
    }
}

/// Sink that keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<MigrationEvent>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<MigrationEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Kinds of the events received so far
    pub fn kinds(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(|e| e.kind().unwrap_or("").to_string())
            .collect()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &MigrationEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
