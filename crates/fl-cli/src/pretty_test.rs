use super::*;
use serde_json::Value;
use std::sync::Arc;

const NAME: &str = "2022.08.25T12.51.47.test.sql";

#[test]
fn test_known_events() {
    let cases = [
        (
            MigrationEvent::Created {
                path: "./db/migrations/2022.08.25T12.51.47.test.sql".to_string(),
            },
            "created   ./db/migrations/2022.08.25T12.51.47.test.sql",
        ),
        (
            MigrationEvent::Migrating {
                name: NAME.to_string(),
            },
            "migrating 2022.08.25T12.51.47.test.sql",
        ),
        (
            MigrationEvent::Migrated {
                name: NAME.to_string(),
                duration_seconds: 0.024,
            },
            "migrated  2022.08.25T12.51.47.test.sql in 0.024 s",
        ),
        (
            MigrationEvent::Up {
                message: "applied 1 migrations.".to_string(),
                total_migrations: None,
            },
            "up migration completed, applied 1 migrations.",
        ),
        (
            MigrationEvent::Reverting {
                name: NAME.to_string(),
            },
            "reverting 2022.08.25T12.51.47.test.sql",
        ),
        (
            MigrationEvent::Reverted {
                name: NAME.to_string(),
                duration_seconds: 0.026,
            },
            "reverted  2022.08.25T12.51.47.test.sql in 0.026 s",
        ),
        (
            MigrationEvent::Down {
                message: "reverted 1 migrations.".to_string(),
                total_migrations: None,
            },
            "down migration completed, reverted 1 migrations.",
        ),
    ];
    for (event, expected) in cases {
        assert_eq!(render(&event), vec![expected.to_string()]);
    }
}

#[test]
fn test_extra_fields_follow_on_next_line() {
    let lines = render(&MigrationEvent::Up {
        message: "applied 1 migrations.".to_string(),
        total_migrations: Some(10),
    });
    assert_eq!(lines[0], "up migration completed, applied 1 migrations.");
    let extra: Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(extra, json!({ "totalMigrations": 10 }));
}

#[test]
fn test_unknown_event_prints_raw() {
    let value = json!({
        "kind": "finished",
        "message": "process finished.",
        "durationSeconds": 0.1,
    });
    let lines = render(&MigrationEvent::Other(value.clone()));
    assert_eq!(lines.len(), 1);
    let printed: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(printed, value);
}

#[test]
fn test_whole_second_duration() {
    let lines = render(&MigrationEvent::Migrated {
        name: NAME.to_string(),
        duration_seconds: 1.0,
    });
    assert_eq!(lines[0], format!("migrated  {NAME} in 1 s"));
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_writes_lines() {
    let buf = SharedBuf::default();
    let sink = PrettySink::new(Box::new(buf.clone()));
    sink.emit(&MigrationEvent::Migrating {
        name: NAME.to_string(),
    });
    sink.emit(&MigrationEvent::Down {
        message: "reverted 0 migrations.".to_string(),
        total_migrations: Some(0),
    });

    let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    assert_eq!(
        written,
        "migrating 2022.08.25T12.51.47.test.sql\n\
         down migration completed, reverted 0 migrations.\n\
         {\"totalMigrations\":0}\n"
    );
}
