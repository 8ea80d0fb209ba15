use super::*;
use crate::migration::Effect;
use fl_core::{fingerprint, MemorySink};
use futures::FutureExt;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_loads_up_and_down_files() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "02.orders.sql", "create table orders(id int);");
    write(tmp.path(), "01.users.sql", "create table users(id int);");
    write(tmp.path(), "down/01.users.sql", "drop table users;");
    write(tmp.path(), "notes.txt", "ignored");

    let mut defs = DirectoryLoader::new(tmp.path()).list_definitions().unwrap();
    defs.sort_by(|a, b| a.name().cmp(b.name()));

    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].name(), "01.users.sql");
    assert_eq!(defs[0].fingerprint(), fingerprint("create table users(id int);"));
    assert!(matches!(defs[0].down(), Some(Effect::Sql(sql)) if sql == "drop table users;"));
    assert_eq!(defs[0].path(), Some(tmp.path().join("01.users.sql").as_path()));
    assert!(defs[1].down().is_none());
}

#[test]
fn test_missing_directory_yields_no_definitions() {
    let tmp = TempDir::new().unwrap();
    let loader = DirectoryLoader::new(tmp.path().join("nope"));
    assert!(loader.list_definitions().unwrap().is_empty());
}

#[test]
fn test_unmatched_down_file_is_ignored() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "01.users.sql", "select 1;");
    write(tmp.path(), "down/00.stray.sql", "select 2;");

    let defs = DirectoryLoader::new(tmp.path()).list_definitions().unwrap();
    assert_eq!(defs.len(), 1);
}

#[test]
fn test_procedures_are_merged() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "01.users.sql", "select 1;");
    let procedure = MigrationDefinition::procedural(
        MigrationName::parse("02.seed").unwrap(),
        "seed v1",
        Effect::procedure(|_db| async { Ok(()) }.boxed()),
        None,
    );

    let defs = DirectoryLoader::new(tmp.path())
        .with_procedures(vec![procedure])
        .list_definitions()
        .unwrap();
    let names: Vec<&str> = defs.iter().map(|d| d.name().as_str()).collect();
    assert_eq!(names, vec!["01.users.sql", "02.seed"]);
}

#[test]
fn test_vec_loader_returns_definitions() {
    let defs = vec![MigrationDefinition::sql(
        MigrationName::parse("01.a").unwrap(),
        "select 1",
        None,
    )];
    assert_eq!(defs.list_definitions().unwrap().len(), 1);
}

#[test]
fn test_create_writes_templates_and_emits_event() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let loader = DirectoryLoader::new(&dir);
    let sink = MemorySink::new();

    let path = loader.create("add users", &sink).unwrap();

    let file_name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(file_name.ends_with(".add_users.sql"), "{file_name}");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SQL_UP);
    assert_eq!(
        std::fs::read_to_string(dir.join("down").join(&file_name)).unwrap(),
        SQL_DOWN
    );
    assert_eq!(
        sink.events(),
        vec![MigrationEvent::Created {
            path: path.display().to_string()
        }]
    );

    let defs = loader.list_definitions().unwrap();
    assert_eq!(defs.len(), 1);
    assert!(defs[0].down().is_some());
}

#[test]
fn test_create_rejects_empty_name() {
    let tmp = TempDir::new().unwrap();
    let sink = MemorySink::new();
    let err = DirectoryLoader::new(tmp.path()).create("!!", &sink).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::InvalidMigrationName { .. })
    ));
    assert!(sink.events().is_empty());
}

#[test]
fn test_vec_loader_cannot_create() {
    let defs: Vec<MigrationDefinition> = Vec::new();
    let err = defs.create("x", &MemorySink::new()).unwrap_err();
    assert!(matches!(err, EngineError::CreateUnsupported));
}
