use super::*;
use chrono::{DateTime, TimeZone, Utc};

fn name(s: &str) -> MigrationName {
    MigrationName::parse(s).unwrap()
}

fn def(n: &str, sql: &str) -> MigrationDefinition {
    MigrationDefinition::sql(name(n), sql, None)
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn rec(n: &str, fingerprint: &str, secs: i64) -> LedgerRecord {
    LedgerRecord {
        name: n.to_string(),
        fingerprint: fingerprint.to_string(),
        applied_at: at(secs),
    }
}

fn names<'a>(defs: impl IntoIterator<Item = &'a MigrationDefinition>) -> Vec<&'a str> {
    defs.into_iter().map(|d| d.name().as_str()).collect()
}

#[test]
fn test_definitions_sorted_by_name() {
    let set = MigrationSet::new(vec![def("03.c", "c"), def("01.a", "a"), def("02.b", "b")]).unwrap();
    assert_eq!(names(set.definitions()), vec!["01.a", "02.b", "03.c"]);
}

#[test]
fn test_duplicate_definition_rejected() {
    let err = MigrationSet::new(vec![def("01.a", "a"), def("01.a", "other")]).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateDefinition { name } if name == "01.a"));
}

#[test]
fn test_pending_and_executed_partition() {
    let a = def("01.a", "a");
    let fp_a = a.fingerprint().to_string();
    let set = MigrationSet::new(vec![def("02.b", "b"), a, def("03.c", "c")])
        .unwrap()
        .with_records(vec![rec("01.a", &fp_a, 0)]);

    assert_eq!(names(set.pending()), vec!["02.b", "03.c"]);
    let executed: Vec<&str> = set.executed().iter().map(|(d, _)| d.name().as_str()).collect();
    assert_eq!(executed, vec!["01.a"]);
    assert!(set.orphans().is_empty());
    assert!(set.drift().is_empty());
}

#[test]
fn test_pending_includes_names_older_than_executed() {
    let set = MigrationSet::new(vec![def("01.a", "a"), def("02.b", "b")])
        .unwrap()
        .with_records(vec![rec("02.b", "x", 0)]);
    assert_eq!(names(set.pending()), vec!["01.a"]);
}

#[test]
fn test_executed_by_applied_order_follows_ledger_time() {
    let set = MigrationSet::new(vec![def("01.a", "a"), def("02.b", "b"), def("03.c", "c")])
        .unwrap()
        .with_records(vec![
            rec("02.b", "x", 0),
            rec("03.c", "x", 1),
            rec("01.a", "x", 2),
        ]);
    let order: Vec<&str> = set
        .executed_by_applied_order()
        .iter()
        .map(|(d, _)| d.name().as_str())
        .collect();
    assert_eq!(order, vec!["01.a", "03.c", "02.b"]);
}

#[test]
fn test_executed_by_applied_order_ties_break_by_name_desc() {
    let set = MigrationSet::new(vec![def("01.a", "a"), def("02.b", "b")])
        .unwrap()
        .with_records(vec![rec("01.a", "x", 5), rec("02.b", "x", 5)]);
    let order: Vec<&str> = set
        .executed_by_applied_order()
        .iter()
        .map(|(d, _)| d.name().as_str())
        .collect();
    assert_eq!(order, vec!["02.b", "01.a"]);
}

#[test]
fn test_orphans_are_kept_and_reported() {
    let set = MigrationSet::new(vec![def("01.a", "a")])
        .unwrap()
        .with_records(vec![rec("00.gone", "x", 0), rec("01.a", "y", 1)]);

    let orphans: Vec<&str> = set.orphans().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(orphans, vec!["00.gone"]);
    assert_eq!(set.records().len(), 2);
    assert_eq!(set.executed().len(), 1);
    assert!(set.pending().is_empty());
}

#[test]
fn test_drift_reports_old_and_new_fingerprints() {
    let a = def("01.a", "a v2");
    let current = a.fingerprint().to_string();
    let set = MigrationSet::new(vec![a, def("02.b", "b")])
        .unwrap()
        .with_records(vec![rec("01.a", "recorded", 0)]);

    assert_eq!(
        set.drift(),
        vec![FingerprintDrift {
            name: name("01.a"),
            old_fingerprint: "recorded".to_string(),
            new_fingerprint: current,
        }]
    );
}

#[test]
fn test_resolve_target() {
    let set = MigrationSet::new(vec![def("01.a", "a")]).unwrap();
    assert_eq!(set.resolve_target("01.a").unwrap().name(), "01.a");
    let err = set.resolve_target("99.z").unwrap_err();
    assert!(matches!(err, EngineError::UnknownMigration { name } if name == "99.z"));
}

#[test]
fn test_drift_serializes_camel_case() {
    let drift = FingerprintDrift {
        name: name("01.a"),
        old_fingerprint: "o".to_string(),
        new_fingerprint: "n".to_string(),
    };
    let value = serde_json::to_value(&drift).unwrap();
    assert_eq!(value["name"], "01.a");
    assert_eq!(value["oldFingerprint"], "o");
    assert_eq!(value["newFingerprint"], "n");
}

#[test]
fn test_verify_executed() {
    let a = def("01.a", "a");
    let fp = a.fingerprint().to_string();
    let clean = MigrationSet::new(vec![a.clone()])
        .unwrap()
        .with_records(vec![rec("01.a", &fp, 0)]);
    assert!(clean.verify_executed().is_ok());

    let drifted = MigrationSet::new(vec![a])
        .unwrap()
        .with_records(vec![rec("01.a", "stale", 0)]);
    let err = drifted.verify_executed().unwrap_err();
    assert!(err.is_integrity());
    assert!(err.to_string().contains("01.a"));
}

#[test]
fn test_unparseable_ledger_name_is_an_orphan() {
    let set = MigrationSet::new(vec![def("01.a", "a")])
        .unwrap()
        .with_records(vec![rec(" legacy/00.sql", "x", 0)]);
    let orphans: Vec<&str> = set.orphans().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(orphans, vec![" legacy/00.sql"]);
    assert_eq!(names(set.pending()), vec!["01.a"]);
}
