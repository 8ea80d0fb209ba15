//! In-memory view over migration definitions and ledger records.
//!
//! Definitions are kept sorted by name, which fixes the apply order. The
//! ledger is the only source of applied state: a definition is executed iff
//! a record with its name exists, and pending otherwise.

use crate::error::{EngineError, EngineResult, IntegrityDetail};
use crate::ledger::LedgerRecord;
use crate::migration::MigrationDefinition;
use fl_core::MigrationName;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// An executed migration whose current content no longer matches the
/// fingerprint recorded when it was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintDrift {
    pub name: MigrationName,
    pub old_fingerprint: String,
    pub new_fingerprint: String,
}

/// Definitions plus the ledger records read for one call
#[derive(Debug, Clone)]
pub struct MigrationSet {
    definitions: Vec<MigrationDefinition>,
    records: Vec<LedgerRecord>,
    index: HashMap<MigrationName, usize>,
}

impl MigrationSet {
    /// Build a set from loaded definitions, sorting them by name.
    ///
    /// Fails with [`EngineError::DuplicateDefinition`] if two definitions
    /// share a name.
    pub fn new(mut definitions: Vec<MigrationDefinition>) -> EngineResult<Self> {
        definitions.sort_by(|a, b| a.name().cmp(b.name()));
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            if index.insert(def.name().clone(), i).is_some() {
                return Err(EngineError::DuplicateDefinition {
                    name: def.name().to_string(),
                });
            }
        }
        Ok(Self {
            definitions,
            records: Vec::new(),
            index,
        })
    }

    /// Attach the ledger records read for this call
    pub fn with_records(mut self, records: Vec<LedgerRecord>) -> Self {
        self.records = records;
        self
    }

    /// All definitions, ascending by name
    pub fn definitions(&self) -> &[MigrationDefinition] {
        &self.definitions
    }

    /// Ledger records as attached
    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    /// Definition for `name`, or [`EngineError::UnknownMigration`]
    pub fn resolve_target(&self, name: &str) -> EngineResult<&MigrationDefinition> {
        self.get(name).ok_or_else(|| EngineError::UnknownMigration {
            name: name.to_string(),
        })
    }

    /// Definition for `name`, if known
    pub fn get(&self, name: &str) -> Option<&MigrationDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Definitions without a ledger record, ascending by name
    pub fn pending(&self) -> Vec<&MigrationDefinition> {
        let applied: HashSet<&str> = self.records.iter().map(|r| r.name.as_str()).collect();
        self.definitions
            .iter()
            .filter(|d| !applied.contains(d.name().as_str()))
            .collect()
    }

    /// Definitions with a ledger record, ascending by name
    pub fn executed(&self) -> Vec<(&MigrationDefinition, &LedgerRecord)> {
        let mut executed: Vec<_> = self
            .records
            .iter()
            .filter_map(|r| self.get(&r.name).map(|d| (d, r)))
            .collect();
        executed.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));
        executed
    }

    /// Executed migrations, most recently applied first.
    ///
    /// This is the revert order: the exact reverse of the order migrations
    /// were applied in, which differs from reverse name order when an older
    /// name was added after newer ones had been applied. Ties on
    /// `applied_at` fall back to reverse name order, the order a single run
    /// applies them in.
    pub fn executed_by_applied_order(&self) -> Vec<(&MigrationDefinition, &LedgerRecord)> {
        let mut executed = self.executed();
        executed.sort_by(|(a, ra), (b, rb)| {
            rb.applied_at
                .cmp(&ra.applied_at)
                .then_with(|| b.name().cmp(a.name()))
        });
        executed
    }

    /// Ledger records with no matching definition, ascending by name
    pub fn orphans(&self) -> Vec<&LedgerRecord> {
        let mut orphans: Vec<_> = self
            .records
            .iter()
            .filter(|r| !self.index.contains_key(r.name.as_str()))
            .collect();
        orphans.sort_by(|a, b| a.name.cmp(&b.name));
        orphans
    }

    /// Executed migrations whose fingerprint has drifted, ascending by name
    pub fn drift(&self) -> Vec<FingerprintDrift> {
        self.executed()
            .into_iter()
            .filter(|(def, record)| def.fingerprint() != record.fingerprint)
            .map(|(def, record)| FingerprintDrift {
                name: def.name().clone(),
                old_fingerprint: record.fingerprint.clone(),
                new_fingerprint: def.fingerprint().to_string(),
            })
            .collect()
    }

    /// Fail with an integrity error on the first drifted executed migration
    pub fn verify_executed(&self) -> EngineResult<()> {
        match self.drift().into_iter().next() {
            Some(drift) => Err(EngineError::Integrity {
                name: drift.name.to_string(),
                detail: IntegrityDetail::FingerprintMismatch {
                    recorded: drift.old_fingerprint,
                    current: drift.new_fingerprint,
                },
            }),
            None => Ok(()),
        }
    }

    /// Log a warning for every orphaned ledger record
    pub(crate) fn warn_orphans(&self) {
        for orphan in self.orphans() {
            log::warn!(
                "Ledger records {} (applied {}) but no migration with that name exists",
                orphan.name,
                orphan.applied_at
            );
        }
    }
}

#[cfg(test)]
#[path = "set_test.rs"]
mod tests;
