//! Reconciling ledger fingerprints with current migration content.

use crate::error::EngineResult;
use crate::migrator::Migrator;
use crate::set::FingerprintDrift;
use serde::Serialize;

/// Fingerprint changes found (and, unless a dry run, applied) by repair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub dry_run: bool,
    pub changes: Vec<FingerprintDrift>,
}

impl RepairReport {
    /// Whether every executed migration already matched its fingerprint
    pub fn is_clean(&self) -> bool {
        self.changes.is_empty()
    }
}

impl Migrator {
    /// Overwrite drifted ledger fingerprints with the current ones.
    ///
    /// All updates commit together or not at all. Effects are never run.
    /// With `dry_run` the ledger is left untouched and the report lists what
    /// would change.
    pub async fn repair(&self, dry_run: bool) -> EngineResult<RepairReport> {
        let set = self.load_set().await?;
        let changes = set.drift();
        for change in &changes {
            log::warn!(
                "{} fingerprint drift on {}: {} -> {}",
                if dry_run { "Would repair" } else { "Repairing" },
                change.name,
                change.old_fingerprint,
                change.new_fingerprint
            );
        }

        if !dry_run && !changes.is_empty() {
            let ledger = self.ledger();
            self.transaction(async {
                for change in &changes {
                    ledger
                        .update_fingerprint(&change.name, &change.new_fingerprint)
                        .await?;
                }
                Ok(())
            })
            .await?;
            log::info!("Repaired {} ledger fingerprint(s)", changes.len());
        }

        Ok(RepairReport { dry_run, changes })
    }
}
