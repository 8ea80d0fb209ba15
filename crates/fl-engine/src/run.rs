//! Applying and reverting migrations.

use crate::error::{EngineError, EngineResult, IntegrityDetail};
use crate::ledger::LedgerRecord;
use crate::migration::{Direction, MigrationDefinition};
use crate::migrator::Migrator;
use crate::set::MigrationSet;
use fl_core::{MigrationEvent, MigrationName, TransactionStrategy};
use std::time::{Duration, Instant};

/// How far a run goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Target {
    /// Up: every pending migration. Down: only the most recently applied one.
    #[default]
    Default,
    /// Up: pending migrations up to and including this name. Down: applied
    /// migrations from the most recent back to and including this name.
    To(MigrationName),
    /// Every candidate in the given direction
    All,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub direction: Direction,
    /// Migrations processed, in execution order
    pub migrations: Vec<MigrationName>,
    pub duration: Duration,
}

impl Migrator {
    /// Apply pending migrations
    pub async fn up(&self, target: Target) -> EngineResult<RunResult> {
        self.run(Direction::Up, target).await
    }

    /// Revert applied migrations
    pub async fn down(&self, target: Target) -> EngineResult<RunResult> {
        self.run(Direction::Down, target).await
    }

    /// Move the datastore in `direction` as far as `target`.
    ///
    /// Unknown target names are rejected before the datastore is touched.
    /// Candidates are checked up front (drift and missing down migrations on
    /// revert, drift of executed migrations on up when `verify_on_up` is
    /// set), then run strictly one after another under the configured
    /// transaction strategy. The first failure stops the run.
    pub async fn run(&self, direction: Direction, target: Target) -> EngineResult<RunResult> {
        let started = Instant::now();
        let set = self.load_definitions()?;
        if let Target::To(name) = &target {
            set.resolve_target(name)?;
        }
        let set = self.attach_records(set).await?;

        let candidates = match direction {
            Direction::Up => self.up_candidates(&set, &target)?,
            Direction::Down => down_candidates(&set, &target)?,
        };
        log::info!(
            "Running {} {} migration(s) on {} ({})",
            candidates.len(),
            direction,
            self.db().db_type(),
            self.options().strategy
        );

        match self.options().strategy {
            TransactionStrategy::PerMigration => {
                for def in &candidates {
                    self.announce(def, direction);
                    let step_started = Instant::now();
                    self.transaction(self.step(def, direction))
                        .await
                        .map_err(|e| e.during(def.name(), direction))?;
                    self.finish(def, direction, step_started.elapsed());
                }
            }
            TransactionStrategy::Single => {
                if let Some(last) = candidates.last() {
                    self.transaction(async {
                        for def in &candidates {
                            self.announce(def, direction);
                            let step_started = Instant::now();
                            self.step(def, direction)
                                .await
                                .map_err(|e| e.during(def.name(), direction))?;
                            self.finish(def, direction, step_started.elapsed());
                        }
                        Ok(())
                    })
                    .await
                    .map_err(|e| e.during(last.name(), direction))?;
                }
            }
        }

        let migrations: Vec<MigrationName> =
            candidates.iter().map(|d| d.name().clone()).collect();
        let count = migrations.len();
        let event = match direction {
            Direction::Up => MigrationEvent::Up {
                message: format!("applied {count} migrations."),
                total_migrations: Some(count),
            },
            Direction::Down => MigrationEvent::Down {
                message: format!("reverted {count} migrations."),
                total_migrations: Some(count),
            },
        };
        self.events().emit(&event);

        let duration = started.elapsed();
        log::info!(
            "{} migration completed: {} migration(s) in {:.3}s",
            direction,
            count,
            duration.as_secs_f64()
        );
        Ok(RunResult {
            direction,
            migrations,
            duration,
        })
    }

    fn up_candidates<'s>(
        &self,
        set: &'s MigrationSet,
        target: &Target,
    ) -> EngineResult<Vec<&'s MigrationDefinition>> {
        if self.options().verify_on_up {
            set.verify_executed()?;
        }
        let pending = set.pending();
        Ok(match target {
            Target::Default | Target::All => pending,
            Target::To(name) => pending.into_iter().filter(|d| d.name() <= name).collect(),
        })
    }

    /// Run one migration's effect and its ledger write on the current
    /// transaction
    async fn step(&self, def: &MigrationDefinition, direction: Direction) -> EngineResult<()> {
        let ledger = self.ledger();
        let name = def.name();
        match direction {
            Direction::Up => {
                if ledger.find_record(name).await?.is_some() {
                    return Err(EngineError::Integrity {
                        name: name.to_string(),
                        detail: IntegrityDetail::AlreadyApplied,
                    });
                }
                def.up()
                    .run(self.db())
                    .await
                    .map_err(|source| EngineError::Migration {
                        name: name.to_string(),
                        direction,
                        source,
                    })?;
                ledger
                    .insert_record(&LedgerRecord::now(name.as_str(), def.fingerprint()))
                    .await?;
            }
            Direction::Down => {
                let effect = def.down().ok_or_else(|| EngineError::MissingDownEffect {
                    name: name.to_string(),
                })?;
                effect
                    .run(self.db())
                    .await
                    .map_err(|source| EngineError::Migration {
                        name: name.to_string(),
                        direction,
                        source,
                    })?;
                ledger.delete_record(name).await?;
            }
        }
        Ok(())
    }

    fn announce(&self, def: &MigrationDefinition, direction: Direction) {
        let name = def.name().to_string();
        log::debug!("{} {}", direction, name);
        self.events().emit(&match direction {
            Direction::Up => MigrationEvent::Migrating { name },
            Direction::Down => MigrationEvent::Reverting { name },
        });
    }

    fn finish(&self, def: &MigrationDefinition, direction: Direction, elapsed: Duration) {
        let name = def.name().to_string();
        let duration_seconds = (elapsed.as_secs_f64() * 1000.0).round() / 1000.0;
        self.events().emit(&match direction {
            Direction::Up => MigrationEvent::Migrated {
                name,
                duration_seconds,
            },
            Direction::Down => MigrationEvent::Reverted {
                name,
                duration_seconds,
            },
        });
    }
}

/// Applied migrations to revert, most recent first, all verified before
/// anything runs
fn down_candidates<'s>(
    set: &'s MigrationSet,
    target: &Target,
) -> EngineResult<Vec<&'s MigrationDefinition>> {
    let applied = set.executed_by_applied_order();
    let selected: Vec<_> = match target {
        Target::Default => applied.into_iter().take(1).collect(),
        Target::All => applied,
        Target::To(name) => {
            let Some(pos) = applied.iter().position(|(d, _)| d.name() == name) else {
                return Err(EngineError::TargetNotApplied {
                    name: name.to_string(),
                });
            };
            applied.into_iter().take(pos + 1).collect()
        }
    };

    for (def, record) in &selected {
        if def.fingerprint() != record.fingerprint {
            return Err(EngineError::Integrity {
                name: def.name().to_string(),
                detail: IntegrityDetail::FingerprintMismatch {
                    recorded: record.fingerprint.clone(),
                    current: def.fingerprint().to_string(),
                },
            });
        }
        if def.down().is_none() {
            return Err(EngineError::MissingDownEffect {
                name: def.name().to_string(),
            });
        }
    }
    Ok(selected.into_iter().map(|(d, _)| d).collect())
}
