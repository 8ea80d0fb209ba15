//! Migration definitions and their effects.

use fl_core::{fingerprint, MigrationName};
use fl_db::{Database, DbResult};
use futures::future::BoxFuture;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Signature of a procedural migration step
pub type ProcedureFn =
    dyn for<'a> Fn(&'a dyn Database) -> BoxFuture<'a, DbResult<()>> + Send + Sync;

/// Something runnable against a datastore handle
#[derive(Clone)]
pub enum Effect {
    /// Literal SQL, run as one batch
    Sql(String),
    /// Code that issues its own statements through the handle
    Procedure(Arc<ProcedureFn>),
}

impl Effect {
    /// Literal SQL effect
    pub fn sql(sql: impl Into<String>) -> Self {
        Effect::Sql(sql.into())
    }

    /// Procedural effect.
    ///
    /// The handle passed in already sits inside the engine's transaction;
    /// procedures must not begin, commit or roll back themselves.
    ///
    /// ```
    /// use fl_engine::Effect;
    /// use futures::FutureExt;
    ///
    /// let effect = Effect::procedure(|db| {
    ///     async move { db.execute_batch("CREATE TABLE users (id INT)").await }.boxed()
    /// });
    /// assert!(matches!(effect, Effect::Procedure(_)));
    /// ```
    pub fn procedure<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a dyn Database) -> BoxFuture<'a, DbResult<()>> + Send + Sync + 'static,
    {
        Effect::Procedure(Arc::new(f))
    }

    /// Run the effect against `db`
    pub async fn run(&self, db: &dyn Database) -> DbResult<()> {
        match self {
            Effect::Sql(sql) => db.execute_batch(sql).await,
            Effect::Procedure(procedure) => procedure(db).await,
        }
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Sql(sql) => f.debug_tuple("Sql").field(sql).finish(),
            Effect::Procedure(_) => f.write_str("Procedure(..)"),
        }
    }
}

/// One migration: a name, its up and down effects, and the source content
/// its fingerprint is computed from.
///
/// Immutable once built. The fingerprint is computed on first use.
#[derive(Debug, Clone)]
pub struct MigrationDefinition {
    name: MigrationName,
    path: Option<PathBuf>,
    content: String,
    up: Effect,
    down: Option<Effect>,
    fingerprint: OnceLock<String>,
}

impl MigrationDefinition {
    /// SQL migration; the up SQL is also the fingerprinted content.
    pub fn sql(name: MigrationName, up: impl Into<String>, down: Option<String>) -> Self {
        let up = up.into();
        Self {
            name,
            path: None,
            content: up.clone(),
            up: Effect::Sql(up),
            down: down.map(Effect::Sql),
            fingerprint: OnceLock::new(),
        }
    }

    /// Migration with arbitrary effects.
    ///
    /// `content` stands in for the migration's source text: change it
    /// whenever the procedure's behavior changes so drift is detectable.
    pub fn procedural(
        name: MigrationName,
        content: impl Into<String>,
        up: Effect,
        down: Option<Effect>,
    ) -> Self {
        Self {
            name,
            path: None,
            content: content.into(),
            up,
            down,
            fingerprint: OnceLock::new(),
        }
    }

    /// Record the file the migration was loaded from
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn name(&self) -> &MigrationName {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Fingerprinted source content
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn up(&self) -> &Effect {
        &self.up
    }

    pub fn down(&self) -> Option<&Effect> {
        self.down.as_ref()
    }

    /// Effect for `direction`
    pub fn effect(&self, direction: Direction) -> Option<&Effect> {
        match direction {
            Direction::Up => Some(&self.up),
            Direction::Down => self.down.as_ref(),
        }
    }

    /// Fingerprint of the current content
    pub fn fingerprint(&self) -> &str {
        self.fingerprint.get_or_init(|| fingerprint(&self.content))
    }
}
