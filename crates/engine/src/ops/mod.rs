use sea_orm::DatabaseConnection;

mod access;
mod bulk;
mod expenses;
mod incomes;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// The block is evaluated as an `async` block, so `?` and `return` inside it
/// leave the block (not the enclosing function) and the rollback always runs.
/// Lock contention raised by the body or by the commit is reported as
/// `EngineError::Conflict`.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: $crate::ResultEngine<_> = async { $body }.await;
        match result {
            Ok(value) => match $tx.commit().await {
                Ok(()) => Ok(value),
                Err(err) => Err($crate::EngineError::from(err).contention_as_conflict()),
            },
            Err(err) => {
                if let Err(rollback_err) = $tx.rollback().await {
                    tracing::warn!("transaction rollback failed: {rollback_err}");
                }
                Err(err.contention_as_conflict())
            }
        }
    }};
}

pub(crate) use with_tx;

/// Consistency engine for incomes, expenses and their derived tithes.
///
/// Every write runs in its own database transaction; the engine keeps no
/// shared mutable state besides the database itself.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    lock_tithe_edits: bool,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    lock_tithe_edits: bool,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Reject field edits on tithe records made through `update_expense`.
    ///
    /// Off by default: tithe records can be edited but never deleted or
    /// status-changed in bulk.
    pub fn lock_tithe_edits(mut self, lock: bool) -> EngineBuilder {
        self.lock_tithe_edits = lock;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> crate::ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            lock_tithe_edits: self.lock_tithe_edits,
        })
    }
}
