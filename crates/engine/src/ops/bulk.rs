use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::util::distinct_ids;
use crate::{
    BulkOutcome, EngineError, RecordKind, RecordStatus, ResultEngine, expense, income, tithe,
};

use super::{Engine, with_tx};

impl Engine {
    /// Deletes many records of one kind in a single transaction.
    ///
    /// Incomes take their tithes with them. For expenses, tithe records in
    /// the request are skipped and counted in [`BulkOutcome::protected`].
    /// Unknown ids are ignored.
    pub async fn bulk_delete(&self, kind: RecordKind, ids: &[Uuid]) -> ResultEngine<BulkOutcome> {
        let ids = distinct_ids(ids)?;

        let outcome = with_tx!(self, |db_tx| {
            match kind {
                RecordKind::Income => {
                    expense::Entity::delete_many()
                        .filter(expense::Column::SourceIncomeId.is_in(ids.clone()))
                        .exec(&db_tx)
                        .await?;
                    let result = income::Entity::delete_many()
                        .filter(income::Column::Id.is_in(ids.clone()))
                        .exec(&db_tx)
                        .await?;
                    Ok(BulkOutcome {
                        affected: result.rows_affected,
                        protected: 0,
                    })
                }
                RecordKind::Expense => {
                    let (eligible, protected) = self.partition_expenses(&db_tx, &ids).await?;
                    let affected = if eligible.is_empty() {
                        0
                    } else {
                        expense::Entity::delete_many()
                            .filter(expense::Column::Id.is_in(eligible))
                            .exec(&db_tx)
                            .await?
                            .rows_affected
                    };
                    Ok(BulkOutcome {
                        affected,
                        protected,
                    })
                }
            }
        })?;

        tracing::info!(
            kind = kind.as_str(),
            requested = ids.len(),
            affected = outcome.affected,
            protected = outcome.protected,
            "bulk delete"
        );
        Ok(outcome)
    }

    /// Sets the status of many records of one kind in a single transaction.
    ///
    /// The status must belong to `kind`. Tithe records are skipped like in
    /// [`Engine::bulk_delete`]; an income status change leaves its tithe alone.
    pub async fn bulk_set_status(
        &self,
        kind: RecordKind,
        ids: &[Uuid],
        status: RecordStatus,
    ) -> ResultEngine<BulkOutcome> {
        if status.kind() != kind {
            return Err(EngineError::InvalidInput(format!(
                "status \"{}\" does not apply to {} records",
                status.as_str(),
                kind.as_str()
            )));
        }
        let ids = distinct_ids(ids)?;
        let now = Utc::now();

        let outcome = with_tx!(self, |db_tx| {
            match kind {
                RecordKind::Income => {
                    let result = income::Entity::update_many()
                        .col_expr(income::Column::Status, Expr::value(status.as_str()))
                        .col_expr(income::Column::UpdatedAt, Expr::value(now))
                        .col_expr(
                            income::Column::Revision,
                            Expr::col(income::Column::Revision).add(1),
                        )
                        .filter(income::Column::Id.is_in(ids.clone()))
                        .exec(&db_tx)
                        .await?;
                    Ok(BulkOutcome {
                        affected: result.rows_affected,
                        protected: 0,
                    })
                }
                RecordKind::Expense => {
                    let (eligible, protected) = self.partition_expenses(&db_tx, &ids).await?;
                    let affected = if eligible.is_empty() {
                        0
                    } else {
                        expense::Entity::update_many()
                            .col_expr(expense::Column::Status, Expr::value(status.as_str()))
                            .col_expr(expense::Column::UpdatedAt, Expr::value(now))
                            .col_expr(
                                expense::Column::Revision,
                                Expr::col(expense::Column::Revision).add(1),
                            )
                            .filter(expense::Column::Id.is_in(eligible))
                            .exec(&db_tx)
                            .await?
                            .rows_affected
                    };
                    Ok(BulkOutcome {
                        affected,
                        protected,
                    })
                }
            }
        })?;

        tracing::info!(
            kind = kind.as_str(),
            status = status.as_str(),
            requested = ids.len(),
            affected = outcome.affected,
            protected = outcome.protected,
            "bulk status change"
        );
        Ok(outcome)
    }

    /// Split requested expense ids into editable ones and a count of tithe
    /// records. Ids that match nothing are dropped.
    async fn partition_expenses(
        &self,
        db_tx: &DatabaseTransaction,
        ids: &[String],
    ) -> ResultEngine<(Vec<String>, u64)> {
        let models = expense::Entity::find()
            .filter(expense::Column::Id.is_in(ids.iter().cloned()))
            .all(db_tx)
            .await?;

        let mut eligible = Vec::with_capacity(models.len());
        let mut protected = 0;
        for model in models {
            if tithe::is_protected(&model) {
                protected += 1;
            } else {
                eligible.push(model.id);
            }
        }
        Ok((eligible, protected))
    }
}
