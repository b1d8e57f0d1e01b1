use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::tithe::{self, TITHE_CATEGORY, TitheAction};
use crate::util::{ensure_non_negative, ensure_revision};
use crate::{
    EngineError, Expense, ExpenseStatus, Income, IncomePatch, IncomeSource, NewIncome,
    ResultEngine, expense, income,
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates an income and, when it qualifies, its tithe.
    ///
    /// Both rows are written in the same transaction: either both become
    /// visible or neither does.
    pub async fn create_income(&self, cmd: NewIncome) -> ResultEngine<Income> {
        let income = Income::new(
            cmd.source,
            cmd.amount,
            cmd.occurred_on,
            cmd.status,
            Utc::now(),
        )?;

        let (created, tithe_id) = with_tx!(self, |db_tx| {
            let model = income::ActiveModel::from(&income).insert(&db_tx).await?;
            let tithe_id = if tithe::qualifies(income.source, income.amount) {
                let tithe = tithe::build(&income, income.created_at)?;
                expense::ActiveModel::from(&tithe).insert(&db_tx).await?;
                Some(tithe.id)
            } else {
                None
            };
            Ok((Income::try_from(model)?, tithe_id))
        })?;

        tracing::info!(
            income_id = %created.id,
            source = %created.source,
            amount = %created.amount,
            tithe_id = ?tithe_id,
            "income created"
        );
        Ok(created)
    }

    /// Applies a partial update to an income and resynchronizes its tithe.
    ///
    /// The tithe action is chosen from the previous and the new source:
    /// - ordinary -> `Adjustment`: the tithe is removed
    /// - `Adjustment` -> ordinary and ordinary -> ordinary: the tithe is
    ///   rewritten in place (same id), created if missing, or removed when
    ///   the amount drops to zero
    /// - `Adjustment` -> `Adjustment`: nothing happens
    pub async fn update_income(&self, income_id: Uuid, patch: IncomePatch) -> ResultEngine<Income> {
        if let Some(amount) = patch.amount {
            ensure_non_negative(amount)?;
        }

        let (updated, action) = with_tx!(self, |db_tx| {
            let current = Income::try_from(self.require_income(&db_tx, income_id).await?)?;
            ensure_revision("income", current.revision, patch.expected_revision)?;
            let expected_revision = current.revision;

            let now = Utc::now();
            let previous_source = current.source;
            let next = Income {
                source: patch.source.unwrap_or(current.source),
                amount: patch.amount.unwrap_or(current.amount),
                occurred_on: patch.occurred_on.unwrap_or(current.occurred_on),
                status: patch.status.unwrap_or(current.status),
                updated_at: now,
                revision: expected_revision + 1,
                ..current
            };

            self.swap_income(&db_tx, &next, expected_revision).await?;
            let action = self
                .reconcile_tithe(&db_tx, previous_source, &next, now)
                .await?;
            Ok((next, action))
        })?;

        tracing::info!(
            income_id = %updated.id,
            source = %updated.source,
            amount = %updated.amount,
            revision = updated.revision,
            tithe = ?action,
            "income updated"
        );
        Ok(updated)
    }

    /// Deletes an income together with its tithe, if any.
    pub async fn delete_income(&self, income_id: Uuid) -> ResultEngine<()> {
        let removed_tithes = with_tx!(self, |db_tx| {
            self.require_income(&db_tx, income_id).await?;
            let tithes = expense::Entity::delete_many()
                .filter(expense::Column::SourceIncomeId.eq(income_id.to_string()))
                .exec(&db_tx)
                .await?;
            income::Entity::delete_by_id(income_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(tithes.rows_affected)
        })?;

        tracing::info!(income_id = %income_id, removed_tithes, "income deleted");
        Ok(())
    }

    pub async fn income(&self, income_id: Uuid) -> ResultEngine<Income> {
        Income::try_from(self.require_income(&self.database, income_id).await?)
    }

    /// All incomes, most recent first.
    pub async fn list_incomes(&self) -> ResultEngine<Vec<Income>> {
        income::Entity::find()
            .order_by_desc(income::Column::OccurredOn)
            .order_by_desc(income::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Income::try_from)
            .collect()
    }

    /// The tithe owned by an income, if it has one.
    pub async fn tithe_for_income(&self, income_id: Uuid) -> ResultEngine<Option<Expense>> {
        self.require_income(&self.database, income_id).await?;
        self.tithes_of(&self.database, income_id)
            .await?
            .into_iter()
            .next()
            .map(Expense::try_from)
            .transpose()
    }

    /// Writes `next` only if the stored revision is still `expected_revision`.
    async fn swap_income(
        &self,
        db_tx: &DatabaseTransaction,
        next: &Income,
        expected_revision: i64,
    ) -> ResultEngine<()> {
        let changes = income::ActiveModel {
            source: ActiveValue::Set(next.source.as_str().to_string()),
            amount_minor: ActiveValue::Set(next.amount.cents()),
            occurred_on: ActiveValue::Set(next.occurred_on),
            status: ActiveValue::Set(next.status.as_str().to_string()),
            updated_at: ActiveValue::Set(next.updated_at),
            revision: ActiveValue::Set(next.revision),
            ..Default::default()
        };
        let result = income::Entity::update_many()
            .set(changes)
            .filter(income::Column::Id.eq(next.id.to_string()))
            .filter(income::Column::Revision.eq(expected_revision))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::Conflict(
                "income was modified concurrently".to_string(),
            ));
        }
        Ok(())
    }

    /// Bring the tithe of `income` back in line with the derivation rules.
    async fn reconcile_tithe(
        &self,
        db_tx: &DatabaseTransaction,
        previous_source: IncomeSource,
        income: &Income,
        now: DateTime<Utc>,
    ) -> ResultEngine<TitheAction> {
        let mut tithes = self.tithes_of(db_tx, income.id).await?;
        let current = if tithes.is_empty() {
            None
        } else {
            Some(tithes.remove(0))
        };
        // An income owns at most one tithe: drop duplicates left by older data.
        for stale in tithes {
            tracing::warn!(
                income_id = %income.id,
                expense_id = %stale.id,
                "removing duplicate tithe"
            );
            expense::Entity::delete_by_id(stale.id).exec(db_tx).await?;
        }

        let action = tithe::plan(previous_source, income.source, income.amount, current.is_some());
        tracing::debug!(
            income_id = %income.id,
            from = %previous_source,
            to = %income.source,
            ?action,
            "tithe plan"
        );

        match (action, current) {
            (TitheAction::Create, _) => {
                let tithe = tithe::build(income, now)?;
                expense::ActiveModel::from(&tithe).insert(db_tx).await?;
            }
            (TitheAction::Resync, Some(existing)) => {
                let resynced = expense::ActiveModel {
                    id: ActiveValue::Set(existing.id),
                    description: ActiveValue::Set(tithe::tithe_description(income.source)),
                    category: ActiveValue::Set(TITHE_CATEGORY.to_string()),
                    amount_minor: ActiveValue::Set(tithe::tithe_amount(income.amount).cents()),
                    occurred_on: ActiveValue::Set(income.occurred_on),
                    status: ActiveValue::Set(ExpenseStatus::Paid.as_str().to_string()),
                    updated_at: ActiveValue::Set(now),
                    revision: ActiveValue::Set(existing.revision + 1),
                    ..Default::default()
                };
                resynced.update(db_tx).await?;
            }
            (TitheAction::Remove, Some(existing)) => {
                expense::Entity::delete_by_id(existing.id)
                    .exec(db_tx)
                    .await?;
            }
            (TitheAction::Resync | TitheAction::Remove, None) | (TitheAction::Untouched, _) => {}
        }

        Ok(action)
    }
}
