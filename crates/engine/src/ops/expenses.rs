use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::tithe::{self, TITHE_CATEGORY};
use crate::util::{ensure_non_negative, ensure_revision, normalize_required_text};
use crate::{EngineError, Expense, ExpensePatch, NewExpense, ResultEngine, expense};

use super::{Engine, with_tx};

fn ensure_not_reserved(category: &str) -> ResultEngine<()> {
    if category.eq_ignore_ascii_case(TITHE_CATEGORY) {
        return Err(EngineError::InvalidInput(format!(
            "category \"{TITHE_CATEGORY}\" is reserved for derived records"
        )));
    }
    Ok(())
}

impl Engine {
    /// Creates an ordinary expense.
    ///
    /// Expenses created here never carry a `source_income_id`: tithe records
    /// only come into existence through income writes.
    pub async fn create_expense(&self, cmd: NewExpense) -> ResultEngine<Expense> {
        let description = normalize_required_text(&cmd.description, "description")?;
        let category = normalize_required_text(&cmd.category, "category")?;
        ensure_not_reserved(&category)?;

        let expense = Expense::new(
            description,
            category,
            cmd.amount,
            cmd.occurred_on,
            cmd.is_business_cost,
            cmd.status,
            None,
            Utc::now(),
        )?;

        let created = with_tx!(self, |db_tx| {
            let model = expense::ActiveModel::from(&expense).insert(&db_tx).await?;
            Expense::try_from(model)
        })?;

        tracing::info!(
            expense_id = %created.id,
            category = %created.category,
            amount = %created.amount,
            "expense created"
        );
        Ok(created)
    }

    /// Applies a partial update to an expense.
    ///
    /// Tithe records can be edited unless the engine was built with
    /// `lock_tithe_edits`; their link to the income is never changed here.
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        patch: ExpensePatch,
    ) -> ResultEngine<Expense> {
        if let Some(amount) = patch.amount {
            ensure_non_negative(amount)?;
        }
        let description = patch
            .description
            .as_deref()
            .map(|value| normalize_required_text(value, "description"))
            .transpose()?;
        let category = patch
            .category
            .as_deref()
            .map(|value| normalize_required_text(value, "category"))
            .transpose()?;

        let updated = with_tx!(self, |db_tx| {
            let model = self.require_expense(&db_tx, expense_id).await?;
            let derived = tithe::is_protected(&model);
            if derived && self.lock_tithe_edits {
                tracing::warn!(expense_id = %expense_id, "rejected edit of tithe record");
                return Err(EngineError::ProtectedRecord(
                    "tithe records are managed by their income".to_string(),
                ));
            }
            if !derived {
                if let Some(category) = category.as_deref() {
                    ensure_not_reserved(category)?;
                }
            }

            let current = Expense::try_from(model)?;
            ensure_revision("expense", current.revision, patch.expected_revision)?;
            let expected_revision = current.revision;

            let next = Expense {
                description: description.clone().unwrap_or(current.description),
                category: category.clone().unwrap_or(current.category),
                amount: patch.amount.unwrap_or(current.amount),
                occurred_on: patch.occurred_on.unwrap_or(current.occurred_on),
                is_business_cost: patch.is_business_cost.unwrap_or(current.is_business_cost),
                status: patch.status.unwrap_or(current.status),
                updated_at: Utc::now(),
                revision: expected_revision + 1,
                ..current
            };

            let changes = expense::ActiveModel {
                description: ActiveValue::Set(next.description.clone()),
                category: ActiveValue::Set(next.category.clone()),
                amount_minor: ActiveValue::Set(next.amount.cents()),
                occurred_on: ActiveValue::Set(next.occurred_on),
                is_business_cost: ActiveValue::Set(next.is_business_cost),
                status: ActiveValue::Set(next.status.as_str().to_string()),
                updated_at: ActiveValue::Set(next.updated_at),
                revision: ActiveValue::Set(next.revision),
                ..Default::default()
            };
            let result = expense::Entity::update_many()
                .set(changes)
                .filter(expense::Column::Id.eq(expense_id.to_string()))
                .filter(expense::Column::Revision.eq(expected_revision))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::Conflict(
                    "expense was modified concurrently".to_string(),
                ));
            }
            Ok(next)
        })?;

        tracing::info!(
            expense_id = %updated.id,
            derived = updated.is_derived(),
            revision = updated.revision,
            "expense updated"
        );
        Ok(updated)
    }

    /// Deletes an ordinary expense. Tithe records are refused.
    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_expense(&db_tx, expense_id).await?;
            if tithe::is_protected(&model) {
                tracing::warn!(expense_id = %expense_id, "rejected delete of tithe record");
                return Err(EngineError::ProtectedRecord(
                    "tithe records are removed with their income".to_string(),
                ));
            }
            expense::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })?;

        tracing::info!(expense_id = %expense_id, "expense deleted");
        Ok(())
    }

    pub async fn expense(&self, expense_id: Uuid) -> ResultEngine<Expense> {
        Expense::try_from(self.require_expense(&self.database, expense_id).await?)
    }

    /// All expenses, tithe records included, most recent first.
    pub async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        expense::Entity::find()
            .order_by_desc(expense::Column::OccurredOn)
            .order_by_desc(expense::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }
}
