//! Expense records.
//!
//! An `Expense` is an outflow of funds. Expenses with a `source_income_id`
//! are tithe records: they are derived from an income and owned by it.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::{ensure_non_negative, parse_uuid};
use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    #[default]
    Open,
    Paid,
}

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for ExpenseStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "open" => Ok(Self::Open),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidInput(format!(
                "invalid expense status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub category: String,
    pub amount: MoneyCents,
    pub occurred_on: NaiveDate,
    pub is_business_cost: bool,
    pub status: ExpenseStatus,
    /// Income this expense was derived from. `Some` marks a tithe record.
    pub source_income_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: i64,
}

impl Expense {
    pub fn new(
        description: String,
        category: String,
        amount: MoneyCents,
        occurred_on: NaiveDate,
        is_business_cost: bool,
        status: ExpenseStatus,
        source_income_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        ensure_non_negative(amount)?;
        Ok(Self {
            id: Uuid::new_v4(),
            description,
            category,
            amount,
            occurred_on,
            is_business_cost,
            status,
            source_income_id,
            created_at: now,
            updated_at: now,
            revision: 0,
        })
    }

    /// Returns `true` for tithe records.
    pub fn is_derived(&self) -> bool {
        self.source_income_id.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub description: String,
    pub category: String,
    pub amount_minor: i64,
    pub occurred_on: Date,
    pub is_business_cost: bool,
    pub status: String,
    pub source_income_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub revision: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::income::Entity",
        from = "Column::SourceIncomeId",
        to = "super::income::Column::Id"
    )]
    Income,
}

impl Related<super::income::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Income.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            category: ActiveValue::Set(expense.category.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            occurred_on: ActiveValue::Set(expense.occurred_on),
            is_business_cost: ActiveValue::Set(expense.is_business_cost),
            status: ActiveValue::Set(expense.status.as_str().to_string()),
            source_income_id: ActiveValue::Set(
                expense.source_income_id.map(|id| id.to_string()),
            ),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
            revision: ActiveValue::Set(expense.revision),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            description: model.description,
            category: model.category,
            amount: MoneyCents::new(model.amount_minor),
            occurred_on: model.occurred_on,
            is_business_cost: model.is_business_cost,
            status: ExpenseStatus::try_from(model.status.as_str())?,
            source_income_id: model
                .source_income_id
                .as_deref()
                .map(|id| parse_uuid(id, "source income"))
                .transpose()?,
            created_at: model.created_at,
            updated_at: model.updated_at,
            revision: model.revision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_storage_strings() {
        assert_eq!(ExpenseStatus::try_from("open"), Ok(ExpenseStatus::Open));
        assert_eq!(ExpenseStatus::try_from("paid"), Ok(ExpenseStatus::Paid));
        assert_eq!(
            ExpenseStatus::try_from("em aberto"),
            Err(EngineError::InvalidInput(
                "invalid expense status: em aberto".to_string()
            ))
        );
    }

    #[test]
    fn corrupted_source_income_id_is_reported() {
        let now = Utc::now();
        let model = Model {
            id: Uuid::new_v4().to_string(),
            description: "Tithe - Uber".to_string(),
            category: "Tithe".to_string(),
            amount_minor: 2_000,
            occurred_on: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            is_business_cost: false,
            status: "paid".to_string(),
            source_income_id: Some("not-a-uuid".to_string()),
            created_at: now,
            updated_at: now,
            revision: 0,
        };
        assert_eq!(
            Expense::try_from(model),
            Err(EngineError::InvalidInput("invalid source income id".to_string()))
        );
    }
}
