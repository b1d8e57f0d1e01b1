//! Income records.
//!
//! An `Income` is an inflow of funds from a named source. Unless the source
//! is [`IncomeSource::Adjustment`], a positive income owns exactly one tithe
//! record (see [`crate::tithe`]).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::{ensure_non_negative, parse_uuid};
use crate::{EngineError, MoneyCents, ResultEngine};

/// Where an income came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeSource {
    #[serde(rename = "iFood")]
    IFood,
    #[serde(rename = "Uber")]
    Uber,
    #[serde(rename = "99")]
    NinetyNine,
    /// Manual correction. Never produces a tithe.
    #[serde(rename = "Adjustment")]
    Adjustment,
    #[serde(rename = "Other")]
    Other,
}

impl IncomeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IFood => "iFood",
            Self::Uber => "Uber",
            Self::NinetyNine => "99",
            Self::Adjustment => "Adjustment",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IncomeSource {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "iFood" => Ok(Self::IFood),
            "Uber" => Ok(Self::Uber),
            "99" => Ok(Self::NinetyNine),
            "Adjustment" => Ok(Self::Adjustment),
            "Other" => Ok(Self::Other),
            other => Err(EngineError::InvalidInput(format!(
                "invalid income source: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStatus {
    #[default]
    Pending,
    Forwarded,
}

impl IncomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Forwarded => "forwarded",
        }
    }
}

impl TryFrom<&str> for IncomeStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "forwarded" => Ok(Self::Forwarded),
            other => Err(EngineError::InvalidInput(format!(
                "invalid income status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub source: IncomeSource,
    pub amount: MoneyCents,
    pub occurred_on: NaiveDate,
    pub status: IncomeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Write counter, bumped on every update. Used for compare-and-swap.
    pub revision: i64,
}

impl Income {
    pub fn new(
        source: IncomeSource,
        amount: MoneyCents,
        occurred_on: NaiveDate,
        status: IncomeStatus,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        ensure_non_negative(amount)?;
        Ok(Self {
            id: Uuid::new_v4(),
            source,
            amount,
            occurred_on,
            status,
            created_at: now,
            updated_at: now,
            revision: 0,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub source: String,
    pub amount_minor: i64,
    pub occurred_on: Date,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub revision: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Income> for ActiveModel {
    fn from(income: &Income) -> Self {
        Self {
            id: ActiveValue::Set(income.id.to_string()),
            source: ActiveValue::Set(income.source.as_str().to_string()),
            amount_minor: ActiveValue::Set(income.amount.cents()),
            occurred_on: ActiveValue::Set(income.occurred_on),
            status: ActiveValue::Set(income.status.as_str().to_string()),
            created_at: ActiveValue::Set(income.created_at),
            updated_at: ActiveValue::Set(income.updated_at),
            revision: ActiveValue::Set(income.revision),
        }
    }
}

impl TryFrom<Model> for Income {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "income")?,
            source: IncomeSource::try_from(model.source.as_str())?,
            amount: MoneyCents::new(model.amount_minor),
            occurred_on: model.occurred_on,
            status: IncomeStatus::try_from(model.status.as_str())?,
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
    fn source_round_trips_through_storage_strings() {
        for source in [
            IncomeSource::IFood,
            IncomeSource::Uber,
            IncomeSource::NinetyNine,
            IncomeSource::Adjustment,
            IncomeSource::Other,
        ] {
            assert_eq!(IncomeSource::try_from(source.as_str()), Ok(source));
        }
    }

    #[test]
    fn unknown_source_is_invalid_input() {
        assert_eq!(
            IncomeSource::try_from("Lyft"),
            Err(EngineError::InvalidInput(
                "invalid income source: Lyft".to_string()
            ))
        );
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(IncomeStatus::default(), IncomeStatus::Pending);
        assert_eq!(IncomeStatus::try_from("forwarded"), Ok(IncomeStatus::Forwarded));
        assert!(IncomeStatus::try_from("repassado").is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let err = Income::new(
            IncomeSource::Uber,
            MoneyCents::new(-1),
            date,
            IncomeStatus::Pending,
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidInput("amount must be >= 0".to_string())
        );
    }
}
