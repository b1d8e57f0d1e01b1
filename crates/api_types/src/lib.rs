use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod income {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum IncomeSource {
        #[serde(rename = "iFood")]
        IFood,
        Uber,
        #[serde(rename = "99")]
        NinetyNine,
        Adjustment,
        Other,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum IncomeStatus {
        #[default]
        Pending,
        Forwarded,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub source: IncomeSource,
        /// Must be >= 0. `0` never produces a tithe.
        pub amount_minor: i64,
        pub occurred_on: NaiveDate,
        pub status: Option<IncomeStatus>,
    }

    /// Partial update. Missing fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IncomeUpdate {
        pub source: Option<IncomeSource>,
        pub amount_minor: Option<i64>,
        pub occurred_on: Option<NaiveDate>,
        pub status: Option<IncomeStatus>,
        /// Reject the update with `409` unless the stored revision matches.
        pub expected_revision: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: Uuid,
        pub source: IncomeSource,
        pub amount_minor: i64,
        pub occurred_on: NaiveDate,
        pub status: IncomeStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub revision: i64,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseStatus {
        #[default]
        Open,
        Paid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        pub category: String,
        pub amount_minor: i64,
        pub occurred_on: NaiveDate,
        #[serde(default)]
        pub is_business_cost: bool,
        pub status: Option<ExpenseStatus>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub description: Option<String>,
        pub category: Option<String>,
        pub amount_minor: Option<i64>,
        pub occurred_on: Option<NaiveDate>,
        pub is_business_cost: Option<bool>,
        pub status: Option<ExpenseStatus>,
        pub expected_revision: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub description: String,
        pub category: String,
        pub amount_minor: i64,
        pub occurred_on: NaiveDate,
        pub is_business_cost: bool,
        pub status: ExpenseStatus,
        /// Set on tithe records: the income they were derived from.
        pub source_income_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub revision: i64,
    }
}

pub mod bulk {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkIds {
        pub ids: Vec<Uuid>,
    }

    /// Bulk status change. `status` is checked against the collection in
    /// the path (`pending`/`forwarded` for incomes, `open`/`paid` for
    /// expenses).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkStatus {
        pub ids: Vec<Uuid>,
        pub status: String,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BulkResult {
        pub affected: u64,
        /// Tithe records skipped by the operation.
        pub protected: u64,
    }
}
