//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update/bulk),
//! keeping call sites readable and avoiding long argument lists.

use chrono::NaiveDate;

use crate::{EngineError, ExpenseStatus, IncomeSource, IncomeStatus, MoneyCents};

/// Create an income.
#[derive(Clone, Debug)]
pub struct NewIncome {
    pub source: IncomeSource,
    pub amount: MoneyCents,
    pub occurred_on: NaiveDate,
    pub status: IncomeStatus,
}

impl NewIncome {
    #[must_use]
    pub fn new(source: IncomeSource, amount: MoneyCents, occurred_on: NaiveDate) -> Self {
        Self {
            source,
            amount,
            occurred_on,
            status: IncomeStatus::default(),
        }
    }

    #[must_use]
    pub fn status(mut self, status: IncomeStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update of an income. `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct IncomePatch {
    pub source: Option<IncomeSource>,
    pub amount: Option<MoneyCents>,
    pub occurred_on: Option<NaiveDate>,
    pub status: Option<IncomeStatus>,
    /// Reject the update unless the stored revision matches.
    pub expected_revision: Option<i64>,
}

impl IncomePatch {
    #[must_use]
    pub fn source(mut self, source: IncomeSource) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn occurred_on(mut self, occurred_on: NaiveDate) -> Self {
        self.occurred_on = Some(occurred_on);
        self
    }

    #[must_use]
    pub fn status(mut self, status: IncomeStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn expected_revision(mut self, revision: i64) -> Self {
        self.expected_revision = Some(revision);
        self
    }
}

/// Create an ordinary expense.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub description: String,
    pub category: String,
    pub amount: MoneyCents,
    pub occurred_on: NaiveDate,
    pub is_business_cost: bool,
    pub status: ExpenseStatus,
}

impl NewExpense {
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        category: impl Into<String>,
        amount: MoneyCents,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
            amount,
            occurred_on,
            is_business_cost: false,
            status: ExpenseStatus::default(),
        }
    }

    #[must_use]
    pub fn business_cost(mut self, is_business_cost: bool) -> Self {
        self.is_business_cost = is_business_cost;
        self
    }

    #[must_use]
    pub fn status(mut self, status: ExpenseStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update of an expense. `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<MoneyCents>,
    pub occurred_on: Option<NaiveDate>,
    pub is_business_cost: Option<bool>,
    pub status: Option<ExpenseStatus>,
    pub expected_revision: Option<i64>,
}

impl ExpensePatch {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn occurred_on(mut self, occurred_on: NaiveDate) -> Self {
        self.occurred_on = Some(occurred_on);
        self
    }

    #[must_use]
    pub fn business_cost(mut self, is_business_cost: bool) -> Self {
        self.is_business_cost = Some(is_business_cost);
        self
    }

    #[must_use]
    pub fn status(mut self, status: ExpenseStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn expected_revision(mut self, revision: i64) -> Self {
        self.expected_revision = Some(revision);
        self
    }
}

/// Which collection a bulk operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Status value for a bulk status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordStatus {
    Income(IncomeStatus),
    Expense(ExpenseStatus),
}

impl RecordStatus {
    pub fn kind(self) -> RecordKind {
        match self {
            Self::Income(_) => RecordKind::Income,
            Self::Expense(_) => RecordKind::Expense,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income(status) => status.as_str(),
            Self::Expense(status) => status.as_str(),
        }
    }
}

impl TryFrom<&str> for RecordStatus {
    type Error = EngineError;

    /// Status strings are unique across kinds, so the kind follows from the value.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if let Ok(status) = IncomeStatus::try_from(value) {
            return Ok(Self::Income(status));
        }
        ExpenseStatus::try_from(value)
            .map(Self::Expense)
            .map_err(|_| EngineError::InvalidInput(format!("invalid status: {value}")))
    }
}

/// Result of a bulk operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Rows actually deleted or updated.
    pub affected: u64,
    /// Requested ids skipped because they reference tithe records.
    pub protected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_status_infers_kind_from_value() {
        assert_eq!(
            RecordStatus::try_from("forwarded").map(RecordStatus::kind),
            Ok(RecordKind::Income)
        );
        assert_eq!(
            RecordStatus::try_from("paid"),
            Ok(RecordStatus::Expense(ExpenseStatus::Paid))
        );
        assert_eq!(
            RecordStatus::try_from("done"),
            Err(EngineError::InvalidInput("invalid status: done".to_string()))
        );
    }
}
