//! Tithe ledger engine.
//!
//! Keeps incomes, expenses and the tithe records derived from incomes
//! consistent. All writes go through [`Engine`], which runs each operation
//! inside a single database transaction.

pub use commands::{
    BulkOutcome, ExpensePatch, IncomePatch, NewExpense, NewIncome, RecordKind, RecordStatus,
};
pub use error::EngineError;
pub use expense::{Expense, ExpenseStatus};
pub use income::{Income, IncomeSource, IncomeStatus};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};

mod commands;
mod error;
pub mod expense;
pub mod income;
mod money;
mod ops;
pub mod tithe;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
