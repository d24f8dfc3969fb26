//! Bookkeeping engine for poultry batches.
//!
//! The engine owns the database models (users, batches, expenses, earnings),
//! enforces ownership on every read and write, and derives the financial
//! summaries shown by clients.

pub use analytics::{BatchSummary, CategoryTotal, Dashboard, Entry, TimeRange, Totals};
pub use batches::{Batch, BatchDetail, BatchFilter, BatchNew, BatchOwner, BatchStatus, BatchUpdate};
pub use earnings::{Earning, EarningInput};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseInput};
pub use ops::{Engine, EngineBuilder, MIN_PASSWORD_LENGTH};
pub use users::{User, UserRole};

pub mod analytics;
mod batches;
pub mod categories;
mod earnings;
mod error;
mod expenses;
pub mod money;
mod ops;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
