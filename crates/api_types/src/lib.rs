use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plain `{message}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum Role {
        Admin,
        User,
    }

    /// Registration form. Every field is required; they are optional here so
    /// the server can answer with a uniform "missing fields" error.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Register {
        pub email: Option<String>,
        pub password: Option<String>,
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub email: String,
        pub name: String,
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Registered {
        pub user: UserView,
        pub message: String,
    }
}

pub mod batch {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum BatchStatus {
        InProgress,
        Sold,
        Completed,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchNew {
        pub name: String,
        pub start_date: NaiveDate,
        pub notes: Option<String>,
    }

    /// Full replacement of a batch's mutable fields.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchUpdate {
        pub name: String,
        pub status: BatchStatus,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    /// Query string of `GET /batches`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BatchList {
        /// A status, or `all` (the default).
        pub status: Option<String>,
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub name: String,
        pub status: BatchStatus,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchOwner {
        pub name: String,
        pub email: String,
    }

    /// A batch with everything recorded on it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchDetail {
        pub batch: BatchView,
        pub owner: BatchOwner,
        pub expenses: Vec<crate::expense::ExpenseView>,
        pub earnings: Vec<crate::earning::EarningView>,
        pub summary: crate::analytics::Totals,
    }
}

pub mod expense {
    use super::*;

    /// Editable expense fields. `total` is not accepted: the server derives
    /// it from `quantity` and `cost_per_unit`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseFields {
        pub item_name: String,
        pub quantity: Decimal,
        pub cost_per_unit: Decimal,
        /// A preset code or `OTHER`.
        pub category: String,
        /// Required when `category` is `OTHER`.
        pub custom_category: Option<String>,
        #[serde(default)]
        pub is_recurring: bool,
        pub transaction_date: Option<NaiveDate>,
        /// `VACCINES` only.
        pub week_of_giving: Option<i32>,
        /// `MEDICATION` only.
        pub unit_label: Option<String>,
        /// Path returned by `POST /upload`.
        pub attachment: Option<String>,
        pub attachment_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub batch_id: Uuid,
        #[serde(flatten)]
        pub fields: ExpenseFields,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub batch_id: Uuid,
        pub item_name: String,
        pub quantity: Decimal,
        pub cost_per_unit: Decimal,
        pub total: Decimal,
        pub category: String,
        pub is_recurring: bool,
        pub transaction_date: Option<NaiveDate>,
        pub week_of_giving: Option<i32>,
        pub unit_label: Option<String>,
        pub attachment: Option<String>,
        pub attachment_name: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod earning {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EarningFields {
        pub item_name: String,
        pub quantity: Decimal,
        pub amount_per_unit: Decimal,
        /// A preset code or `OTHER`.
        pub category: String,
        pub custom_category: Option<String>,
        pub transaction_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EarningNew {
        pub batch_id: Uuid,
        #[serde(flatten)]
        pub fields: EarningFields,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EarningView {
        pub id: Uuid,
        pub batch_id: Uuid,
        pub item_name: String,
        pub quantity: Decimal,
        pub amount_per_unit: Decimal,
        pub total: Decimal,
        pub category: String,
        pub transaction_date: Option<NaiveDate>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod items {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ItemQuery {
        pub q: Option<String>,
    }
}

pub mod upload {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Uploaded {
        /// Public path of the stored file, `/uploads/<stored name>`.
        pub file_path: String,
        /// Name of the file as sent by the client.
        pub file_name: String,
    }
}

pub mod analytics {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RangeQuery {
        /// `week`, `month`, `quarter` or `year`. Defaults to `month`.
        pub range: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Totals {
        pub total_expenses: Decimal,
        pub total_earnings: Decimal,
        pub profit_loss: Decimal,
        /// Percentage rounded to two decimals, `null` without expenses.
        pub roi: Option<Decimal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        pub total: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BatchSummary {
        pub batch: crate::batch::BatchView,
        pub totals: Totals,
        pub expenses_by_category: Vec<CategoryTotal>,
        pub earnings_by_category: Vec<CategoryTotal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Dashboard {
        pub range: String,
        pub since: NaiveDate,
        pub until: NaiveDate,
        pub currency: String,
        pub batches: Vec<BatchSummary>,
        pub overall: Totals,
        pub expenses_by_category: Vec<CategoryTotal>,
        pub earnings_by_category: Vec<CategoryTotal>,
    }
}
