//! Batches are production cycles. Each batch belongs to exactly one user and
//! collects the expenses and earnings recorded during the cycle.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Earning, Expense, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    #[default]
    InProgress,
    Sold,
    Completed,
    Cancelled,
}

impl BatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Sold => "SOLD",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl TryFrom<&str> for BatchStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "IN_PROGRESS" => Ok(Self::InProgress),
            "SOLD" => Ok(Self::Sold),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidName(format!(
                "invalid batch status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub status: BatchStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when a batch is created.
#[derive(Clone, Debug)]
pub struct BatchNew {
    pub name: String,
    pub start_date: NaiveDate,
    pub notes: Option<String>,
}

/// Full replacement of a batch's mutable fields.
#[derive(Clone, Debug)]
pub struct BatchUpdate {
    pub name: String,
    pub status: BatchStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl BatchUpdate {
    pub(crate) fn validate_dates(&self) -> ResultEngine<()> {
        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err(EngineError::InvalidName(
                "end_date must not precede start_date".to_string(),
            ));
        }
        Ok(())
    }
}

/// Filters for batch listings.
#[derive(Clone, Debug, Default)]
pub struct BatchFilter {
    pub status: Option<BatchStatus>,
    /// Case-insensitive substring matched against the batch name.
    pub search: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOwner {
    pub name: String,
    pub email: String,
}

/// A batch together with its owner and every recorded entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchDetail {
    pub batch: Batch,
    pub owner: BatchOwner,
    pub expenses: Vec<Expense>,
    pub earnings: Vec<Earning>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub status: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::earnings::Entity")]
    Earnings,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::earnings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Earnings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Batch> for ActiveModel {
    fn from(batch: &Batch) -> Self {
        Self {
            id: ActiveValue::Set(batch.id.to_string()),
            user_id: ActiveValue::Set(batch.user_id.to_string()),
            name: ActiveValue::Set(batch.name.clone()),
            status: ActiveValue::Set(batch.status.as_str().to_string()),
            start_date: ActiveValue::Set(batch.start_date),
            end_date: ActiveValue::Set(batch.end_date),
            notes: ActiveValue::Set(batch.notes.clone()),
            created_at: ActiveValue::Set(batch.created_at),
        }
    }
}

impl TryFrom<Model> for Batch {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "batch")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            name: model.name,
            status: BatchStatus::try_from(model.status.as_str())?,
            start_date: model.start_date,
            end_date: model.end_date,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}
