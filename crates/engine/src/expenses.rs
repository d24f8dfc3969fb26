//! Expenses recorded against a batch.
//!
//! `total` is denormalized: it is stored next to `quantity` and
//! `cost_per_unit`, and the engine recomputes it from those two on every
//! create and update. Client-provided totals are never trusted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    categories::{self, EXPENSE_PRESETS},
    money::line_total,
    util::{normalize_display, parse_decimal, parse_uuid, store_decimal},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub item_name: String,
    pub quantity: Decimal,
    pub cost_per_unit: Decimal,
    pub total: Decimal,
    pub category: String,
    pub is_recurring: bool,
    pub transaction_date: Option<NaiveDate>,
    /// Week of the cycle a vaccine was given (vaccine entries only).
    pub week_of_giving: Option<i32>,
    /// Dosage unit (medication entries only).
    pub unit_label: Option<String>,
    /// Stored receipt path as returned by the upload endpoint.
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Expense form fields, used for both create and full-replace update.
#[derive(Clone, Debug, Default)]
pub struct ExpenseInput {
    pub item_name: String,
    pub quantity: Decimal,
    pub cost_per_unit: Decimal,
    /// A preset code or [`categories::OTHER`].
    pub category: String,
    pub custom_category: Option<String>,
    pub is_recurring: bool,
    pub transaction_date: Option<NaiveDate>,
    pub week_of_giving: Option<i32>,
    pub unit_label: Option<String>,
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
}

/// Validated expense columns, ready to be written.
#[derive(Clone, Debug)]
pub(crate) struct ExpenseFields {
    item_name: String,
    quantity: Decimal,
    cost_per_unit: Decimal,
    total: Decimal,
    category: String,
    is_recurring: bool,
    transaction_date: Option<NaiveDate>,
    week_of_giving: Option<i32>,
    unit_label: Option<String>,
    attachment: Option<String>,
    attachment_name: Option<String>,
}

impl ExpenseInput {
    pub(crate) fn validate(self) -> ResultEngine<ExpenseFields> {
        let item_name = normalize_display(&self.item_name)
            .ok_or_else(|| EngineError::InvalidName("item name must not be empty".to_string()))?;
        if self.quantity <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount("quantity must be > 0".to_string()));
        }
        if self.cost_per_unit < Decimal::ZERO {
            return Err(EngineError::InvalidAmount(
                "cost_per_unit must be >= 0".to_string(),
            ));
        }
        let category = categories::resolve_category(
            &EXPENSE_PRESETS,
            &self.category,
            self.custom_category.as_deref(),
        )?;

        let week_of_giving = match self.week_of_giving {
            Some(_) if category != categories::VACCINES => {
                return Err(EngineError::InvalidName(
                    "week_of_giving is only allowed for VACCINES".to_string(),
                ));
            }
            Some(week) if week < 1 => {
                return Err(EngineError::InvalidAmount(
                    "week_of_giving must be >= 1".to_string(),
                ));
            }
            other => other,
        };

        let unit_label = self.unit_label.as_deref().and_then(normalize_display);
        if unit_label.is_some() && category != categories::MEDICATION {
            return Err(EngineError::InvalidName(
                "unit_label is only allowed for MEDICATION".to_string(),
            ));
        }

        let total = line_total(self.quantity, self.cost_per_unit)?;
        let attachment = self.attachment.as_deref().and_then(normalize_display);
        let attachment_name = match &attachment {
            Some(_) => self.attachment_name.as_deref().and_then(normalize_display),
            None => None,
        };

        Ok(ExpenseFields {
            item_name,
            quantity: self.quantity,
            cost_per_unit: self.cost_per_unit,
            total,
            category,
            is_recurring: self.is_recurring,
            transaction_date: self.transaction_date,
            week_of_giving,
            unit_label,
            attachment,
            attachment_name,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub batch_id: String,
    pub item_name: String,
    pub quantity: String,
    pub cost_per_unit: String,
    pub total: String,
    pub category: String,
    pub is_recurring: bool,
    pub transaction_date: Option<Date>,
    pub week_of_giving: Option<i32>,
    pub unit_label: Option<String>,
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batches::Entity",
        from = "Column::BatchId",
        to = "super::batches::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Batch,
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ExpenseFields {
    /// Column values for a new row.
    pub(crate) fn into_new_model(self, batch_id: Uuid, created_at: DateTime<Utc>) -> ActiveModel {
        let mut model = self.into_update_model(Uuid::new_v4());
        model.batch_id = ActiveValue::Set(batch_id.to_string());
        model.created_at = ActiveValue::Set(created_at);
        model
    }

    /// Column values replacing every mutable field of an existing row.
    pub(crate) fn into_update_model(self, id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            item_name: ActiveValue::Set(self.item_name),
            quantity: ActiveValue::Set(store_decimal(self.quantity)),
            cost_per_unit: ActiveValue::Set(store_decimal(self.cost_per_unit)),
            total: ActiveValue::Set(store_decimal(self.total)),
            category: ActiveValue::Set(self.category),
            is_recurring: ActiveValue::Set(self.is_recurring),
            transaction_date: ActiveValue::Set(self.transaction_date),
            week_of_giving: ActiveValue::Set(self.week_of_giving),
            unit_label: ActiveValue::Set(self.unit_label),
            attachment: ActiveValue::Set(self.attachment),
            attachment_name: ActiveValue::Set(self.attachment_name),
            ..Default::default()
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            batch_id: parse_uuid(&model.batch_id, "batch")?,
            item_name: model.item_name,
            quantity: parse_decimal(&model.quantity, "quantity")?,
            cost_per_unit: parse_decimal(&model.cost_per_unit, "cost_per_unit")?,
            total: parse_decimal(&model.total, "total")?,
            category: model.category,
            is_recurring: model.is_recurring,
            transaction_date: model.transaction_date,
            week_of_giving: model.week_of_giving,
            unit_label: model.unit_label,
            attachment: model.attachment,
            attachment_name: model.attachment_name,
            created_at: model.created_at,
        })
    }
}
