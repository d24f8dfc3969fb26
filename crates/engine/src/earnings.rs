//! Earnings recorded against a batch.
//!
//! Like expenses, `total` is stored and recomputed as
//! `quantity × amount_per_unit` whenever the row is written.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    categories::{self, EARNING_PRESETS},
    money::line_total,
    util::{normalize_display, parse_decimal, parse_uuid, store_decimal},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earning {
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

#[derive(Clone, Debug, Default)]
pub struct EarningInput {
    pub item_name: String,
    pub quantity: Decimal,
    pub amount_per_unit: Decimal,
    pub category: String,
    pub custom_category: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub(crate) struct EarningFields {
    item_name: String,
    quantity: Decimal,
    amount_per_unit: Decimal,
    total: Decimal,
    category: String,
    transaction_date: Option<NaiveDate>,
}

impl EarningInput {
    pub(crate) fn validate(self) -> ResultEngine<EarningFields> {
        let item_name = normalize_display(&self.item_name)
            .ok_or_else(|| EngineError::InvalidName("item name must not be empty".to_string()))?;
        if self.quantity <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount("quantity must be > 0".to_string()));
        }
        if self.amount_per_unit < Decimal::ZERO {
            return Err(EngineError::InvalidAmount(
                "amount_per_unit must be >= 0".to_string(),
            ));
        }
        let category = categories::resolve_category(
            &EARNING_PRESETS,
            &self.category,
            self.custom_category.as_deref(),
        )?;
        let total = line_total(self.quantity, self.amount_per_unit)?;

        Ok(EarningFields {
            item_name,
            quantity: self.quantity,
            amount_per_unit: self.amount_per_unit,
            total,
            category,
            transaction_date: self.transaction_date,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "earnings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub batch_id: String,
    pub item_name: String,
    pub quantity: String,
    pub amount_per_unit: String,
    pub total: String,
    pub category: String,
    pub transaction_date: Option<Date>,
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

impl EarningFields {
    pub(crate) fn into_new_model(self, batch_id: Uuid, created_at: DateTime<Utc>) -> ActiveModel {
        let mut model = self.into_update_model(Uuid::new_v4());
        model.batch_id = ActiveValue::Set(batch_id.to_string());
        model.created_at = ActiveValue::Set(created_at);
        model
    }

    pub(crate) fn into_update_model(self, id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            item_name: ActiveValue::Set(self.item_name),
            quantity: ActiveValue::Set(store_decimal(self.quantity)),
            amount_per_unit: ActiveValue::Set(store_decimal(self.amount_per_unit)),
            total: ActiveValue::Set(store_decimal(self.total)),
            category: ActiveValue::Set(self.category),
            transaction_date: ActiveValue::Set(self.transaction_date),
            ..Default::default()
        }
    }
}

impl TryFrom<Model> for Earning {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "earning")?,
            batch_id: parse_uuid(&model.batch_id, "batch")?,
            item_name: model.item_name,
            quantity: parse_decimal(&model.quantity, "quantity")?,
            amount_per_unit: parse_decimal(&model.amount_per_unit, "amount_per_unit")?,
            total: parse_decimal(&model.total, "total")?,
            category: model.category,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
        })
    }
}
