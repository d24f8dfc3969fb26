use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Batch, BatchDetail, BatchFilter, BatchNew, BatchOwner, BatchStatus, BatchSummary, BatchUpdate,
    Earning, EngineError, Expense, ResultEngine, User, batches, earnings, expenses, users,
    util::contains_folded,
};

use super::{Engine, access::Access, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Create a batch owned by `user`. New batches start `IN_PROGRESS`.
    pub async fn new_batch(&self, user: &User, batch: BatchNew) -> ResultEngine<Batch> {
        let batch = Batch {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: normalize_required_name(&batch.name, "batch")?,
            status: BatchStatus::InProgress,
            start_date: batch.start_date,
            end_date: None,
            notes: normalize_optional_text(batch.notes.as_deref()),
            created_at: Utc::now(),
        };
        batches::ActiveModel::from(&batch)
            .insert(&self.database)
            .await?;
        Ok(batch)
    }

    /// Return a batch the user can read.
    pub async fn batch(&self, user: &User, batch_id: Uuid) -> ResultEngine<Batch> {
        let model = self
            .require_batch(&self.database, user, batch_id, Access::Read)
            .await?;
        Batch::try_from(model)
    }

    /// Return a batch with its owner and all of its entries.
    pub async fn batch_detail(&self, user: &User, batch_id: Uuid) -> ResultEngine<BatchDetail> {
        let model = self
            .require_batch(&self.database, user, batch_id, Access::Read)
            .await?;
        let owner = users::Entity::find_by_id(model.user_id.clone())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        let batch = Batch::try_from(model)?;
        let expenses = self.expenses_for_batch(&self.database, batch.id).await?;
        let earnings = self.earnings_for_batch(&self.database, batch.id).await?;

        Ok(BatchDetail {
            batch,
            owner: BatchOwner {
                name: owner.name,
                email: owner.email,
            },
            expenses,
            earnings,
        })
    }

    /// List the batches visible to `user`, each with its totals.
    ///
    /// Administrators see every batch; other users only their own.
    pub async fn list_batches(
        &self,
        user: &User,
        filter: &BatchFilter,
    ) -> ResultEngine<Vec<BatchSummary>> {
        let batches = self
            .visible_batches(&self.database, user, filter)
            .await?;
        self.summarize(&self.database, batches).await
    }

    /// Replace the mutable fields of a batch owned by `user`.
    pub async fn update_batch(
        &self,
        user: &User,
        batch_id: Uuid,
        update: BatchUpdate,
    ) -> ResultEngine<Batch> {
        update.validate_dates()?;
        let name = normalize_required_name(&update.name, "batch")?;
        let notes = normalize_optional_text(update.notes.as_deref());

        with_tx!(self, |db_tx| {
            self.require_batch(&db_tx, user, batch_id, Access::Write)
                .await?;
            let model = batches::ActiveModel {
                id: ActiveValue::Set(batch_id.to_string()),
                name: ActiveValue::Set(name),
                status: ActiveValue::Set(update.status.as_str().to_string()),
                start_date: ActiveValue::Set(update.start_date),
                end_date: ActiveValue::Set(update.end_date),
                notes: ActiveValue::Set(notes),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Batch::try_from(model)
        })
    }

    /// Delete a batch owned by `user` together with its expenses and
    /// earnings.
    pub async fn delete_batch(&self, user: &User, batch_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_batch(&db_tx, user, batch_id, Access::Write)
                .await?;

            let removed_expenses = expenses::Entity::delete_many()
                .filter(expenses::Column::BatchId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            let removed_earnings = earnings::Entity::delete_many()
                .filter(earnings::Column::BatchId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            batches::Entity::delete_by_id(model.id.clone())
                .exec(&db_tx)
                .await?;

            tracing::info!(
                batch_id = %model.id,
                removed_expenses,
                removed_earnings,
                "batch deleted"
            );
            Ok(())
        })
    }

    pub(super) async fn visible_batches<C: ConnectionTrait>(
        &self,
        db: &C,
        user: &User,
        filter: &BatchFilter,
    ) -> ResultEngine<Vec<Batch>> {
        let mut query = batches::Entity::find();
        if !user.is_admin() {
            query = query.filter(batches::Column::UserId.eq(user.id.to_string()));
        }
        if let Some(status) = filter.status {
            query = query.filter(batches::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_desc(batches::Column::StartDate)
            .order_by_desc(batches::Column::CreatedAt)
            .all(db)
            .await?;

        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        models
            .into_iter()
            .filter(|model| search.is_none_or(|needle| contains_folded(&model.name, needle)))
            .map(Batch::try_from)
            .collect()
    }

    /// Attach totals and category breakdowns to each batch, keeping order.
    pub(super) async fn summarize<C: ConnectionTrait>(
        &self,
        db: &C,
        batches: Vec<Batch>,
    ) -> ResultEngine<Vec<BatchSummary>> {
        if batches.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = batches.iter().map(|b| b.id.to_string()).collect();

        let mut expenses_by_batch: HashMap<Uuid, Vec<Expense>> = HashMap::new();
        for model in expenses::Entity::find()
            .filter(expenses::Column::BatchId.is_in(ids.clone()))
            .order_by_asc(expenses::Column::CreatedAt)
            .all(db)
            .await?
        {
            let expense = Expense::try_from(model)?;
            expenses_by_batch
                .entry(expense.batch_id)
                .or_default()
                .push(expense);
        }

        let mut earnings_by_batch: HashMap<Uuid, Vec<Earning>> = HashMap::new();
        for model in earnings::Entity::find()
            .filter(earnings::Column::BatchId.is_in(ids))
            .order_by_asc(earnings::Column::CreatedAt)
            .all(db)
            .await?
        {
            let earning = Earning::try_from(model)?;
            earnings_by_batch
                .entry(earning.batch_id)
                .or_default()
                .push(earning);
        }

        batches
            .into_iter()
            .map(|batch| {
                let expenses = expenses_by_batch.remove(&batch.id).unwrap_or_default();
                let earnings = earnings_by_batch.remove(&batch.id).unwrap_or_default();
                BatchSummary::new(batch, &expenses, &earnings)
            })
            .collect()
    }
}
