use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Expense, ExpenseInput, ResultEngine, User, expenses};

use super::{Engine, access::Access, with_tx};

impl Engine {
    /// Record an expense on a batch owned by `user`.
    ///
    /// The stored total is always `quantity × cost_per_unit`.
    pub async fn new_expense(
        &self,
        user: &User,
        batch_id: Uuid,
        input: ExpenseInput,
    ) -> ResultEngine<Expense> {
        let fields = input.validate()?;

        with_tx!(self, |db_tx| {
            self.require_batch(&db_tx, user, batch_id, Access::Write)
                .await?;
            let model = fields
                .into_new_model(batch_id, Utc::now())
                .insert(&db_tx)
                .await?;
            Expense::try_from(model)
        })
    }

    pub async fn expense(&self, user: &User, expense_id: Uuid) -> ResultEngine<Expense> {
        let model = self
            .require_expense(&self.database, user, expense_id, Access::Read)
            .await?;
        Expense::try_from(model)
    }

    /// Replace every editable field of an expense. The batch link and the
    /// creation time are preserved.
    pub async fn update_expense(
        &self,
        user: &User,
        expense_id: Uuid,
        input: ExpenseInput,
    ) -> ResultEngine<Expense> {
        let fields = input.validate()?;

        with_tx!(self, |db_tx| {
            self.require_expense(&db_tx, user, expense_id, Access::Write)
                .await?;
            let model = fields
                .into_update_model(expense_id)
                .update(&db_tx)
                .await?;
            Expense::try_from(model)
        })
    }

    pub async fn delete_expense(&self, user: &User, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_expense(&db_tx, user, expense_id, Access::Write)
                .await?;
            expenses::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Expenses of one batch, oldest first. Callers check access.
    pub(super) async fn expenses_for_batch<C: ConnectionTrait>(
        &self,
        db: &C,
        batch_id: Uuid,
    ) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::BatchId.eq(batch_id.to_string()))
            .order_by_asc(expenses::Column::CreatedAt)
            .all(db)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }
}
