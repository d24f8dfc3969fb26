use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Earning, EarningInput, ResultEngine, User, earnings};

use super::{Engine, access::Access, with_tx};

impl Engine {
    /// Record an earning on a batch owned by `user`.
    pub async fn new_earning(
        &self,
        user: &User,
        batch_id: Uuid,
        input: EarningInput,
    ) -> ResultEngine<Earning> {
        let fields = input.validate()?;

        with_tx!(self, |db_tx| {
            self.require_batch(&db_tx, user, batch_id, Access::Write)
                .await?;
            let model = fields
                .into_new_model(batch_id, Utc::now())
                .insert(&db_tx)
                .await?;
            Earning::try_from(model)
        })
    }

    pub async fn earning(&self, user: &User, earning_id: Uuid) -> ResultEngine<Earning> {
        let model = self
            .require_earning(&self.database, user, earning_id, Access::Read)
            .await?;
        Earning::try_from(model)
    }

    pub async fn update_earning(
        &self,
        user: &User,
        earning_id: Uuid,
        input: EarningInput,
    ) -> ResultEngine<Earning> {
        let fields = input.validate()?;

        with_tx!(self, |db_tx| {
            self.require_earning(&db_tx, user, earning_id, Access::Write)
                .await?;
            let model = fields
                .into_update_model(earning_id)
                .update(&db_tx)
                .await?;
            Earning::try_from(model)
        })
    }

    pub async fn delete_earning(&self, user: &User, earning_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_earning(&db_tx, user, earning_id, Access::Write)
                .await?;
            earnings::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub(super) async fn earnings_for_batch<C: ConnectionTrait>(
        &self,
        db: &C,
        batch_id: Uuid,
    ) -> ResultEngine<Vec<Earning>> {
        earnings::Entity::find()
            .filter(earnings::Column::BatchId.eq(batch_id.to_string()))
            .order_by_asc(earnings::Column::CreatedAt)
            .all(db)
            .await?
            .into_iter()
            .map(Earning::try_from)
            .collect()
    }
}
