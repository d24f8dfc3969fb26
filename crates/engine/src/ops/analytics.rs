use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Batch, BatchFilter, BatchSummary, Dashboard, ResultEngine, TimeRange, User};

use super::{Engine, access::Access};

impl Engine {
    /// Totals and category breakdowns of a single batch.
    pub async fn batch_summary(&self, user: &User, batch_id: Uuid) -> ResultEngine<BatchSummary> {
        let model = self
            .require_batch(&self.database, user, batch_id, Access::Read)
            .await?;
        let batch = Batch::try_from(model)?;
        let expenses = self.expenses_for_batch(&self.database, batch.id).await?;
        let earnings = self.earnings_for_batch(&self.database, batch.id).await?;
        BatchSummary::new(batch, &expenses, &earnings)
    }

    /// Dashboard over every visible batch active in `range`, ending `today`.
    pub async fn dashboard(
        &self,
        user: &User,
        range: TimeRange,
        today: NaiveDate,
    ) -> ResultEngine<Dashboard> {
        let batches = self
            .visible_batches(&self.database, user, &BatchFilter::default())
            .await?;
        let summaries = self.summarize(&self.database, batches).await?;
        Dashboard::new(range, today, summaries)
    }
}
