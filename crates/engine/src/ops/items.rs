use std::collections::HashSet;

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{ResultEngine, User, batches, earnings, expenses, util::contains_folded};

use super::Engine;

impl Engine {
    /// Item names the user already used, for autocomplete.
    ///
    /// Expense names come first, then earning names, each source sorted
    /// alphabetically. A name seen twice is kept once. With a non-blank
    /// `query`, only names containing it (case-insensitively) are returned.
    pub async fn item_names(&self, user: &User, query: Option<&str>) -> ResultEngine<Vec<String>> {
        let owner = user.id.to_string();

        let expense_names: Vec<String> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::ItemName)
            .distinct()
            .inner_join(batches::Entity)
            .filter(batches::Column::UserId.eq(owner.clone()))
            .order_by_asc(expenses::Column::ItemName)
            .into_tuple()
            .all(&self.database)
            .await?;
        let earning_names: Vec<String> = earnings::Entity::find()
            .select_only()
            .column(earnings::Column::ItemName)
            .distinct()
            .inner_join(batches::Entity)
            .filter(batches::Column::UserId.eq(owner))
            .order_by_asc(earnings::Column::ItemName)
            .into_tuple()
            .all(&self.database)
            .await?;

        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let mut seen = HashSet::new();
        Ok(expense_names
            .into_iter()
            .chain(earning_names)
            .filter(|name| query.is_none_or(|q| contains_folded(name, q)))
            .filter(|name| seen.insert(name.clone()))
            .collect())
    }
}
