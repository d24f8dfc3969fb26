//! Ownership checks.
//!
//! A batch is readable by its owner and by administrators, and writable by
//! its owner only. Expenses and earnings inherit the rule from their batch.
//! Every failed check reports `KeyNotFound` so callers cannot probe for
//! another user's data.

use sea_orm::{ConnectionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, batches, earnings, expenses};

use super::Engine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Access {
    Read,
    Write,
}

impl Access {
    fn allows(self, user: &User, owner_id: &str) -> bool {
        if owner_id == user.id.to_string() {
            return true;
        }
        self == Self::Read && user.is_admin()
    }
}

/// Generates `require_<entry>` lookups that resolve an entry, then check its
/// parent batch.
macro_rules! impl_entry_access {
    ($require_fn:ident, $entity:path, $model:path, $err_msg:literal) => {
        pub(super) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            user: &User,
            entry_id: Uuid,
            access: Access,
        ) -> ResultEngine<$model> {
            let model = <$entity>::find_by_id(entry_id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))?;
            let batch = batches::Entity::find_by_id(model.batch_id.clone())
                .one(db)
                .await?;
            match batch {
                Some(batch) if access.allows(user, &batch.user_id) => Ok(model),
                _ => Err(EngineError::KeyNotFound($err_msg.to_string())),
            }
        }
    };
}

impl Engine {
    pub(super) async fn require_batch<C: ConnectionTrait>(
        &self,
        db: &C,
        user: &User,
        batch_id: Uuid,
        access: Access,
    ) -> ResultEngine<batches::Model> {
        let model = batches::Entity::find_by_id(batch_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("batch not exists".to_string()))?;
        if !access.allows(user, &model.user_id) {
            return Err(EngineError::KeyNotFound("batch not exists".to_string()));
        }
        Ok(model)
    }

    impl_entry_access!(
        require_expense,
        expenses::Entity,
        expenses::Model,
        "expense not exists"
    );

    impl_entry_access!(
        require_earning,
        earnings::Entity,
        earnings::Model,
        "earning not exists"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserRole;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            name: "Someone".to_string(),
            role,
        }
    }

    #[test]
    fn owner_can_read_and_write() {
        let owner = user(UserRole::Standard);
        let owner_id = owner.id.to_string();
        assert!(Access::Read.allows(&owner, &owner_id));
        assert!(Access::Write.allows(&owner, &owner_id));
    }

    #[test]
    fn admin_reads_but_never_writes_foreign_batches() {
        let admin = user(UserRole::Admin);
        let other = Uuid::new_v4().to_string();
        assert!(Access::Read.allows(&admin, &other));
        assert!(!Access::Write.allows(&admin, &other));
    }

    #[test]
    fn standard_user_is_locked_out_of_foreign_batches() {
        let someone = user(UserRole::Standard);
        let other = Uuid::new_v4().to_string();
        assert!(!Access::Read.allows(&someone, &other));
        assert!(!Access::Write.allows(&someone, &other));
    }
}
