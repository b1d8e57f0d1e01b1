use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, expense, income};

use super::Engine;

/// Generates a `require_*` lookup that maps a missing row to `KeyNotFound`.
macro_rules! impl_require {
    ($require_fn:ident, $entity:path, $model:path, $err_msg:literal) => {
        pub(super) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require!(
        require_income,
        income::Entity,
        income::Model,
        "income not exists"
    );

    impl_require!(
        require_expense,
        expense::Entity,
        expense::Model,
        "expense not exists"
    );

    /// Tithe records owned by `income_id`, newest first.
    pub(super) async fn tithes_of<C: ConnectionTrait>(
        &self,
        db: &C,
        income_id: Uuid,
    ) -> ResultEngine<Vec<expense::Model>> {
        expense::Entity::find()
            .filter(expense::Column::SourceIncomeId.eq(income_id.to_string()))
            .order_by_desc(expense::Column::CreatedAt)
            .all(db)
            .await
            .map_err(Into::into)
    }
}
