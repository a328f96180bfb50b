//! What happens to dependent rows when a parent row is deleted.
//!
//! The schema's foreign keys only guard integrity; removing or detaching
//! dependents is done here, inside the caller's transaction, before the
//! parent itself is deleted.

use ::entity::{dish, dish_cook, dish_ingredient};
use sea_orm::{sea_query::SimpleExpr, *};
use tracing::debug;

use crate::error::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete the dependent rows.
    Cascade,
    /// Refuse to delete a parent that still has dependents.
    Restrict,
    /// Clear the referencing column. Only valid for nullable columns.
    SetNull,
}

/// Rows of `E` that reference a parent through `column`.
pub struct Dependents<E: EntityTrait> {
    pub name: &'static str,
    pub column: E::Column,
    pub policy: DeletePolicy,
}

pub const DISH_TYPE_DISHES: Dependents<dish::Entity> = Dependents {
    name: "dish",
    column: dish::Column::DishTypeId,
    policy: DeletePolicy::Cascade,
};

pub const DISH_INGREDIENT_LINKS: Dependents<dish_ingredient::Entity> = Dependents {
    name: "dish ingredient",
    column: dish_ingredient::Column::DishId,
    policy: DeletePolicy::Cascade,
};

pub const INGREDIENT_DISH_LINKS: Dependents<dish_ingredient::Entity> = Dependents {
    name: "dish ingredient",
    column: dish_ingredient::Column::IngredientId,
    policy: DeletePolicy::Cascade,
};

pub const DISH_COOK_LINKS: Dependents<dish_cook::Entity> = Dependents {
    name: "dish cook",
    column: dish_cook::Column::DishId,
    policy: DeletePolicy::Cascade,
};

pub const COOK_DISH_LINKS: Dependents<dish_cook::Entity> = Dependents {
    name: "dish cook",
    column: dish_cook::Column::CookId,
    policy: DeletePolicy::Cascade,
};

impl<E> Dependents<E>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
{
    /// Applies the policy to the dependents of `parent_ids`, returning the
    /// number of rows deleted or detached.
    pub async fn enforce<C>(&self, db: &C, parent_ids: &[i32]) -> Result<u64, ServiceError>
    where
        C: ConnectionTrait,
    {
        if parent_ids.is_empty() {
            return Ok(0);
        }
        let condition = self.column.is_in(parent_ids.iter().copied());

        let affected = match self.policy {
            DeletePolicy::Cascade => {
                E::delete_many()
                    .filter(condition)
                    .exec(db)
                    .await?
                    .rows_affected
            }
            DeletePolicy::Restrict => {
                let count = E::find().filter(condition).count(db).await?;
                if count > 0 {
                    return Err(ServiceError::Integrity {
                        field: None,
                        message: format!(
                            "Cannot delete: {count} {} row(s) still depend on it.",
                            self.name
                        ),
                    });
                }
                0
            }
            DeletePolicy::SetNull => {
                E::update_many()
                    .col_expr(self.column, SimpleExpr::Value(Value::Int(None)))
                    .filter(condition)
                    .exec(db)
                    .await?
                    .rows_affected
            }
        };
        debug!(dependents = self.name, policy = ?self.policy, affected, "delete policy applied");

        Ok(affected)
    }
}
