use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A kitchen user. Cooks are also the accounts people log in with.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "cook")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 hash in PHC string format; never rendered.
    #[serde(skip)]
    pub password: String,
    #[sea_orm(default_value = 2)]
    pub years_of_experience: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dish_cook::Entity")]
    DishCook,
}

impl Related<super::dish_cook::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DishCook.def()
    }
}

impl Related<super::dish::Entity> for Entity {
    fn to() -> RelationDef {
        super::dish_cook::Relation::Dish.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::dish_cook::Relation::Cook.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.username, self.first_name, self.last_name
        )
    }
}
