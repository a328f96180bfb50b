use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "dish")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub price: Decimal,
    pub dish_type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dish_type::Entity",
        from = "Column::DishTypeId",
        to = "super::dish_type::Column::Id"
    )]
    DishType,
    #[sea_orm(has_many = "super::dish_ingredient::Entity")]
    DishIngredient,
    #[sea_orm(has_many = "super::dish_cook::Entity")]
    DishCook,
}

impl Related<super::dish_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DishType.def()
    }
}

impl Related<super::dish_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DishIngredient.def()
    }
}

impl Related<super::dish_cook::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DishCook.def()
    }
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        super::dish_ingredient::Relation::Ingredient.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::dish_ingredient::Relation::Dish.def().rev())
    }
}

impl Related<super::cook::Entity> for Entity {
    fn to() -> RelationDef {
        super::dish_cook::Relation::Cook.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::dish_cook::Relation::Dish.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `"{name}( {dish_type}) costs {price}"`, the label used in listings.
    pub fn label(&self, dish_type: &super::dish_type::Model) -> String {
        format!("{}( {}) costs {:.2}", self.name, dish_type, self.price)
    }
}
