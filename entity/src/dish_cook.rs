use sea_orm::entity::prelude::*;

/// Membership row: the cook prepares the dish.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dish_cook")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub dish_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub cook_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dish::Entity",
        from = "Column::DishId",
        to = "super::dish::Column::Id"
    )]
    Dish,
    #[sea_orm(
        belongs_to = "super::cook::Entity",
        from = "Column::CookId",
        to = "super::cook::Column::Id"
    )]
    Cook,
}

impl Related<super::dish::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dish.def()
    }
}

impl Related<super::cook::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
