use sea_orm_migration::prelude::*;

use super::{
    m20240301_000002_create_ingredient_table::Ingredient,
    m20240301_000003_create_cook_table::Cook, m20240301_000004_create_dish_table::Dish,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DishIngredient::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DishIngredient::DishId).integer().not_null())
                    .col(
                        ColumnDef::new(DishIngredient::IngredientId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk-dish_ingredient")
                            .col(DishIngredient::DishId)
                            .col(DishIngredient::IngredientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dish_ingredient-dish_id")
                            .from(DishIngredient::Table, DishIngredient::DishId)
                            .to(Dish::Table, Dish::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dish_ingredient-ingredient_id")
                            .from(DishIngredient::Table, DishIngredient::IngredientId)
                            .to(Ingredient::Table, Ingredient::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DishCook::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DishCook::DishId).integer().not_null())
                    .col(ColumnDef::new(DishCook::CookId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk-dish_cook")
                            .col(DishCook::DishId)
                            .col(DishCook::CookId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dish_cook-dish_id")
                            .from(DishCook::Table, DishCook::DishId)
                            .to(Dish::Table, Dish::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dish_cook-cook_id")
                            .from(DishCook::Table, DishCook::CookId)
                            .to(Cook::Table, Cook::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DishCook::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DishIngredient::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DishIngredient {
    Table,
    DishId,
    IngredientId,
}

#[derive(DeriveIden)]
enum DishCook {
    Table,
    DishId,
    CookId,
}
