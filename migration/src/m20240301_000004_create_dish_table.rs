use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_dish_type_table::DishType;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Removing dependents of a dish type is the service's job, so the
        // foreign key keeps the default action and only guards integrity.
        manager
            .create_table(
                Table::create()
                    .table(Dish::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dish::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Dish::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Dish::Description).text().not_null())
                    .col(ColumnDef::new(Dish::Price).decimal_len(15, 2).not_null())
                    .col(ColumnDef::new(Dish::DishTypeId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dish-dish_type_id")
                            .from(Dish::Table, Dish::DishTypeId)
                            .to(DishType::Table, DishType::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dish::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Dish {
    Table,
    Id,
    Name,
    Description,
    Price,
    DishTypeId,
}
