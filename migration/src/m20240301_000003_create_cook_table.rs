use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cook::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cook::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Cook::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cook::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Cook::LastName).string_len(150).not_null())
                    .col(ColumnDef::new(Cook::Password).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Cook::YearsOfExperience)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cook::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Cook {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Password,
    YearsOfExperience,
}
