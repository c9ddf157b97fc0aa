use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Npcs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Npcs::NpcId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Npcs::Name).string().not_null())
                    .col(ColumnDef::new(Npcs::Description).string())
                    .col(
                        ColumnDef::new(Npcs::Attitude)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Npcs::Location).string())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Npcs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Npcs {
    Table,
    NpcId,
    Name,
    Description,
    Attitude,
    Location,
}
