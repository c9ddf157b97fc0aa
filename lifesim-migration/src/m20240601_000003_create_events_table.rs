use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::EventId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::PlayerId).string())
                    .col(ColumnDef::new(Events::SceneId).string())
                    .col(ColumnDef::new(Events::Summary).text().not_null())
                    .col(ColumnDef::new(Events::Detail).text())
                    .col(ColumnDef::new(Events::WorldDate).string())
                    .col(ColumnDef::new(Events::WorldTime).string())
                    .col(ColumnDef::new(Events::WorldLocation).string())
                    .col(ColumnDef::new(Events::WorldFunds).string())
                    .col(
                        ColumnDef::new(Events::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Event listings are ordered by timestamp
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-events-timestamp")
                    .table(Events::Table)
                    .col(Events::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-events-player_id")
                    .table(Events::Table)
                    .col(Events::PlayerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    EventId,
    PlayerId,
    SceneId,
    Summary,
    Detail,
    WorldDate,
    WorldTime,
    WorldLocation,
    WorldFunds,
    Timestamp,
}
