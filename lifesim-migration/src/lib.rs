pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_players_table;
mod m20240601_000002_create_npcs_table;
mod m20240601_000003_create_events_table;
mod m20240601_000004_create_world_flags_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_players_table::Migration),
            Box::new(m20240601_000002_create_npcs_table::Migration),
            Box::new(m20240601_000003_create_events_table::Migration),
            Box::new(m20240601_000004_create_world_flags_table::Migration),
        ]
    }
}
