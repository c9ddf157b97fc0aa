use crate::error::Result;
use lifesim_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

pub async fn setup_database(database_url: &str) -> Result<DatabaseConnection> {
    tracing::info!("🔗 Connecting to database: {}", database_url);

    // Configure connection options
    let mut opt = ConnectOptions::new(database_url.to_string());
    opt.max_connections(16)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    // An in-memory database exists per connection, so it must not be pooled
    if database_url.contains(":memory:") {
        opt.max_connections(1);
    }

    let db = Database::connect(opt).await?;

    tracing::info!("🔄 Running database migrations...");
    Migrator::up(&db, None).await?;
    tracing::info!("✅ Migrations completed successfully");

    Ok(db)
}

pub mod player_ops {
    use super::*;
    use crate::error::AppError;
    use crate::UpdatePlayerRequest;
    use lifesim_entity::{player, prelude::*};
    use sea_orm::*;

    /// Fetch a player, creating an empty one with no money on first sight
    pub async fn get_or_create_player(
        db: &DatabaseConnection,
        player_id: &str,
    ) -> Result<player::Model> {
        if let Some(existing) = Player::find_by_id(player_id.to_string()).one(db).await? {
            return Ok(existing);
        }

        let player_model = player::ActiveModel {
            player_id: Set(player_id.to_string()),
            name: Set(None),
            location: Set(None),
            money: Set(0.0),
        };

        let created = player_model.insert(db).await?;
        tracing::info!("🧍 Created player: {}", player_id);
        Ok(created)
    }

    pub async fn update_player(
        db: &DatabaseConnection,
        player_id: &str,
        changes: UpdatePlayerRequest,
    ) -> Result<player::Model> {
        let existing = Player::find_by_id(player_id.to_string())
            .one(db)
            .await?
            .ok_or(AppError::PlayerNotFound)?;

        let mut player: player::ActiveModel = existing.clone().into();
        if let Some(name) = changes.name {
            player.name = Set(Some(name));
        }
        if let Some(location) = changes.location {
            player.location = Set(Some(location));
        }
        if let Some(money) = changes.money {
            player.money = Set(money);
        }

        if !player.is_changed() {
            return Ok(existing);
        }

        let updated = player.update(db).await?;
        Ok(updated)
    }
}

pub mod npc_ops {
    use super::*;
    use lifesim_entity::{npc, prelude::*};
    use sea_orm::*;

    pub async fn create_npc(
        db: &DatabaseConnection,
        name: String,
        description: String,
    ) -> Result<npc::Model> {
        let npc_model = npc::ActiveModel {
            name: Set(name),
            description: Set(Some(description)),
            ..Default::default()
        };

        let npc = npc_model.insert(db).await?;
        Ok(npc)
    }

    pub async fn get_npc_by_id(db: &DatabaseConnection, npc_id: &str) -> Result<Option<npc::Model>> {
        let npc = Npc::find_by_id(npc_id.to_string()).one(db).await?;
        Ok(npc)
    }
}

pub mod event_ops {
    use super::*;
    use crate::SceneState;
    use lifesim_entity::{event, prelude::*};
    use sea_orm::*;

    pub async fn record_event(
        db: &DatabaseConnection,
        player_id: String,
        summary: String,
        detail: Option<String>,
        header: &SceneState,
    ) -> Result<event::Model> {
        let event_model = event::ActiveModel {
            player_id: Set(Some(player_id)),
            scene_id: Set(None),
            summary: Set(summary),
            detail: Set(detail),
            world_date: Set(Some(header.date.clone())),
            world_time: Set(Some(header.time.clone())),
            world_location: Set(Some(header.location.clone())),
            world_funds: Set(Some(header.funds.clone())),
            ..Default::default()
        };

        let event = event_model.insert(db).await?;
        Ok(event)
    }

    /// Newest first; events sharing a timestamp come in descending id order
    pub async fn recent_events(db: &DatabaseConnection, limit: u64) -> Result<Vec<event::Model>> {
        let events = Event::find()
            .order_by_desc(event::Column::Timestamp)
            .order_by_desc(event::Column::EventId)
            .limit(limit)
            .all(db)
            .await?;

        Ok(events)
    }

    /// Oldest first, for the rendered log
    pub async fn all_events(db: &DatabaseConnection) -> Result<Vec<event::Model>> {
        let events = Event::find()
            .order_by_asc(event::Column::Timestamp)
            .order_by_asc(event::Column::EventId)
            .all(db)
            .await?;

        Ok(events)
    }
}

pub mod flag_ops {
    use super::*;
    use lifesim_entity::{prelude::*, world_flag};
    use sea_orm::*;
    use std::collections::BTreeMap;

    pub async fn all_flags(db: &DatabaseConnection) -> Result<BTreeMap<String, String>> {
        let flags = WorldFlag::find()
            .all(db)
            .await?
            .into_iter()
            .map(|flag| (flag.key, flag.value))
            .collect();

        Ok(flags)
    }

    /// Insert or overwrite a flag
    pub async fn set_flag(
        db: &DatabaseConnection,
        key: String,
        value: String,
    ) -> Result<world_flag::Model> {
        let flag = match WorldFlag::find_by_id(key.clone()).one(db).await? {
            Some(existing) => {
                let mut flag: world_flag::ActiveModel = existing.into();
                flag.value = Set(value);
                flag.update(db).await?
            }
            None => {
                world_flag::ActiveModel {
                    key: Set(key),
                    value: Set(value),
                }
                .insert(db)
                .await?
            }
        };

        Ok(flag)
    }
}
