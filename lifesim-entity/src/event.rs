use lifesim_types::EventInfo;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub event_id: String,

    pub player_id: Option<String>,

    pub scene_id: Option<String>,

    /// One-line description of what happened
    pub summary: String,

    pub detail: Option<String>,

    /// Scene header at the time the event was recorded
    pub world_date: Option<String>,
    pub world_time: Option<String>,
    pub world_location: Option<String>,
    pub world_funds: Option<String>,

    pub timestamp: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            event_id: Set(Uuid::new_v4().to_string()),
            timestamp: Set(chrono::Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    /// Line used for the rendered log, `[timestamp] summary`
    pub fn log_line(&self) -> String {
        format!("[{}] {}", self.timestamp, self.summary)
    }
}

impl From<Model> for EventInfo {
    fn from(model: Model) -> Self {
        Self {
            event_id: model.event_id,
            player_id: model.player_id,
            scene_id: model.scene_id,
            summary: model.summary,
            detail: model.detail,
            world_date: model.world_date,
            world_time: model.world_time,
            world_location: model.world_location,
            world_funds: model.world_funds,
            timestamp: model.timestamp,
        }
    }
}
