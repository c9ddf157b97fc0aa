use lifesim_types::PlayerInfo;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    /// Caller-chosen identifier, used in URLs
    #[sea_orm(primary_key, auto_increment = false)]
    pub player_id: String,

    pub name: Option<String>,

    /// Where the player currently is in the world
    pub location: Option<String>,

    #[sea_orm(default_value = 0.0)]
    pub money: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PlayerInfo {
    fn from(model: Model) -> Self {
        Self {
            player_id: model.player_id,
            name: model.name,
            location: model.location,
            money: model.money,
        }
    }
}
