use lifesim_types::NpcInfo;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "npcs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub npc_id: String,

    pub name: String,

    pub description: Option<String>,

    /// Disposition towards the player, negative is hostile
    #[sea_orm(default_value = 0.0)]
    pub attitude: f64,

    pub location: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            npc_id: Set(Uuid::new_v4().to_string()),
            attitude: Set(0.0),
            ..ActiveModelTrait::default()
        }
    }
}

impl From<Model> for NpcInfo {
    fn from(model: Model) -> Self {
        Self {
            npc_id: model.npc_id,
            name: model.name,
            description: model.description,
            attitude: model.attitude,
            location: model.location,
        }
    }
}
