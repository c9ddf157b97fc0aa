use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display strings for the current in-world header.
///
/// Persisted as `scene_state.json` in the log directory. All four fields are
/// free-form display strings; nothing parses them back.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct SceneState {
    pub date: String,
    pub time: String,
    pub location: String,
    pub funds: String,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            date: "January 1, 2000".to_string(),
            time: "12:00 AM".to_string(),
            location: "Unknown".to_string(),
            funds: "$0.00".to_string(),
        }
    }
}

// Request types
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AdvanceTimeRequest {
    pub hours: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SetFlagRequest {
    pub key: String,
    pub value: String,
}

/// Partial player update. Absent fields are left untouched and unknown keys
/// are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdatePlayerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateNpcRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResolveTurnRequest {
    pub player_id: String,
    pub summary: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventsQuery {
    pub limit: Option<u64>,
}

// Response types
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AdvanceTimeResponse {
    pub status: String,
    pub scene: SceneState,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FlagsResponse {
    pub flags: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SetFlagResponse {
    pub status: String,
    pub key: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub player_id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub money: f64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NpcInfo {
    pub npc_id: String,
    pub name: String,
    pub description: Option<String>,
    pub attitude: f64,
    pub location: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub event_id: String,
    pub player_id: Option<String>,
    pub scene_id: Option<String>,
    pub summary: String,
    pub detail: Option<String>,
    pub world_date: Option<String>,
    pub world_time: Option<String>,
    pub world_location: Option<String>,
    pub world_funds: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResolveTurnResponse {
    pub status: String,
    pub event_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct EventsResponse {
    pub events: Vec<EventInfo>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PdfLogResponse {
    pub pdf_url: String,
}
