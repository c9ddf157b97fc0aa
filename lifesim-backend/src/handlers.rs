use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    database::{event_ops, flag_ops, npc_ops, player_ops},
    error::{AppError, Result},
    log_storage::PDF_FILE,
    pdf, AdvanceTimeRequest, AdvanceTimeResponse, AppState, CreateNpcRequest, EventInfo,
    EventsQuery, EventsResponse, FlagsResponse, NpcInfo, PdfLogResponse, PlayerInfo,
    ResolveTurnRequest, ResolveTurnResponse, SceneState, SetFlagRequest, SetFlagResponse,
    UpdatePlayerRequest,
};

const DEFAULT_EVENT_LIMIT: u64 = 50;

/// Version of the public API contract reported by the meta endpoints
pub const API_VERSION: &str = "6.0.0";

// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "lifesim-backend",
        "timestamp": chrono::Utc::now()
    }))
}

// Game-master framing for narrative clients
pub async fn meta_instructions() -> impl IntoResponse {
    Json(json!({
        "version": API_VERSION,
        "tone": "Dark, mature, character-driven, grounded realism.",
        "instructions": "You are the Game Master of a dark, mature world. \
            Maintain player autonomy, realism, and escalating tension. \
            All events are canonical; always precheck logic."
    }))
}

pub async fn meta_directives() -> impl IntoResponse {
    let example = SceneState {
        date: "October 31, 1999".to_string(),
        time: "11:59 PM".to_string(),
        location: "Desolate Highway".to_string(),
        funds: "$42.00".to_string(),
    };

    Json(json!({
        "version": API_VERSION,
        "header_format": { "example": example },
        "directives": {
            "autonomy": "Player speech and action are always user-controlled.",
            "continuity": "Preserve canonical history across sessions.",
            "tone": "Dark realism; no omniscient narration."
        }
    }))
}

pub async fn get_scene_state(State(state): State<AppState>) -> Result<Json<SceneState>> {
    let scene = state.scenes.load().await?;
    Ok(Json(scene))
}

pub async fn advance_time(
    State(state): State<AppState>,
    Json(request): Json<AdvanceTimeRequest>,
) -> Result<Json<AdvanceTimeResponse>> {
    let scene = state.scenes.advance_time(request.hours).await?;

    Ok(Json(AdvanceTimeResponse {
        status: "advanced".to_string(),
        scene,
    }))
}

pub async fn get_flags(State(state): State<AppState>) -> Result<Json<FlagsResponse>> {
    let flags = flag_ops::all_flags(&state.db).await?;
    Ok(Json(FlagsResponse { flags }))
}

pub async fn set_flag(
    State(state): State<AppState>,
    Json(request): Json<SetFlagRequest>,
) -> Result<Json<SetFlagResponse>> {
    if request.key.is_empty() {
        return Err(AppError::BadRequest("Flag key must not be empty".to_string()));
    }

    let flag = flag_ops::set_flag(&state.db, request.key, request.value).await?;
    tracing::info!("🚩 Set world flag {} = {}", flag.key, flag.value);

    Ok(Json(SetFlagResponse {
        status: "ok".to_string(),
        key: flag.key,
        value: flag.value,
    }))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerInfo>> {
    let player = player_ops::get_or_create_player(&state.db, &player_id).await?;
    Ok(Json(player.into()))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(changes): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerInfo>> {
    let player = player_ops::update_player(&state.db, &player_id, changes).await?;
    Ok(Json(player.into()))
}

pub async fn create_npc(
    State(state): State<AppState>,
    Json(request): Json<CreateNpcRequest>,
) -> Result<Json<NpcInfo>> {
    let npc = npc_ops::create_npc(&state.db, request.name, request.description).await?;
    tracing::info!("👤 Created NPC {} ({})", npc.name, npc.npc_id);
    Ok(Json(npc.into()))
}

pub async fn get_npc(
    State(state): State<AppState>,
    Path(npc_id): Path<String>,
) -> Result<Json<NpcInfo>> {
    let npc = npc_ops::get_npc_by_id(&state.db, &npc_id)
        .await?
        .ok_or(AppError::NpcNotFound)?;
    Ok(Json(npc.into()))
}

// Record a narrative event stamped with the current scene header
pub async fn resolve_turn(
    State(state): State<AppState>,
    Json(request): Json<ResolveTurnRequest>,
) -> Result<Json<ResolveTurnResponse>> {
    let header = state.scenes.load().await?;

    let event = event_ops::record_event(
        &state.db,
        request.player_id,
        request.summary,
        request.detail,
        &header,
    )
    .await?;

    let event_id = event.event_id.clone();
    let record: EventInfo = event.into();
    state.logs.append_event(&record).await?;

    tracing::info!("🎲 Turn resolved: {}", event_id);

    Ok(Json(ResolveTurnResponse {
        status: "applied".to_string(),
        event_id,
    }))
}

pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    let events = event_ops::recent_events(&state.db, limit).await?;

    Ok(Json(EventsResponse {
        events: events.into_iter().map(Into::into).collect(),
    }))
}

// Render every event into static/logs/log.pdf and hand back its public URL
pub async fn get_pdf_log(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PdfLogResponse>> {
    let events = event_ops::all_events(&state.db).await?;
    let lines: Vec<String> = events.iter().map(|event| event.log_line()).collect();

    let bytes = pdf::render_log(&lines)?;
    state.logs.write_pdf(&bytes).await?;

    tracing::info!("📄 Rendered event log ({} events)", lines.len());

    let base_url = public_base_url(&state, &headers);
    Ok(Json(PdfLogResponse {
        pdf_url: format!("{}/static/logs/{}", base_url, PDF_FILE),
    }))
}

fn public_base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base_url) = &state.config.base_url {
        return base_url.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", state.config.port));

    format!("http://{}", host)
}
