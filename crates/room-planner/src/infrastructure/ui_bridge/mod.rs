//! Front-end command bridge: exposes application-layer operations to a
//! rendering front end.
//!
//! Every command is an `async fn` taking the shared [`AppState`] and returning
//! a [`CommandResult`].  The front end owns no layout state: after each
//! command it redraws from the returned [`LayoutViewDto`].
//!
//! # Wire format
//!
//! Requests are JSON objects tagged by `command`:
//!
//! ```json
//! { "command": "gesture", "gesture": { "type": "add", "point": [0.0, 1.0, 0.0] } }
//! { "command": "save" }
//! { "command": "load", "layout_id": "6f1c…" }
//! ```
//!
//! Every response has the same shape:
//! `{ "success": bool, "data": T | null, "error": string | null }`, so the
//! front end can always read `success` first.
//!
//! # Locking
//!
//! The session lives behind a `tokio::sync::Mutex`.  Save and load release the
//! lock while the repository call is in flight, so gestures keep flowing; the
//! session's edit counter sorts out which result still applies.

use std::sync::Arc;

use room_core::{Catalog, CatalogError, FurnitureId, FurnitureKind, LayoutError, Rgb, Room};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::{
    dispatch_gesture::{Gesture, GestureDispatcher, GestureOutcome, Tool, ViewMode},
    edit_session::{EditSession, LoadOutcome},
    persist_layout::{LayoutId, LayoutRepository, PersistLayoutUseCase, RetryPolicy},
};
use crate::infrastructure::storage::config::AppConfig;

/// Error type for building [`AppState`] from configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid default room: {0}")]
    Room(#[from] LayoutError),
}

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between command invocations.
pub struct AppState {
    /// The single editing session.
    pub session: Mutex<EditSession>,
    /// Save/load with timeout and retries.
    pub persistence: PersistLayoutUseCase,
}

impl AppState {
    /// Builds the state from explicit parts.
    pub fn new(
        catalog: Arc<Catalog>,
        default_room: Room,
        dispatcher: GestureDispatcher,
        repository: Arc<dyn LayoutRepository>,
        policy: RetryPolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(EditSession::new(catalog, default_room, dispatcher)),
            persistence: PersistLayoutUseCase::new(repository, policy),
        })
    }

    /// Builds the state from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] if the configured catalog or default room is
    /// invalid.
    pub fn from_config(
        config: &AppConfig,
        repository: Arc<dyn LayoutRepository>,
    ) -> Result<Arc<Self>, StartupError> {
        let catalog = Arc::new(config.to_catalog()?);
        let room = config.room.to_room()?;
        Ok(Self::new(
            catalog,
            room,
            GestureDispatcher::new(config.planner.rotation_snap_degrees),
            repository,
            config.persistence.retry_policy(),
        ))
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDto {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

/// One placed item as the front end draws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: String,
    pub kind: String,
    /// Minimum corner of the rotated bounding box.
    pub position: [f64; 3],
    pub rotation_y: f64,
    pub color: String,
    /// Rotated bounding-box extents along x, y, z.
    pub size: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDto {
    pub tool: Tool,
    pub archetype: String,
    pub color: String,
    pub view_mode: ViewMode,
}

/// Everything the front end needs to redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutViewDto {
    pub room: RoomDto,
    pub items: Vec<ItemDto>,
    pub selection: SelectionDto,
    pub edit_counter: u64,
    pub dirty: bool,
    pub layout_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDto {
    pub kind: String,
    pub name: String,
    pub icon: String,
    pub footprint: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDto {
    pub name: String,
    pub color: String,
}

/// Picker contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDto {
    pub archetypes: Vec<ArchetypeDto>,
    pub palette: Vec<ColorDto>,
}

/// A gesture as sent by the front end.  Ids and colors are strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureDto {
    Add { point: [f64; 3] },
    Move { id: String, point: [f64; 3] },
    Rotate { id: String, point: [f64; 3] },
    Remove { id: String },
    Recolor { id: String },
    SelectTool { tool: Tool },
    SelectArchetype { kind: String },
    SelectColor { color: String },
    SelectViewMode { mode: ViewMode },
    SetRoomDimensions { width: f64, length: f64, height: f64 },
}

fn parse_id(text: &str) -> Result<FurnitureId, String> {
    text.parse()
        .map_err(|e| format!("invalid furniture id {text:?}: {e}"))
}

impl TryFrom<GestureDto> for Gesture {
    type Error = String;

    fn try_from(dto: GestureDto) -> Result<Self, Self::Error> {
        Ok(match dto {
            GestureDto::Add { point } => Gesture::Add {
                point: point.into(),
            },
            GestureDto::Move { id, point } => Gesture::Move {
                id: parse_id(&id)?,
                point: point.into(),
            },
            GestureDto::Rotate { id, point } => Gesture::Rotate {
                id: parse_id(&id)?,
                point: point.into(),
            },
            GestureDto::Remove { id } => Gesture::Remove { id: parse_id(&id)? },
            GestureDto::Recolor { id } => Gesture::Recolor { id: parse_id(&id)? },
            GestureDto::SelectTool { tool } => Gesture::SelectTool(tool),
            GestureDto::SelectArchetype { kind } => {
                Gesture::SelectArchetype(FurnitureKind::new(kind))
            }
            GestureDto::SelectColor { color } => Gesture::SelectColor(
                color
                    .parse::<Rgb>()
                    .map_err(|e| e.to_string())?,
            ),
            GestureDto::SelectViewMode { mode } => Gesture::SelectViewMode(mode),
            GestureDto::SetRoomDimensions {
                width,
                length,
                height,
            } => Gesture::SetRoomDimensions {
                width,
                length,
                height,
            },
        })
    }
}

/// What a gesture did, as reported to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomeDto {
    SelectionChanged,
    Added { id: String },
    Moved { id: String },
    Rotated { id: String, rotation_y: f64 },
    Removed { id: String },
    Recolored { id: String },
    RoomResized { clamped: usize },
    Ignored,
}

impl From<&GestureOutcome> for OutcomeDto {
    fn from(outcome: &GestureOutcome) -> Self {
        match *outcome {
            GestureOutcome::SelectionChanged => Self::SelectionChanged,
            GestureOutcome::Added(id) => Self::Added { id: id.to_string() },
            GestureOutcome::Moved(id) => Self::Moved { id: id.to_string() },
            GestureOutcome::Rotated { id, rotation_y } => Self::Rotated {
                id: id.to_string(),
                rotation_y,
            },
            GestureOutcome::Removed(id) => Self::Removed { id: id.to_string() },
            GestureOutcome::Recolored(id) => Self::Recolored { id: id.to_string() },
            GestureOutcome::RoomResized { clamped } => Self::RoomResized { clamped },
            GestureOutcome::Ignored => Self::Ignored,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureResultDto {
    pub outcome: OutcomeDto,
    pub view: LayoutViewDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResultDto {
    pub layout_id: String,
    /// `true` if edits were made while the save was in flight.
    pub dirty: bool,
    /// `false` if the layout was replaced (new or loaded) before the save
    /// finished.  The saved copy still exists under `layout_id`.
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResultDto {
    /// `false` if the user edited during the fetch and the result was dropped.
    pub applied: bool,
    pub view: LayoutViewDto,
}

/// Unified response wrapper used by every command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn view_of(session: &EditSession) -> LayoutViewDto {
    let store = session.store();
    let room = store.room();
    let selection = session.selection();
    LayoutViewDto {
        room: RoomDto {
            width: room.width(),
            length: room.length(),
            height: room.height(),
        },
        items: store
            .list()
            .iter()
            .map(|item| {
                let size = store
                    .catalog()
                    .lookup(&item.kind)
                    .map(|a| a.footprint.rotated_extent(item.rotation_y))
                    .unwrap_or_default();
                ItemDto {
                    id: item.id.to_string(),
                    kind: item.kind.to_string(),
                    position: item.position.to_array(),
                    rotation_y: item.rotation_y,
                    color: item.color.to_string(),
                    size: size.to_array(),
                }
            })
            .collect(),
        selection: SelectionDto {
            tool: selection.tool,
            archetype: selection.archetype.to_string(),
            color: selection.color.to_string(),
            view_mode: selection.view_mode,
        },
        edit_counter: session.edit_counter(),
        dirty: session.is_dirty(),
        layout_id: session.layout_id().map(|id| id.to_string()),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the current layout and selection.
pub async fn get_view(state: Arc<AppState>) -> CommandResult<LayoutViewDto> {
    let session = state.session.lock().await;
    CommandResult::ok(view_of(&session))
}

/// Returns the archetypes and palette for the pickers.
pub async fn get_catalog(state: Arc<AppState>) -> CommandResult<CatalogDto> {
    let session = state.session.lock().await;
    let catalog = session.store().catalog();
    CommandResult::ok(CatalogDto {
        archetypes: catalog
            .list_all()
            .map(|a| ArchetypeDto {
                kind: a.kind.to_string(),
                name: a.name.clone(),
                icon: a.icon.clone(),
                footprint: [a.footprint.dx, a.footprint.dy, a.footprint.dz],
            })
            .collect(),
        palette: catalog
            .palette()
            .iter()
            .map(|c| ColorDto {
                name: c.name.clone(),
                color: c.color.to_string(),
            })
            .collect(),
    })
}

/// Dispatches one gesture.  A rejected operation returns an error and leaves
/// the layout as it was.
pub async fn apply_gesture(
    state: Arc<AppState>,
    gesture: GestureDto,
) -> CommandResult<GestureResultDto> {
    let gesture = match Gesture::try_from(gesture) {
        Ok(g) => g,
        Err(e) => return CommandResult::err(e),
    };

    let mut session = state.session.lock().await;
    match session.apply(gesture) {
        Ok(outcome) => CommandResult::ok(GestureResultDto {
            outcome: OutcomeDto::from(&outcome),
            view: view_of(&session),
        }),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Starts a new, empty layout in the default room.
pub async fn new_layout(state: Arc<AppState>) -> CommandResult<LayoutViewDto> {
    let mut session = state.session.lock().await;
    session.new_layout();
    CommandResult::ok(view_of(&session))
}

/// Saves the current layout.  Editing can continue while this runs.
pub async fn save_layout(state: Arc<AppState>) -> CommandResult<SaveResultDto> {
    let pending = state.session.lock().await.begin_save();

    match state.persistence.save(pending).await {
        Ok(saved) => {
            let mut session = state.session.lock().await;
            let current = session.complete_save(&saved);
            CommandResult::ok(SaveResultDto {
                layout_id: saved.layout_id.to_string(),
                dirty: session.is_dirty(),
                current,
            })
        }
        Err(e) => {
            warn!(error = %e, "save failed");
            CommandResult::err(e.to_string())
        }
    }
}

/// Loads a saved layout, unless the user edits before it arrives.
pub async fn load_layout(state: Arc<AppState>, layout_id: String) -> CommandResult<LoadResultDto> {
    let layout_id: LayoutId = match layout_id.parse() {
        Ok(id) => id,
        Err(e) => return CommandResult::err(format!("invalid layout id {layout_id:?}: {e}")),
    };

    let ticket = state.session.lock().await.begin_load(layout_id);

    let snapshot = match state.persistence.fetch(layout_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(%layout_id, error = %e, "load failed");
            return CommandResult::err(e.to_string());
        }
    };

    let mut session = state.session.lock().await;
    match session.apply_load(ticket, &snapshot) {
        Ok(outcome) => CommandResult::ok(LoadResultDto {
            applied: outcome == LoadOutcome::Applied,
            view: view_of(&session),
        }),
        Err(e) => {
            warn!(%layout_id, error = %e, "loaded layout rejected");
            CommandResult::err(e.to_string())
        }
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// A request from the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum FrontendRequest {
    Gesture { gesture: GestureDto },
    View,
    Save,
    Load { layout_id: String },
    NewLayout,
    Catalog,
}

fn to_json<T: Serialize>(result: CommandResult<T>) -> serde_json::Value {
    serde_json::to_value(&result).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "data": null,
            "error": format!("failed to encode response: {e}"),
        })
    })
}

/// Runs one request and returns its JSON response.
pub async fn handle_request(state: Arc<AppState>, request: FrontendRequest) -> serde_json::Value {
    match request {
        FrontendRequest::Gesture { gesture } => to_json(apply_gesture(state, gesture).await),
        FrontendRequest::View => to_json(get_view(state).await),
        FrontendRequest::Save => to_json(save_layout(state).await),
        FrontendRequest::Load { layout_id } => to_json(load_layout(state, layout_id).await),
        FrontendRequest::NewLayout => to_json(new_layout(state).await),
        FrontendRequest::Catalog => to_json(get_catalog(state).await),
    }
}

/// Parses one JSON request line and runs it.
pub async fn handle_line(state: Arc<AppState>, line: &str) -> serde_json::Value {
    match serde_json::from_str::<FrontendRequest>(line) {
        Ok(request) => {
            info!(?request, "request");
            handle_request(state, request).await
        }
        Err(e) => to_json(CommandResult::<()>::err(format!("invalid request: {e}"))),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
