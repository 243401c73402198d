//! DispatchGestureUseCase: the tool/selection state machine.
//!
//! The front end forwards every pointer gesture here together with the
//! session's [`Selection`].  Exactly one tool is active at a time:
//!
//! ```text
//!            select_tool            select_tool
//!   ┌──────┐ ─────────► ┌──────┐ ◄───────── ┌────────┐
//!   │ Add  │            │ Move │            │ Rotate │
//!   └──────┘ ◄───────── └──────┘ ─────────► └────────┘
//! ```
//!
//! Tool, archetype, color, and view-mode changes are always legal.  Spatial
//! gestures only act when they match the active tool; anything else is
//! [`GestureOutcome::Ignored`].
//!
//! # Drags
//!
//! Each drag frame is an independent call.  A move frame is a full
//! `move_item`; a rotate frame derives an absolute angle from the pointer's
//! position relative to the item's center, so replaying a frame is harmless
//! and no drag state accumulates between calls.

use room_core::{
    Catalog, FurnitureId, FurnitureKind, LayoutError, PlacementStore, Rgb, Vec3, EPSILON,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Move,
    Rotate,
    #[default]
    Add,
}

/// How the front end draws the room.  Has no effect on the layout itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[serde(rename = "2d")]
    TwoD,
    #[default]
    #[serde(rename = "3d")]
    ThreeD,
}

/// Ephemeral UI selection state.  Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub tool: Tool,
    /// Archetype placed by the next `Add` gesture.
    pub archetype: FurnitureKind,
    /// Color used by `Add` and `Recolor` gestures.
    pub color: Rgb,
    pub view_mode: ViewMode,
}

impl Selection {
    /// Session-start selection: `Add` tool, first archetype, first color.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            tool: Tool::default(),
            archetype: catalog.default_archetype().kind.clone(),
            color: catalog.default_color(),
            view_mode: ViewMode::default(),
        }
    }
}

/// A gesture forwarded by the front end.
///
/// Points are in room space.  For `Add` and `Move` the point is the anchor
/// (minimum corner) the item should take.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Confirm placement of the selected archetype.
    Add { point: Vec3 },
    /// One drag frame moving `id`.
    Move { id: FurnitureId, point: Vec3 },
    /// One drag frame rotating `id` toward `point`.
    Rotate { id: FurnitureId, point: Vec3 },
    /// Delete `id` from the room.
    Remove { id: FurnitureId },
    /// Paint `id` with the selected color.
    Recolor { id: FurnitureId },
    SelectTool(Tool),
    SelectArchetype(FurnitureKind),
    SelectColor(Rgb),
    SelectViewMode(ViewMode),
    SetRoomDimensions { width: f64, length: f64, height: f64 },
}

/// What a dispatched gesture did.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Only the selection changed.
    SelectionChanged,
    Added(FurnitureId),
    Moved(FurnitureId),
    Rotated { id: FurnitureId, rotation_y: f64 },
    Removed(FurnitureId),
    Recolored(FurnitureId),
    /// The room was resized; `clamped` items were pulled back inside.
    RoomResized { clamped: usize },
    /// The gesture does not apply to the active tool.
    Ignored,
}

impl GestureOutcome {
    /// Returns `true` if the layout (room or items) changed.
    pub fn changed_layout(&self) -> bool {
        !matches!(self, Self::SelectionChanged | Self::Ignored)
    }
}

/// Translates gestures into placement-store operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureDispatcher {
    /// Rotate-drag angles are rounded to this increment; `0` disables snapping.
    rotation_snap_degrees: f64,
}

impl GestureDispatcher {
    pub fn new(rotation_snap_degrees: f64) -> Self {
        let rotation_snap_degrees =
            if rotation_snap_degrees.is_finite() && rotation_snap_degrees > 0.0 {
                rotation_snap_degrees
            } else {
                0.0
            };
        Self {
            rotation_snap_degrees,
        }
    }

    /// Applies `gesture` against `selection` and `store`.
    ///
    /// # Errors
    ///
    /// Returns the store's [`LayoutError`] when the operation is rejected.  The
    /// store and selection are left exactly as they were, so the front end can
    /// treat the error as a no-op with feedback.
    pub fn dispatch(
        &self,
        selection: &mut Selection,
        store: &mut PlacementStore,
        gesture: Gesture,
    ) -> Result<GestureOutcome, LayoutError> {
        let outcome = match gesture {
            Gesture::SelectTool(tool) => {
                selection.tool = tool;
                GestureOutcome::SelectionChanged
            }
            Gesture::SelectArchetype(kind) => {
                selection.archetype = kind;
                GestureOutcome::SelectionChanged
            }
            Gesture::SelectColor(color) => {
                selection.color = color;
                GestureOutcome::SelectionChanged
            }
            Gesture::SelectViewMode(mode) => {
                selection.view_mode = mode;
                GestureOutcome::SelectionChanged
            }

            Gesture::Add { point } if selection.tool == Tool::Add => {
                let id = store.add(selection.archetype.clone(), point, 0.0, selection.color)?;
                GestureOutcome::Added(id)
            }
            Gesture::Move { id, point } if selection.tool == Tool::Move => {
                store.move_item(id, point)?;
                GestureOutcome::Moved(id)
            }
            Gesture::Rotate { id, point } if selection.tool == Tool::Rotate => {
                let center = store.bounding_box(id)?.center();
                match self.drag_angle(center, point) {
                    Some(angle) => {
                        let rotation_y = store.rotate(id, angle)?;
                        GestureOutcome::Rotated { id, rotation_y }
                    }
                    // Pointer is on the pivot: no direction to turn toward.
                    None => GestureOutcome::Ignored,
                }
            }
            Gesture::Add { .. } | Gesture::Move { .. } | Gesture::Rotate { .. } => {
                GestureOutcome::Ignored
            }

            Gesture::Remove { id } => {
                store.remove(id)?;
                GestureOutcome::Removed(id)
            }
            Gesture::Recolor { id } => {
                store.recolor(id, selection.color)?;
                GestureOutcome::Recolored(id)
            }
            Gesture::SetRoomDimensions {
                width,
                length,
                height,
            } => {
                let clamped = store.set_room_dimensions(width, length, height)?;
                GestureOutcome::RoomResized { clamped }
            }
        };

        if outcome == GestureOutcome::Ignored {
            debug!(tool = ?selection.tool, "gesture ignored for active tool");
        }
        Ok(outcome)
    }

    /// Angle in degrees of the floor-plane vector from `center` to `point`,
    /// measured from +x toward +z and snapped to the configured increment.
    fn drag_angle(&self, center: Vec3, point: Vec3) -> Option<f64> {
        let dx = point.x - center.x;
        let dz = point.z - center.z;
        if dx.abs() < EPSILON && dz.abs() < EPSILON {
            return None;
        }
        let angle = dz.atan2(dx).to_degrees();
        if self.rotation_snap_degrees > 0.0 {
            Some((angle / self.rotation_snap_degrees).round() * self.rotation_snap_degrees)
        } else {
            Some(angle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_core::Room;
    use std::sync::Arc;

    fn make_session() -> (Selection, PlacementStore) {
        let catalog = Arc::new(Catalog::default());
        let selection = Selection::for_catalog(&catalog);
        (selection, PlacementStore::new(Room::default(), catalog))
    }

    fn add_default(
        dispatcher: &GestureDispatcher,
        selection: &mut Selection,
        store: &mut PlacementStore,
        point: Vec3,
    ) -> FurnitureId {
        match dispatcher.dispatch(selection, store, Gesture::Add { point }) {
            Ok(GestureOutcome::Added(id)) => id,
            other => panic!("expected Added, got {other:?}"),
        }
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    #[test]
    fn test_selection_defaults_to_add_tool_and_first_catalog_entries() {
        let (selection, _) = make_session();
        assert_eq!(selection.tool, Tool::Add);
        assert_eq!(selection.archetype.as_str(), "sofa");
        assert_eq!(selection.color, Rgb::new(0xD4, 0xAF, 0x37));
        assert_eq!(selection.view_mode, ViewMode::ThreeD);
    }

    #[test]
    fn test_selection_changes_are_always_accepted() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();

        for gesture in [
            Gesture::SelectTool(Tool::Rotate),
            Gesture::SelectArchetype("bed".into()),
            Gesture::SelectColor(Rgb::new(0, 0, 0)),
            Gesture::SelectViewMode(ViewMode::TwoD),
        ] {
            let outcome = dispatcher.dispatch(&mut selection, &mut store, gesture).unwrap();
            assert_eq!(outcome, GestureOutcome::SelectionChanged);
        }

        assert_eq!(selection.tool, Tool::Rotate);
        assert_eq!(selection.archetype.as_str(), "bed");
        assert_eq!(selection.view_mode, ViewMode::TwoD);
        assert!(store.is_empty());
    }

    // ── Add ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_add_gesture_places_selected_archetype_and_color_unrotated() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        selection.archetype = "chair".into();
        selection.color = Rgb::new(0xFF, 0xFF, 0xFF);

        let id = add_default(&dispatcher, &mut selection, &mut store, Vec3::new(3.0, 0.0, 3.0));

        let item = store.get(id).unwrap();
        assert_eq!(item.kind.as_str(), "chair");
        assert_eq!(item.color, Rgb::new(0xFF, 0xFF, 0xFF));
        assert_eq!(item.rotation_y, 0.0);
    }

    #[test]
    fn test_add_gesture_ignored_outside_add_tool() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        selection.tool = Tool::Move;

        let outcome = dispatcher
            .dispatch(&mut selection, &mut store, Gesture::Add { point: Vec3::default() })
            .unwrap();

        assert_eq!(outcome, GestureOutcome::Ignored);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_gesture_out_of_bounds_returns_error_and_adds_nothing() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();

        let result = dispatcher.dispatch(
            &mut selection,
            &mut store,
            Gesture::Add { point: Vec3::new(19.0, 0.0, 0.0) },
        );

        assert_eq!(result, Err(LayoutError::OutOfBounds { id: None }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_gesture_with_unknown_selected_archetype_is_rejected() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        selection.archetype = "piano".into();

        let result = dispatcher.dispatch(
            &mut selection,
            &mut store,
            Gesture::Add { point: Vec3::default() },
        );

        assert_eq!(result, Err(LayoutError::UnknownArchetype("piano".into())));
    }

    // ── Move ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_move_drag_frames_stick_at_the_wall() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        let id = add_default(&dispatcher, &mut selection, &mut store, Vec3::new(0.0, 1.0, 0.0));
        selection.tool = Tool::Move;

        // Drag right one foot per frame; the sofa is 3 wide so x=17 is the last valid frame.
        let mut last_ok = 0.0;
        for x in 1..=19 {
            let point = Vec3::new(f64::from(x), 1.0, 0.0);
            if dispatcher
                .dispatch(&mut selection, &mut store, Gesture::Move { id, point })
                .is_ok()
            {
                last_ok = f64::from(x);
            }
        }

        assert_eq!(last_ok, 17.0);
        assert_eq!(store.get(id).unwrap().position, Vec3::new(17.0, 1.0, 0.0));
    }

    #[test]
    fn test_move_gesture_ignored_in_rotate_tool() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        let id = add_default(&dispatcher, &mut selection, &mut store, Vec3::default());
        selection.tool = Tool::Rotate;

        let outcome = dispatcher
            .dispatch(
                &mut selection,
                &mut store,
                Gesture::Move { id, point: Vec3::new(5.0, 0.0, 5.0) },
            )
            .unwrap();

        assert_eq!(outcome, GestureOutcome::Ignored);
        assert_eq!(store.get(id).unwrap().position, Vec3::default());
    }

    // ── Rotate ────────────────────────────────────────────────────────────────

    #[test]
    fn test_rotate_drag_turns_item_toward_pointer() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        let id = add_default(&dispatcher, &mut selection, &mut store, Vec3::new(8.0, 0.0, 8.0));
        selection.tool = Tool::Rotate;
        // Sofa center is (9.5, _, 8.75); pointer straight along +z.
        let point = Vec3::new(9.5, 0.0, 12.0);

        let outcome = dispatcher
            .dispatch(&mut selection, &mut store, Gesture::Rotate { id, point })
            .unwrap();

        match outcome {
            GestureOutcome::Rotated { rotation_y, .. } => assert!((rotation_y - 90.0).abs() < 1e-9),
            other => panic!("expected Rotated, got {other:?}"),
        }
    }

    #[test]
    fn test_rotate_drag_maps_negative_angles_into_range() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        let id = add_default(&dispatcher, &mut selection, &mut store, Vec3::new(8.0, 0.0, 8.0));
        selection.tool = Tool::Rotate;
        let point = Vec3::new(9.5, 0.0, 2.0); // straight along -z

        dispatcher
            .dispatch(&mut selection, &mut store, Gesture::Rotate { id, point })
            .unwrap();

        assert!((store.get(id).unwrap().rotation_y - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_drag_snaps_to_configured_increment() {
        let dispatcher = GestureDispatcher::new(15.0);
        let (mut selection, mut store) = make_session();
        let id = add_default(&dispatcher, &mut selection, &mut store, Vec3::new(8.0, 0.0, 8.0));
        selection.tool = Tool::Rotate;
        let center = store.bounding_box(id).unwrap().center();
        // 40° from +x snaps to 45°.
        let angle = 40f64.to_radians();
        let point = Vec3::new(center.x + angle.cos() * 3.0, 0.0, center.z + angle.sin() * 3.0);

        dispatcher
            .dispatch(&mut selection, &mut store, Gesture::Rotate { id, point })
            .unwrap();

        assert!((store.get(id).unwrap().rotation_y - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_drag_on_pivot_is_ignored() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        let id = add_default(&dispatcher, &mut selection, &mut store, Vec3::new(8.0, 0.0, 8.0));
        selection.tool = Tool::Rotate;
        let center = store.bounding_box(id).unwrap().center();

        let outcome = dispatcher
            .dispatch(&mut selection, &mut store, Gesture::Rotate { id, point: center })
            .unwrap();

        assert_eq!(outcome, GestureOutcome::Ignored);
    }

    #[test]
    fn test_rotate_drag_rejected_at_wall_keeps_rotation() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        let id = add_default(&dispatcher, &mut selection, &mut store, Vec3::new(0.0, 0.0, 18.5));
        selection.tool = Tool::Rotate;
        let center = store.bounding_box(id).unwrap().center();
        let point = Vec3::new(center.x, 0.0, center.z + 5.0);

        let result = dispatcher.dispatch(&mut selection, &mut store, Gesture::Rotate { id, point });

        assert_eq!(result, Err(LayoutError::OutOfBounds { id: Some(id) }));
        assert_eq!(store.get(id).unwrap().rotation_y, 0.0);
    }

    #[test]
    fn test_rotate_gesture_on_missing_item_returns_not_found() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        selection.tool = Tool::Rotate;
        let id = uuid::Uuid::new_v4();

        let result = dispatcher.dispatch(
            &mut selection,
            &mut store,
            Gesture::Rotate { id, point: Vec3::default() },
        );

        assert_eq!(result, Err(LayoutError::NotFound(id)));
    }

    // ── Remove / Recolor / Resize ─────────────────────────────────────────────

    #[test]
    fn test_remove_and_recolor_work_in_any_tool() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        let a = add_default(&dispatcher, &mut selection, &mut store, Vec3::default());
        let b = add_default(&dispatcher, &mut selection, &mut store, Vec3::new(5.0, 0.0, 5.0));
        selection.tool = Tool::Rotate;
        selection.color = Rgb::new(0x80, 0x80, 0x80);

        assert_eq!(
            dispatcher.dispatch(&mut selection, &mut store, Gesture::Recolor { id: a }),
            Ok(GestureOutcome::Recolored(a))
        );
        assert_eq!(
            dispatcher.dispatch(&mut selection, &mut store, Gesture::Remove { id: b }),
            Ok(GestureOutcome::Removed(b))
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(a).unwrap().color, Rgb::new(0x80, 0x80, 0x80));
    }

    #[test]
    fn test_set_room_dimensions_reports_clamped_items() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();
        add_default(&dispatcher, &mut selection, &mut store, Vec3::new(15.0, 0.0, 0.0));

        let outcome = dispatcher
            .dispatch(
                &mut selection,
                &mut store,
                Gesture::SetRoomDimensions { width: 5.0, length: 5.0, height: 8.0 },
            )
            .unwrap();

        assert_eq!(outcome, GestureOutcome::RoomResized { clamped: 1 });
        assert!(outcome.changed_layout());
    }

    #[test]
    fn test_invalid_room_dimensions_are_rejected() {
        let dispatcher = GestureDispatcher::default();
        let (mut selection, mut store) = make_session();

        let result = dispatcher.dispatch(
            &mut selection,
            &mut store,
            Gesture::SetRoomDimensions { width: -1.0, length: 5.0, height: 8.0 },
        );

        assert!(matches!(result, Err(LayoutError::InvalidDimension { .. })));
        assert_eq!(store.room(), &Room::default());
    }

    #[test]
    fn test_dispatcher_new_ignores_non_positive_snap() {
        assert_eq!(GestureDispatcher::new(-5.0).rotation_snap_degrees, 0.0);
        assert_eq!(GestureDispatcher::new(f64::NAN).rotation_snap_degrees, 0.0);
    }
}
