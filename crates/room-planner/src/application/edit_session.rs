//! EditSession: one user's editing session.
//!
//! The session owns the [`PlacementStore`], the ephemeral [`Selection`], and
//! an edit counter.  The counter increments on every accepted mutation and is
//! the only thing the asynchronous save/load paths use to reason about
//! ordering:
//!
//! ```text
//!   begin_save ──► (repository put, no lock held) ──► complete_save
//!        │ stamp = counter                               marks clean up to stamp
//!
//!   begin_load ──► (repository get, no lock held) ──► apply_load
//!        │ stamp = counter                               applies only if counter == stamp
//! ```
//!
//! A load that races with a user edit is discarded as stale rather than
//! overwriting the edit.
//!
//! Each layout also carries a generation, bumped whenever `new_layout` or an
//! applied load replaces it.  A save that completes after the layout was
//! replaced still reports its id, but does not bind that id to the new layout.

use std::sync::Arc;

use room_core::{deserialize, serialize, Catalog, LayoutError, LayoutSnapshot, PlacementStore, Room};
use tracing::{debug, info};

use crate::application::dispatch_gesture::{Gesture, GestureDispatcher, GestureOutcome, Selection};
use crate::application::persist_layout::{LayoutId, SavedLayout, SessionError};

/// A snapshot captured for saving, tagged with the edit counter it reflects.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub snapshot: LayoutSnapshot,
    /// Edit counter at capture time.
    pub edit_stamp: u64,
    /// Layout id to overwrite, if this session was saved or loaded before.
    pub layout_id: Option<LayoutId>,
    /// Layout generation at capture time.
    pub generation: u64,
}

/// Token returned by [`EditSession::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub layout_id: LayoutId,
    pub edit_stamp: u64,
}

/// Result of [`EditSession::apply_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched layout replaced the session's layout.
    Applied,
    /// The user edited while the fetch was in flight; the result was dropped.
    Stale,
}

/// One editing session.
#[derive(Debug)]
pub struct EditSession {
    store: PlacementStore,
    selection: Selection,
    dispatcher: GestureDispatcher,
    default_room: Room,
    edit_counter: u64,
    /// Edit counter value the persisted copy corresponds to.
    clean_at: u64,
    /// Bumped each time the whole layout is replaced.
    generation: u64,
    layout_id: Option<LayoutId>,
}

impl EditSession {
    /// Starts a session with an empty `default_room`.
    pub fn new(catalog: Arc<Catalog>, default_room: Room, dispatcher: GestureDispatcher) -> Self {
        let selection = Selection::for_catalog(&catalog);
        info!(
            width = default_room.width(),
            length = default_room.length(),
            height = default_room.height(),
            "edit session started"
        );
        Self {
            store: PlacementStore::new(default_room, catalog),
            selection,
            dispatcher,
            default_room,
            edit_counter: 0,
            clean_at: 0,
            generation: 0,
            layout_id: None,
        }
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn edit_counter(&self) -> u64 {
        self.edit_counter
    }

    /// Generation of the current layout.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Id of the persisted layout this session last saved to or loaded from.
    pub fn layout_id(&self) -> Option<LayoutId> {
        self.layout_id
    }

    /// Returns `true` if there are edits not covered by a completed save.
    pub fn is_dirty(&self) -> bool {
        self.edit_counter != self.clean_at
    }

    /// Dispatches one front-end gesture.
    ///
    /// # Errors
    ///
    /// Returns the rejected operation's [`LayoutError`]; the session is unchanged.
    pub fn apply(&mut self, gesture: Gesture) -> Result<GestureOutcome, LayoutError> {
        let outcome = self
            .dispatcher
            .dispatch(&mut self.selection, &mut self.store, gesture)?;
        if outcome.changed_layout() {
            self.edit_counter += 1;
        }
        Ok(outcome)
    }

    /// Discards the layout and starts over with an empty default room.
    ///
    /// The selection is kept.  The new layout is not associated with any
    /// persisted id until it is saved.
    pub fn new_layout(&mut self) {
        self.store = PlacementStore::new(self.default_room, Arc::clone(self.store.catalog()));
        self.edit_counter += 1;
        self.clean_at = self.edit_counter;
        self.generation += 1;
        self.layout_id = None;
        info!(edit_counter = self.edit_counter, "new layout");
    }

    /// Captures the current layout for saving.  Editing may continue while
    /// the save is in flight.
    pub fn begin_save(&self) -> PendingSave {
        PendingSave {
            snapshot: serialize(self.store.room(), self.store.list()),
            edit_stamp: self.edit_counter,
            layout_id: self.layout_id,
            generation: self.generation,
        }
    }

    /// Records a successful save.
    ///
    /// Edits made after the save's stamp keep the session dirty.  Returns
    /// `false` if the layout was replaced while the save was in flight; the
    /// current layout then keeps its own id and dirty state.
    pub fn complete_save(&mut self, saved: &SavedLayout) -> bool {
        if saved.generation != self.generation {
            info!(
                layout_id = %saved.layout_id,
                saved_generation = saved.generation,
                generation = self.generation,
                "save completed for a replaced layout"
            );
            return false;
        }
        self.layout_id = Some(saved.layout_id);
        if saved.edit_stamp > self.clean_at {
            self.clean_at = saved.edit_stamp;
        }
        debug!(
            layout_id = %saved.layout_id,
            edit_stamp = saved.edit_stamp,
            dirty = self.is_dirty(),
            "save completed"
        );
        true
    }

    /// Starts loading `layout_id`; pass the ticket to [`Self::apply_load`].
    pub fn begin_load(&self, layout_id: LayoutId) -> LoadTicket {
        LoadTicket {
            layout_id,
            edit_stamp: self.edit_counter,
        }
    }

    /// Applies a fetched snapshot if no edit happened since `ticket` was issued.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Layout`] if the snapshot is malformed or names an
    /// unknown archetype.  The session is left untouched in that case.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        snapshot: &LayoutSnapshot,
    ) -> Result<LoadOutcome, SessionError> {
        if ticket.edit_stamp != self.edit_counter {
            info!(
                layout_id = %ticket.layout_id,
                stamp = ticket.edit_stamp,
                edit_counter = self.edit_counter,
                "discarding stale load"
            );
            return Ok(LoadOutcome::Stale);
        }

        let store = deserialize(snapshot, Arc::clone(self.store.catalog()))?;
        self.store = store;
        self.edit_counter += 1;
        self.clean_at = self.edit_counter;
        self.generation += 1;
        self.layout_id = Some(ticket.layout_id);
        info!(
            layout_id = %ticket.layout_id,
            items = self.store.len(),
            "layout loaded"
        );
        Ok(LoadOutcome::Applied)
    }
}
