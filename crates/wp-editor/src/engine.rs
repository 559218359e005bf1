//! Scene engine: the operation set behind the visualizer's toolbar and
//! canvas.
//!
//! Every operation is a pure step `(current snapshot, intent) → next
//! snapshot` followed by a commit into the [`History`]. Committed snapshots
//! are mirrored to the store right away, so the saved design always matches
//! what is on screen.
//!
//! Operations naming an id that is not in the scene are silent no-ops, and
//! so is any operation whose result equals the current scene: neither pushes
//! a history entry nor clears redo.
//!
//! Pointer-driven edits use **gestures**: between `begin_gesture()` and the
//! matching `end_gesture()`, updates are applied to a draft that the
//! renderer sees live, and the outermost `end_gesture()` commits the net
//! change as a single undo step.

use crate::config::EngineConfig;
use crate::history::{EditKind, History};
use crate::persist::Persistence;
use crate::store::KeyValueStore;
use wp_core::id::{ElementId, IdAllocator};
use wp_core::model::{Element, ElementPatch, ImageRef, Scene, Snapshot};

/// Open gesture state.
#[derive(Debug)]
struct Gesture {
    /// Nesting depth; the gesture closes when this returns to zero.
    depth: usize,
    draft: Snapshot,
}

/// The scene, its undo history, and the store it is saved to.
pub struct SceneEngine<S: KeyValueStore> {
    history: History<Snapshot>,
    /// Not part of history and not persisted.
    background: Option<ImageRef>,
    ids: IdAllocator,
    gesture: Option<Gesture>,
    store: S,
    persistence: Persistence,
    config: EngineConfig,
}

impl<S: KeyValueStore> SceneEngine<S> {
    /// Start a session: restore the saved design from `store` (or start
    /// empty) with a fresh history.
    pub fn init(store: S, config: EngineConfig) -> Self {
        let persistence = Persistence::new(config.storage_key.clone());
        let mut restored = persistence.load(&store);
        let seeded = IdAllocator::seeded_past(restored.ids());
        let ids = match seeded {
            Some(ids) => ids,
            None => {
                log::warn!("saved design has ids past the allocator range, starting empty");
                restored = Snapshot::new();
                IdAllocator::new()
            }
        };
        let history = match config.history_limit {
            Some(limit) => History::with_max_depth(restored, limit),
            None => History::new(restored),
        };

        Self {
            history,
            background: None,
            ids,
            gesture: None,
            store,
            persistence,
            config,
        }
    }

    /// End the session: close any open gesture, write the final scene, and
    /// hand the store back.
    pub fn teardown(mut self) -> S {
        self.finish_gestures();
        self.persist();
        self.store
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    /// The live scene, including any uncommitted gesture draft.
    pub fn current(&self) -> Scene<'_> {
        Scene::new(self.live(), self.background.as_ref())
    }

    pub fn background(&self) -> Option<&ImageRef> {
        self.background.as_ref()
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    fn live(&self) -> &Snapshot {
        match &self.gesture {
            Some(g) => &g.draft,
            None => self.history.current(),
        }
    }

    // ─── Element operations ──────────────────────────────────────────────

    /// Place a new element at the default position and size, on top of the
    /// current stack.
    pub fn add_element(&mut self, image_ref: impl Into<ImageRef>) -> ElementId {
        let id = self.ids.allocate();
        let live = self.live();
        let element = Element::new(
            id,
            image_ref.into(),
            self.config.default_position,
            self.config.default_size,
            live.next_z(),
        );
        let next = live.with_appended(element);
        self.apply(EditKind::AddElement, Some(next));
        id
    }

    /// Override some of an element's geometry. Returns `false` when the id
    /// is unknown or the patch changes nothing.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let next = self.live().with_replaced(id, |e| e.patched(&patch));
        self.apply(EditKind::UpdateElement, next)
    }

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let next = self.live().without(id);
        self.apply(EditKind::RemoveElement, next)
    }

    /// Copy an element under a fresh id, offset by the configured delta.
    /// The source is left untouched.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let source = self.live().get(id)?.clone();
        let copy_id = self.ids.allocate();
        let copy = source.cloned_as(copy_id, self.config.duplicate_offset);
        let next = self.live().with_appended(copy);
        self.apply(EditKind::DuplicateElement, Some(next))
            .then_some(copy_id)
    }

    /// Raise an element's `z` by one. Other elements keep their `z`, so
    /// repeated calls can lift one element arbitrarily far above the rest.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        let next = self.live().with_replaced(id, Element::raised);
        self.apply(EditKind::BringForward, next)
    }

    /// Turn an element by one rotation step, wrapping at 360°.
    pub fn rotate(&mut self, id: ElementId) -> bool {
        let step = self.config.rotation_step;
        let next = self.live().with_replaced(id, |e| e.rotated_by(step));
        self.apply(EditKind::Rotate, next)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Step back one edit. An open gesture is committed first, so the undo
    /// reverses it.
    pub fn undo(&mut self) -> Option<EditKind> {
        self.finish_gestures();
        let kind = self.history.undo()?;
        log::debug!("undo {kind}");
        self.persist();
        Some(kind)
    }

    pub fn redo(&mut self) -> Option<EditKind> {
        self.finish_gestures();
        let kind = self.history.redo()?;
        log::debug!("redo {kind}");
        self.persist();
        Some(kind)
    }

    // ─── Background ──────────────────────────────────────────────────────

    /// Replace the background image. Bypasses history and persistence.
    pub fn set_background(&mut self, image_ref: impl Into<ImageRef>) {
        let image_ref = image_ref.into();
        log::debug!("background set to {image_ref:?}");
        self.background = Some(image_ref);
    }

    pub fn clear_background(&mut self) {
        if self.background.take().is_some() {
            log::debug!("background cleared");
        }
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Start (or nest into) a gesture. Edits until the matching
    /// `end_gesture()` become one undo step.
    pub fn begin_gesture(&mut self) {
        match &mut self.gesture {
            Some(g) => g.depth += 1,
            None => {
                self.gesture = Some(Gesture {
                    depth: 1,
                    draft: self.history.current().clone(),
                });
            }
        }
    }

    /// Close one gesture level. When the outermost level closes and the
    /// draft differs from the committed scene, commit it as a single
    /// [`EditKind::Gesture`] step. Returns whether a step was committed.
    pub fn end_gesture(&mut self) -> bool {
        let Some(g) = &mut self.gesture else {
            return false;
        };
        g.depth -= 1;
        if g.depth > 0 {
            return false;
        }
        let Some(Gesture { draft, .. }) = self.gesture.take() else {
            return false;
        };
        self.apply(EditKind::Gesture, Some(draft))
    }

    fn finish_gestures(&mut self) {
        if let Some(g) = &mut self.gesture {
            g.depth = 1;
            self.end_gesture();
        }
    }

    // ─── Commit path ─────────────────────────────────────────────────────

    /// Make `next` the live scene. `None` (target id absent) and a scene
    /// equal to the live one are elided.
    fn apply(&mut self, kind: EditKind, next: Option<Snapshot>) -> bool {
        let Some(next) = next else {
            log::trace!("{kind}: no matching element, skipped");
            return false;
        };
        if next == *self.live() {
            log::trace!("{kind}: scene unchanged, skipped");
            return false;
        }

        if let Some(g) = &mut self.gesture {
            g.draft = next;
            return true;
        }

        self.history.commit(next, kind);
        log::debug!(
            "{kind}: {} element(s), undo depth {}",
            self.history.current().len(),
            self.history.undo_depth()
        );
        self.persist();
        true
    }

    fn persist(&mut self) {
        self.persistence.save(&mut self.store, self.history.current());
    }
}
