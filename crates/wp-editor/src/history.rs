//! Undo/Redo history of full scene snapshots.
//!
//! Every edit pushes the scene it replaces onto `past`; undo and redo move
//! whole snapshots between the two stacks, so there is no inverse logic and
//! no replay. Each transition carries the [`EditKind`] that produced it, so
//! the label moves together with the snapshot in both directions.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

/// What produced a history transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    AddElement,
    UpdateElement,
    RemoveElement,
    DuplicateElement,
    BringForward,
    Rotate,
    /// Several updates coalesced into one step (drag/resize in progress).
    Gesture,
}

impl EditKind {
    pub fn description(self) -> &'static str {
        match self {
            EditKind::AddElement => "add element",
            EditKind::UpdateElement => "update element",
            EditKind::RemoveElement => "remove element",
            EditKind::DuplicateElement => "duplicate element",
            EditKind::BringForward => "bring forward",
            EditKind::Rotate => "rotate",
            EditKind::Gesture => "canvas edit",
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone)]
struct Entry<S> {
    snapshot: S,
    kind: EditKind,
}

/// Two stacks around a live value.
///
/// `past` is kept oldest → newest. `future` is stored newest-undo-last so
/// that redo is a `pop`; [`future`](Self::future) iterates it in redo order.
#[derive(Debug, Clone)]
pub struct History<S> {
    current: S,
    past: VecDeque<Entry<S>>,
    future: Vec<Entry<S>>,
    /// Maximum `past` depth. `None` = unbounded.
    max_depth: Option<NonZeroUsize>,
}

impl<S> History<S> {
    pub fn new(current: S) -> Self {
        Self {
            current,
            past: VecDeque::new(),
            future: Vec::new(),
            max_depth: None,
        }
    }

    /// Cap `past` at `max_depth` entries, dropping the oldest first.
    pub fn with_max_depth(current: S, max_depth: NonZeroUsize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Self::new(current)
        }
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    /// Make `next` live, recording the old value for undo. Always clears
    /// redo: history does not branch.
    pub fn commit(&mut self, next: S, kind: EditKind) {
        let prev = std::mem::replace(&mut self.current, next);
        self.past.push_back(Entry {
            snapshot: prev,
            kind,
        });
        if let Some(max) = self.max_depth.map(NonZeroUsize::get) {
            while self.past.len() > max {
                self.past.pop_front();
            }
        }
        self.future.clear();
    }

    /// Step back one edit. Returns `None` and changes nothing when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<EditKind> {
        let Entry { snapshot, kind } = self.past.pop_back()?;
        let undone = std::mem::replace(&mut self.current, snapshot);
        self.future.push(Entry {
            snapshot: undone,
            kind,
        });
        Some(kind)
    }

    /// Step forward one undone edit. Returns `None` and changes nothing when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Option<EditKind> {
        let Entry { snapshot, kind } = self.future.pop()?;
        let prev = std::mem::replace(&mut self.current, snapshot);
        self.past.push_back(Entry {
            snapshot: prev,
            kind,
        });
        Some(kind)
    }

    /// Replace the live value and forget both stacks.
    pub fn reset(&mut self, current: S) {
        self.current = current;
        self.past.clear();
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Older snapshots, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &S> + '_ {
        self.past.iter().map(|e| &e.snapshot)
    }

    /// Newer snapshots, next redo target first.
    pub fn future(&self) -> impl Iterator<Item = &S> + '_ {
        self.future.iter().rev().map(|e| &e.snapshot)
    }

    /// Label of the edit `undo` would reverse.
    pub fn undo_kind(&self) -> Option<EditKind> {
        self.past.back().map(|e| e.kind)
    }

    /// Label of the edit `redo` would reapply.
    pub fn redo_kind(&self) -> Option<EditKind> {
        self.future.last().map(|e| e.kind)
    }
}

impl<S: Default> Default for History<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
