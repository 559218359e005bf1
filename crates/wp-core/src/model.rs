//! Core scene data model.
//!
//! A scene is a flat collection of image elements layered over an optional
//! background. Visual stacking is governed by each element's `z`, never by
//! its position in the collection. Every change produces a new value: an
//! `Element` is never edited in place, and a `Snapshot` is a fully owned copy
//! of the collection that can be parked in the undo history without aliasing
//! live state.

use crate::id::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest width or height an element can be resized to.
pub const MIN_SIZE: f32 = 1.0;

/// A full turn, in degrees.
pub const FULL_TURN: f32 = 360.0;

/// Wrap an angle into `[0, 360)`.
pub fn normalize_rotation(degrees: f32) -> f32 {
    let r = degrees.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if r >= FULL_TURN { 0.0 } else { r }
}

// ─── Image references ────────────────────────────────────────────────────

/// Opaque reference to a visual asset: a catalog image name, a path, or a
/// data URL. The engine never looks inside it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(s: impl Into<String>) -> Self {
        ImageRef(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Data URLs can be megabytes long.
        const MAX: usize = 48;
        match self.0.char_indices().nth(MAX) {
            Some((cut, _)) => write!(f, "ImageRef({:?}…)", &self.0[..cut]),
            None => write!(f, "ImageRef({:?})", self.0),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(s: &str) -> Self {
        ImageRef::new(s)
    }
}

impl From<String> for ImageRef {
    fn from(s: String) -> Self {
        ImageRef(s)
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// One placed image instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(alias = "src")]
    pub image_ref: ImageRef,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub z: i64,
    /// Degrees, always in `[0, 360)`.
    #[serde(default)]
    pub rotation: f32,
}

impl Element {
    pub fn new(
        id: ElementId,
        image_ref: ImageRef,
        (x, y): (f32, f32),
        (width, height): (f32, f32),
        z: i64,
    ) -> Self {
        Self {
            id,
            image_ref,
            x,
            y,
            width: width.max(MIN_SIZE),
            height: height.max(MIN_SIZE),
            z,
            rotation: 0.0,
        }
    }

    /// Copy of `self` with the patch's fields overridden. `id`, `image_ref`
    /// and `z` are never touched by a patch.
    pub fn patched(&self, patch: &ElementPatch) -> Self {
        let mut next = self.clone();
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            next.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            next.y = y;
        }
        if let Some(w) = patch.width.filter(|v| v.is_finite()) {
            next.width = w.max(MIN_SIZE);
        }
        if let Some(h) = patch.height.filter(|v| v.is_finite()) {
            next.height = h.max(MIN_SIZE);
        }
        if let Some(r) = patch.rotation.filter(|v| v.is_finite()) {
            next.rotation = normalize_rotation(r);
        }
        next
    }

    /// Copy moved by `(dx, dy)` under a new id.
    pub fn cloned_as(&self, id: ElementId, (dx, dy): (f32, f32)) -> Self {
        Self {
            id,
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    pub fn rotated_by(&self, step: f32) -> Self {
        Self {
            rotation: normalize_rotation(self.rotation + step),
            ..self.clone()
        }
    }

    /// Copy one level higher in the stack.
    pub fn raised(&self) -> Self {
        Self {
            z: self.z.saturating_add(1),
            ..self.clone()
        }
    }
}

/// Typed partial update for an element's geometry. `None` fields are left
/// as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
}

impl ElementPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    /// A resize from a corner handle moves the origin too.
    pub fn bounds(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            rotation: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ─── Snapshots ───────────────────────────────────────────────────────────

/// An owned copy of the element collection: the unit of undo history.
///
/// The transforming methods return `None` when the target id is absent, so
/// callers can skip committing a scene identical to the current one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    elements: Vec<Element>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().map(|e| e.id)
    }

    /// `z` a freshly added element receives: the current element count, so
    /// new elements land on top of an untouched stack.
    pub fn next_z(&self) -> i64 {
        i64::try_from(self.elements.len()).unwrap_or(i64::MAX)
    }

    /// Elements back-to-front: ascending `z`, ties kept in collection order.
    pub fn draw_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z);
        ordered
    }

    pub fn with_appended(&self, element: Element) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend(self.elements.iter().cloned());
        elements.push(element);
        Self { elements }
    }

    /// Replace the element with `id` by `f(element)`, leaving all others
    /// untouched.
    pub fn with_replaced<F>(&self, id: ElementId, f: F) -> Option<Self>
    where
        F: FnOnce(&Element) -> Element,
    {
        let pos = self.elements.iter().position(|e| e.id == id)?;
        let mut elements = self.elements.clone();
        let next = f(&elements[pos]);
        debug_assert_eq!(next.id, id, "element transforms must preserve id");
        elements[pos] = next;
        Some(Self { elements })
    }

    pub fn without(&self, id: ElementId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let elements = self.elements.iter().filter(|e| e.id != id).cloned().collect();
        Some(Self { elements })
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// Read-only view of the live scene: the current snapshot plus the
/// background, which lives outside the undo history.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    snapshot: &'a Snapshot,
    background: Option<&'a ImageRef>,
}

impl<'a> Scene<'a> {
    pub fn new(snapshot: &'a Snapshot, background: Option<&'a ImageRef>) -> Self {
        Self {
            snapshot,
            background,
        }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn elements(&self) -> &'a [Element] {
        self.snapshot.elements()
    }

    pub fn background(&self) -> Option<&'a ImageRef> {
        self.background
    }

    pub fn get(&self, id: ElementId) -> Option<&'a Element> {
        self.snapshot.get(id)
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn draw_order(&self) -> Vec<&'a Element> {
        self.snapshot.draw_order()
    }
}
