//! Integration tests: scene operations + undo/redo history (wp-editor).
//!
//! Drives the SceneEngine through its public operation set and checks the
//! history laws across crate boundaries.

use pretty_assertions::assert_eq;
use std::num::NonZeroUsize;
use wp_core::id::ElementId;
use wp_core::model::{ElementPatch, Snapshot};
use wp_core::WindowStyle;
use wp_editor::{EditKind, EngineConfig, MemoryStore, SceneEngine};

fn make_engine() -> SceneEngine<MemoryStore> {
    SceneEngine::init(MemoryStore::new(), EngineConfig::default())
}

fn snapshot(engine: &SceneEngine<MemoryStore>) -> Snapshot {
    engine.current().snapshot().clone()
}

fn zs(engine: &SceneEngine<MemoryStore>) -> Vec<i64> {
    engine.current().elements().iter().map(|e| e.z).collect()
}

// ─── Walkthrough ────────────────────────────────────────────────────────

#[test]
fn layering_walkthrough() {
    let mut engine = make_engine();

    let a = engine.add_element(WindowStyle::White.image_ref());
    assert_eq!(zs(&engine), vec![0]);
    let b = engine.add_element(WindowStyle::Black.image_ref());
    assert_eq!(zs(&engine), vec![0, 1]);

    assert!(engine.bring_forward(a));
    assert_eq!(zs(&engine), vec![1, 1]);

    assert_eq!(engine.undo(), Some(EditKind::BringForward));
    assert_eq!(zs(&engine), vec![0, 1]);
    assert_eq!(engine.undo(), Some(EditKind::AddElement));
    assert_eq!(zs(&engine), vec![0]);
    assert!(engine.current().get(b).is_none());

    assert_eq!(engine.redo(), Some(EditKind::AddElement));
    assert_eq!(engine.redo(), Some(EditKind::BringForward));
    assert_eq!(zs(&engine), vec![1, 1]);
    assert_eq!(engine.current().get(a).unwrap().z, 1);
    assert_eq!(engine.current().get(b).unwrap().z, 1);
}

// ─── History laws ───────────────────────────────────────────────────────

/// Runs one of each operation against the same fixture scene.
fn each_operation(engine: &mut SceneEngine<MemoryStore>, target: ElementId, op: usize) {
    match op {
        0 => {
            engine.add_element("window-brown.png");
        }
        1 => {
            engine.update_element(target, ElementPatch::bounds(1.0, 2.0, 30.0, 40.0));
        }
        2 => {
            engine.remove_element(target);
        }
        3 => {
            engine.duplicate_element(target);
        }
        4 => {
            engine.bring_forward(target);
        }
        5 => {
            engine.rotate(target);
        }
        _ => unreachable!(),
    }
}

#[test]
fn undo_restores_scene_before_each_operation() {
    for op in 0..6 {
        let mut engine = make_engine();
        let target = engine.add_element("window-white.png");
        engine.add_element("window-clay.png");
        let before = snapshot(&engine);

        each_operation(&mut engine, target, op);
        assert_ne!(snapshot(&engine), before, "op {op} changed nothing");
        let after = snapshot(&engine);

        engine.undo();
        assert_eq!(snapshot(&engine), before, "undo after op {op}");

        engine.redo();
        assert_eq!(snapshot(&engine), after, "redo after op {op}");
    }
}

#[test]
fn new_edit_after_undo_clears_redo() {
    let mut engine = make_engine();
    let a = engine.add_element("a");
    engine.rotate(a);
    engine.rotate(a);
    engine.undo();
    engine.undo();
    assert_eq!(engine.history().redo_depth(), 2);

    engine.bring_forward(a);
    assert!(!engine.can_redo());
    assert_eq!(engine.redo(), None);
    assert_eq!(engine.current().get(a).unwrap().rotation, 0.0);
}

#[test]
fn boundary_undo_redo_leave_everything_unchanged() {
    let mut engine = make_engine();
    assert_eq!(engine.undo(), None);
    assert_eq!(engine.redo(), None);
    assert!(engine.current().is_empty());

    engine.add_element("a");
    let before = snapshot(&engine);
    assert_eq!(engine.redo(), None);
    assert_eq!(snapshot(&engine), before);
    assert_eq!(engine.history().undo_depth(), 1);
    assert_eq!(engine.history().redo_depth(), 0);

    engine.undo();
    assert_eq!(engine.undo(), None);
    assert!(engine.current().is_empty());
    assert_eq!(engine.history().redo_depth(), 1);
}

#[test]
fn unknown_id_operations_are_silent_no_ops() {
    let mut engine = make_engine();
    let a = engine.add_element("a");
    engine.rotate(a);
    engine.undo();

    let ghost = ElementId::from_raw(9_999);
    let before = snapshot(&engine);

    assert!(!engine.update_element(ghost, ElementPatch::position(0.0, 0.0)));
    assert!(!engine.remove_element(ghost));
    assert_eq!(engine.duplicate_element(ghost), None);
    assert!(!engine.bring_forward(ghost));
    assert!(!engine.rotate(ghost));

    assert_eq!(snapshot(&engine), before);
    assert_eq!(engine.history().undo_depth(), 1);
    // Redo survives because nothing was committed.
    assert_eq!(engine.redo(), Some(EditKind::Rotate));
}

#[test]
fn duplicate_adds_exactly_one_element() {
    let mut engine = make_engine();
    let a = engine.add_element("a");
    engine.update_element(a, ElementPatch::position(10.0, 15.0));
    engine.rotate(a);
    let source = engine.current().get(a).unwrap().clone();

    let copy = engine.duplicate_element(a).unwrap();
    let scene = engine.current();
    assert_eq!(scene.len(), 2);
    assert!(scene.elements().iter().filter(|e| e.id == copy).count() == 1);
    assert_eq!(scene.get(a).unwrap(), &source);

    let dup = scene.get(copy).unwrap();
    assert_eq!((dup.x, dup.y), (30.0, 35.0));
    assert_eq!((dup.width, dup.height, dup.rotation), (source.width, source.height, 15.0));
}

#[test]
fn twenty_four_rotations_return_to_start() {
    let mut engine = make_engine();
    let a = engine.add_element("a");
    engine.update_element(a, ElementPatch::rotation(30.0));
    for _ in 0..24 {
        assert!(engine.rotate(a));
    }
    assert_eq!(engine.current().get(a).unwrap().rotation, 30.0);
}

#[test]
fn bring_forward_never_renormalizes() {
    let mut engine = make_engine();
    let a = engine.add_element("a");
    let b = engine.add_element("b");
    let c = engine.add_element("c");
    for _ in 0..10 {
        engine.bring_forward(a);
    }
    assert_eq!(zs(&engine), vec![10, 1, 2]);

    let order: Vec<ElementId> = engine.current().draw_order().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![b, c, a]);
}

#[test]
fn history_limit_evicts_oldest() {
    let config = EngineConfig::default().with_history_limit(NonZeroUsize::new(2));
    let mut engine = SceneEngine::init(MemoryStore::new(), config);
    let a = engine.add_element("a");
    engine.rotate(a);
    engine.rotate(a);
    engine.rotate(a);

    let mut undone = Vec::new();
    while let Some(kind) = engine.undo() {
        undone.push(kind);
    }
    assert_eq!(undone, vec![EditKind::Rotate, EditKind::Rotate]);
    assert_eq!(engine.current().get(a).unwrap().rotation, 15.0);
}
