//! Drives a [`SceneEngine`] from parsed intents.

use crate::script::{HELP, Intent, parse_line};
use serde_json::json;
use std::io::{self, BufRead, Write};
use wp_editor::{KeyValueStore, SceneEngine};

/// Apply one intent and describe the outcome in a single line (or a JSON
/// document for `show`).
pub fn execute<S: KeyValueStore>(engine: &mut SceneEngine<S>, intent: Intent) -> String {
    match intent {
        Intent::Add(image_ref) => {
            let id = engine.add_element(image_ref);
            format!("added {id}")
        }
        Intent::Update(id, patch) => {
            if engine.update_element(id, patch) {
                format!("updated {id}")
            } else {
                unchanged(engine, id)
            }
        }
        Intent::Remove(id) => {
            if engine.remove_element(id) {
                format!("removed {id}")
            } else {
                unchanged(engine, id)
            }
        }
        Intent::Duplicate(id) => match engine.duplicate_element(id) {
            Some(copy) => format!("duplicated {id} as {copy}"),
            None => unchanged(engine, id),
        },
        Intent::Forward(id) => {
            if engine.bring_forward(id) {
                let z = engine.current().get(id).map_or(0, |e| e.z);
                format!("{id} now at z={z}")
            } else {
                unchanged(engine, id)
            }
        }
        Intent::Rotate(id) => {
            if engine.rotate(id) {
                let r = engine.current().get(id).map_or(0.0, |e| e.rotation);
                format!("{id} rotated to {r}°")
            } else {
                unchanged(engine, id)
            }
        }
        Intent::Undo => match engine.undo() {
            Some(kind) => format!("undid {kind}"),
            None => "nothing to undo".to_string(),
        },
        Intent::Redo => match engine.redo() {
            Some(kind) => format!("redid {kind}"),
            None => "nothing to redo".to_string(),
        },
        Intent::Background(image_ref) => {
            engine.set_background(image_ref);
            "background set".to_string()
        }
        Intent::ClearBackground => {
            engine.clear_background();
            "background cleared".to_string()
        }
        Intent::BeginGesture => {
            engine.begin_gesture();
            "gesture started".to_string()
        }
        Intent::EndGesture => {
            if engine.end_gesture() {
                "gesture committed".to_string()
            } else if engine.in_gesture() {
                "gesture continues".to_string()
            } else {
                "gesture ended, nothing to commit".to_string()
            }
        }
        Intent::Show => render_json(engine),
        Intent::Help => HELP.to_string(),
    }
}

fn unchanged<S: KeyValueStore>(engine: &SceneEngine<S>, id: wp_core::ElementId) -> String {
    if engine.current().get(id).is_some() {
        format!("{id} unchanged")
    } else {
        format!("no element {id}")
    }
}

/// The live scene as pretty JSON, elements listed back-to-front.
pub fn render_json<S: KeyValueStore>(engine: &SceneEngine<S>) -> String {
    let scene = engine.current();
    let doc = json!({
        "background": scene.background(),
        "elements": scene.draw_order(),
        "canUndo": engine.can_undo(),
        "canRedo": engine.can_redo(),
    });
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".to_string())
}

/// Read intents from `input` until EOF. Results go to `out`; parse errors go
/// to `err` and do not end the session.
pub fn run<S, R, W, E>(engine: &mut SceneEngine<S>, input: R, mut out: W, mut err: E) -> io::Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
    E: Write,
{
    for (n, line) in input.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Ok(Some(intent)) => {
                log::trace!("line {}: {intent:?}", n + 1);
                writeln!(out, "{}", execute(engine, intent))?;
            }
            Ok(None) => {}
            Err(e) => writeln!(err, "line {}: {e}", n + 1)?,
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wp_editor::{EngineConfig, MemoryStore};

    fn session(script: &str) -> (SceneEngine<MemoryStore>, String, String) {
        let mut engine = SceneEngine::init(MemoryStore::new(), EngineConfig::default());
        let mut out = Vec::new();
        let mut err = Vec::new();
        run(&mut engine, script.as_bytes(), &mut out, &mut err).unwrap();
        (
            engine,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn script_drives_the_engine() {
        let (engine, out, err) = session(
            "add white\n\
             add black\n\
             forward #1\n\
             undo\n\
             undo\n\
             redo\n\
             redo\n",
        );
        assert_eq!(err, "");
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec![
                "added #1",
                "added #2",
                "#1 now at z=1",
                "undid bring forward",
                "undid add element",
                "redid add element",
                "redid bring forward",
            ]
        );
        let zs: Vec<i64> = engine.current().elements().iter().map(|e| e.z).collect();
        assert_eq!(zs, vec![1, 1]);
    }

    #[test]
    fn bad_lines_are_reported_and_skipped() {
        let (engine, out, err) = session("add clay\nspin 1\nrotate 1\nrotate 42\n");
        assert_eq!(err, "line 2: unknown command `spin` (try `help`)\n");
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec!["added #1", "#1 rotated to 15°", "no element #42"]
        );
        assert_eq!(engine.history().undo_depth(), 2);
    }

    #[test]
    fn gestures_over_the_script() {
        let (engine, out, _) = session("add white\nbegin\nmove 1 10 10\nmove 1 20 20\nend\n");
        assert!(out.ends_with("gesture committed\n"));
        assert_eq!(engine.history().undo_depth(), 2);
    }

    #[test]
    fn show_lists_back_to_front() {
        let (engine, _, _) = session("add white\nadd black\nforward 1\nforward 1\nbackground house.jpg\n");
        let doc: serde_json::Value = serde_json::from_str(&render_json(&engine)).unwrap();
        assert_eq!(doc["background"], "house.jpg");
        assert_eq!(doc["elements"][0]["id"], 2);
        assert_eq!(doc["elements"][1]["id"], 1);
        assert_eq!(doc["canUndo"], true);
    }
}
