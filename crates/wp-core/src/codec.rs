//! Persisted record codec.
//!
//! The saved design is one JSON document:
//!
//! ```json
//! { "version": 1, "elements": [ { "id": 1, "imageRef": "window-white.png",
//!   "x": 50, "y": 50, "width": 160, "height": 160, "z": 0, "rotation": 0 } ] }
//! ```
//!
//! Records written before the version field existed are a bare element array
//! whose image field is named `src`; they still decode.

use crate::id::MAX_ELEMENT_ID;
use crate::model::{Element, MIN_SIZE, Snapshot, normalize_rotation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Record format written by [`encode`].
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record version {0} is newer than supported version {RECORD_VERSION}")]
    UnsupportedVersion(u32),

    #[error("record is neither an element list nor a versioned object")]
    UnexpectedShape,
}

#[derive(Serialize)]
struct RecordRef<'a> {
    version: u32,
    elements: &'a [Element],
}

#[derive(Deserialize)]
struct Record {
    version: u32,
    elements: Vec<Element>,
}

/// Serialize a snapshot as a versioned record.
pub fn encode(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(&RecordRef {
        version: RECORD_VERSION,
        elements: snapshot.elements(),
    })
}

/// Parse a record (versioned or legacy) back into a snapshot.
///
/// Decoded elements are brought back within the model's invariants: rotation
/// wrapped into `[0, 360)`, sizes clamped to [`MIN_SIZE`], and repeated ids
/// dropped after their first occurrence. Elements whose geometry overflows
/// `f32` or whose id is 0 or above [`MAX_ELEMENT_ID`] are dropped, so one bad
/// entry never costs the rest of the design.
pub fn decode(text: &str) -> Result<Snapshot, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    let elements = match value {
        Value::Array(_) => serde_json::from_value::<Vec<Element>>(value)?,
        Value::Object(map) if map.contains_key("version") => {
            let record: Record = serde_json::from_value(Value::Object(map))?;
            if record.version > RECORD_VERSION {
                return Err(DecodeError::UnsupportedVersion(record.version));
            }
            record.elements
        }
        _ => return Err(DecodeError::UnexpectedShape),
    };
    Ok(Snapshot::from_elements(sanitize(elements)))
}

fn sanitize(elements: Vec<Element>) -> Vec<Element> {
    let mut seen = HashSet::with_capacity(elements.len());
    elements
        .into_iter()
        .filter(|e| {
            let raw = e.id.raw();
            if raw == 0 || raw > MAX_ELEMENT_ID {
                log::warn!("dropping element with out-of-range id {}", e.id);
                return false;
            }
            if ![e.x, e.y, e.width, e.height].iter().all(|v| v.is_finite()) {
                log::warn!("dropping element {} with non-finite geometry", e.id);
                return false;
            }
            let fresh = seen.insert(e.id);
            if !fresh {
                log::warn!("dropping element with repeated id {}", e.id);
            }
            fresh
        })
        .map(|mut e| {
            if !e.rotation.is_finite() {
                e.rotation = 0.0;
            }
            e.rotation = normalize_rotation(e.rotation);
            e.width = e.width.max(MIN_SIZE);
            e.height = e.height.max(MIN_SIZE);
            e
        })
        .collect()
}
