use crate::persist::DEFAULT_KEY;
use std::num::NonZeroUsize;

// ─── Config ───────────────────────────────────────────────────────────────

/// Tunables for a [`SceneEngine`](crate::engine::SceneEngine).
///
/// The defaults reproduce the stock visualizer: new windows at `(50, 50)`,
/// `160 × 160`, duplicates offset by `(20, 20)`, rotation in 15° steps, and
/// an unbounded undo history.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Store key the design is saved under. Default: `"savedDesign"`.
    pub storage_key: String,

    /// Maximum undo depth; the oldest entries are evicted first. A limit of
    /// zero would disable undo, so it is not representable.
    /// Default: **unbounded** (`None`).
    pub history_limit: Option<NonZeroUsize>,

    pub duplicate_offset: (f32, f32),

    /// Degrees added by each `rotate` call.
    pub rotation_step: f32,

    pub default_position: (f32, f32),

    pub default_size: (f32, f32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_KEY.to_string(),
            history_limit: None,
            duplicate_offset: (20.0, 20.0),
            rotation_step: 15.0,
            default_position: (50.0, 50.0),
            default_size: (160.0, 160.0),
        }
    }
}

impl EngineConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_history_limit(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_duplicate_offset(mut self, dx: f32, dy: f32) -> Self {
        self.duplicate_offset = (dx, dy);
        self
    }

    pub fn with_rotation_step(mut self, degrees: f32) -> Self {
        self.rotation_step = degrees;
        self
    }

    pub fn with_default_placement(mut self, position: (f32, f32), size: (f32, f32)) -> Self {
        self.default_position = position;
        self.default_size = size;
        self
    }
}
