//! Built-in window styles offered by the visualizer palette.

use crate::model::ImageRef;
use std::fmt;

/// Colour variants of the stock window overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowStyle {
    White,
    Black,
    Brown,
    Clay,
}

impl WindowStyle {
    /// Palette order.
    pub const ALL: [WindowStyle; 4] = [
        WindowStyle::White,
        WindowStyle::Black,
        WindowStyle::Brown,
        WindowStyle::Clay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WindowStyle::White => "White",
            WindowStyle::Black => "Black",
            WindowStyle::Brown => "Brown",
            WindowStyle::Clay => "Clay",
        }
    }

    pub fn asset_name(self) -> &'static str {
        match self {
            WindowStyle::White => "window-white.png",
            WindowStyle::Black => "window-black.png",
            WindowStyle::Brown => "window-brown.png",
            WindowStyle::Clay => "window-clay.png",
        }
    }

    pub fn image_ref(self) -> ImageRef {
        ImageRef::new(self.asset_name())
    }

    /// Case-insensitive label lookup (`"white"`, `"Clay"`, …).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for WindowStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
