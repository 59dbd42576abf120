//! Input events at the core boundary and the player intents they map to.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// A released key, as far as the game cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character key.
    Char(char),
    /// The space bar.
    Space,
    /// Any other key.
    Other,
}

/// One discrete event from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// The window was closed.
    Quit,
    /// Left click at a board pixel.
    PrimaryClick(Point),
    /// Right click at a board pixel.
    SecondaryClick(Point),
    /// Middle click; position is irrelevant.
    TertiaryClick,
    /// A key was released.
    KeyRelease(Key),
}

/// What the player asked for, independent of the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Intent {
    /// Leave the game.
    Quit,
    /// Pick, deselect or swap the tile under the pointer.
    Pick(Point),
    /// Drop the current selection.
    Cancel,
    /// Show or hide the full reference image.
    ToggleReference,
    /// Abandon the current puzzle for the next one.
    Skip,
    /// Move on from a solved puzzle.
    Continue,
}

impl Intent {
    /// Maps an event to an intent; unmapped keys yield `None`.
    pub fn from_event(event: InputEvent) -> Option<Self> {
        match event {
            InputEvent::Quit => Some(Self::Quit),
            InputEvent::PrimaryClick(point) => Some(Self::Pick(point)),
            InputEvent::SecondaryClick(_) => Some(Self::Cancel),
            InputEvent::TertiaryClick => Some(Self::ToggleReference),
            InputEvent::KeyRelease(Key::Char('s' | 'S')) => Some(Self::Skip),
            InputEvent::KeyRelease(Key::Space | Key::Char(' ')) => Some(Self::Continue),
            InputEvent::KeyRelease(_) => None,
        }
    }
}
