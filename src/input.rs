//! Input model: the drag state machine, unified pointer samples, and the keymap.
//!
//! `DragState` is the active gesture tracked between pointer-down and
//! pointer-up; exactly one variant is live at a time, so a move and a resize
//! can never both be in progress. `PointerSample` folds mouse and touch events
//! into a single canvas-space point, following only the first finger of a
//! touch gesture. `Keymap` maps browser key names to editor commands.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::RECENT_NAMES_CAPACITY;
use crate::geom::Point;
use crate::hit::Corner;

/// Gesture state for the pending box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Translating the whole pending box.
    MovingWholeBox {
        /// Pointer position at the previous event, used to compute the delta.
        last: Point,
    },
    ResizingTopLeft,
    ResizingTopRight,
    ResizingBottomLeft,
    ResizingBottomRight,
    /// Sizing a brand-new box by dragging from `start`.
    DraggingNewBox {
        /// Canvas point where the drag started; one corner of the box.
        start: Point,
    },
}

impl DragState {
    /// Resize state for a corner handle.
    #[must_use]
    pub fn resizing(corner: Corner) -> Self {
        match corner {
            Corner::TopLeft => Self::ResizingTopLeft,
            Corner::TopRight => Self::ResizingTopRight,
            Corner::BottomLeft => Self::ResizingBottomLeft,
            Corner::BottomRight => Self::ResizingBottomRight,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Which part of a gesture a pointer event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// One finger on a touch screen, in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// `Touch.identifier`, stable for the life of the finger.
    pub id: i32,
    pub client: Point,
}

/// A raw pointer event from either the mouse or a touch screen.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSample {
    /// Mouse position in client (viewport) coordinates.
    Mouse { client: Point },
    /// Touches in browser order: the active ones for down and move, the
    /// lifted ones for up.
    Touch { touches: Vec<TouchPoint> },
}

impl PointerSample {
    /// Canvas-space position of this sample, given the canvas's client origin.
    ///
    /// Touch samples are filtered through `tracker` so that only the finger
    /// that started the gesture drives it; `None` means the sample is ignored.
    #[must_use]
    pub fn canvas_point(&self, phase: PointerPhase, tracker: &mut TouchTracker, origin: Point) -> Option<Point> {
        let client = match self {
            Self::Mouse { client } => *client,
            Self::Touch { touches } => tracker.track(phase, touches)?,
        };
        Some(Point::new(client.x - origin.x, client.y - origin.y))
    }
}

/// Follows the one finger that started the current touch gesture.
///
/// A gesture only starts from a single touch. Fingers added while it runs,
/// and their moves and lifts, are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchTracker {
    finger: Option<i32>,
}

impl TouchTracker {
    /// Identifier of the tracked finger, if a touch gesture is running.
    #[must_use]
    pub fn finger(&self) -> Option<i32> {
        self.finger
    }

    /// Client position of the tracked finger in `touches`, or `None` when the
    /// event does not belong to it.
    pub fn track(&mut self, phase: PointerPhase, touches: &[TouchPoint]) -> Option<Point> {
        match phase {
            PointerPhase::Down => {
                // A tracked finger missing from `touches` was lost without a touchend.
                if let Some(id) = self.finger
                    && touches.iter().any(|t| t.id == id)
                {
                    log::debug!("ignoring extra finger during touch gesture");
                    return None;
                }
                let [only] = touches else {
                    log::debug!("ignoring touch start with {} fingers", touches.len());
                    return None;
                };
                self.finger = Some(only.id);
                Some(only.client)
            }
            PointerPhase::Move => {
                let id = self.finger?;
                touches.iter().find(|t| t.id == id).map(|t| t.client)
            }
            PointerPhase::Up => {
                let id = self.finger?;
                let lifted = touches.iter().find(|t| t.id == id)?;
                self.finger = None;
                Some(lifted.client)
            }
        }
    }
}

/// Editor command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Place a fresh pending box in the middle of the canvas.
    NewBox,
    /// Ask for a name and create a tag from the pending box.
    CommitBox,
    /// Discard the pending box.
    CancelBox,
    /// Untag the current selection.
    Delete,
    /// Change the display name of the selected face, keeping its identity.
    Rename,
    /// Reassign the selected tag to a (possibly different) face by name.
    Retag,
    /// Move the selection to the next tag in draw order.
    CycleSelection,
    /// Retag the current selection with recent name slot `n`.
    RecentName(usize),
}

/// Configurable key bindings. Values are browser `KeyboardEvent.key` names.
///
/// Digit keys `0`–`9` are always bound to the recent-name slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keymap {
    pub new_box: String,
    pub commit_box: String,
    pub cancel_box: String,
    pub delete: String,
    pub rename: String,
    pub retag: String,
    pub cycle_selection: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            new_box: "Insert".into(),
            commit_box: "+".into(),
            cancel_box: "Escape".into(),
            delete: "Delete".into(),
            rename: "r".into(),
            retag: "F2".into(),
            cycle_selection: "Tab".into(),
        }
    }
}

impl Keymap {
    /// Resolve a browser key name to a command.
    #[must_use]
    pub fn command_for(&self, key: &str) -> Option<KeyCommand> {
        if let Some(slot) = recent_slot(key) {
            return Some(KeyCommand::RecentName(slot));
        }
        self.bindings()
            .into_iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, command)| command)
    }

    /// All configurable bindings as `(key, command)` pairs.
    #[must_use]
    pub fn bindings(&self) -> [(&str, KeyCommand); 7] {
        [
            (self.new_box.as_str(), KeyCommand::NewBox),
            (self.commit_box.as_str(), KeyCommand::CommitBox),
            (self.cancel_box.as_str(), KeyCommand::CancelBox),
            (self.delete.as_str(), KeyCommand::Delete),
            (self.rename.as_str(), KeyCommand::Rename),
            (self.retag.as_str(), KeyCommand::Retag),
            (self.cycle_selection.as_str(), KeyCommand::CycleSelection),
        ]
    }
}

/// Recent-name slot addressed by a single digit key.
fn recent_slot(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() {
        return None;
    }
    let slot = digit as usize;
    (slot < RECENT_NAMES_CAPACITY).then_some(slot)
}

/// Whether a key event aimed at this element is text entry rather than an
/// editor shortcut.
#[must_use]
pub fn is_text_entry(tag_name: &str, content_editable: bool) -> bool {
    content_editable || ["INPUT", "TEXTAREA", "SELECT"].iter().any(|t| tag_name.eq_ignore_ascii_case(t))
}
