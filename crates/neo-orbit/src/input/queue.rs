use glam::Vec2;
use log::warn;

use crate::api::types::BodyId;
use crate::camera::view::ViewMode;
use crate::core::clock::SpeedSetting;

/// Input event types the engine understands.
/// Pointer coordinates are normalized device coordinates: x and y in [-1, 1], +y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began.
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended.
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved.
    PointerMove { x: f32, y: f32 },
    /// The pointer left the canvas.
    PointerLeave,
    /// A custom event from the UI layer (scrubber, play button, mode buttons).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Custom event kinds sent by the UI layer.
pub mod kinds {
    pub const TOGGLE_PLAY: u32 = 1;
    /// a: 1 = play, 0 = pause
    pub const SET_PLAYING: u32 = 2;
    /// a: speed multiplier (1, 10, 100, 1000)
    pub const SET_SPEED: u32 = 3;
    /// a: scrubber fraction in [0, 1]
    pub const SCRUB: u32 = 4;
    /// a: mode code, b: body id or preset code
    pub const SET_VIEW_MODE: u32 = 5;
    /// a: body id
    pub const SELECT: u32 = 6;
    pub const CLEAR_SELECTION: u32 = 7;
    /// a: viewport width, b: viewport height
    pub const RESIZE: u32 = 99;
}

/// A validated UI setter. Raw custom events are converted here, at the
/// boundary, so nothing downstream sees an out-of-range speed or mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiCommand {
    TogglePlay,
    SetPlaying(bool),
    SetSpeed(SpeedSetting),
    Scrub(f32),
    SetViewMode(ViewMode),
    Select(BodyId),
    ClearSelection,
    /// New viewport aspect ratio.
    Resize(f32),
}

impl UiCommand {
    /// Validate a custom event. Unknown kinds and bad payloads yield `None`.
    pub fn from_custom(kind: u32, a: f32, b: f32, _c: f32) -> Option<Self> {
        let command = match kind {
            kinds::TOGGLE_PLAY => Some(UiCommand::TogglePlay),
            kinds::SET_PLAYING => Some(UiCommand::SetPlaying(a != 0.0)),
            kinds::SET_SPEED => SpeedSetting::from_multiplier(a).map(UiCommand::SetSpeed),
            kinds::SCRUB if a.is_finite() => Some(UiCommand::Scrub(a.clamp(0.0, 1.0))),
            kinds::SET_VIEW_MODE => ViewMode::from_code(a, b).map(UiCommand::SetViewMode),
            kinds::SELECT => BodyId::decode(a).map(UiCommand::Select),
            kinds::CLEAR_SELECTION => Some(UiCommand::ClearSelection),
            kinds::RESIZE if a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0 => {
                Some(UiCommand::Resize(a / b))
            }
            _ => None,
        };
        if command.is_none() {
            warn!("input: rejected custom event kind={kind} a={a} b={b}");
        }
        command
    }
}

/// Pointer bookkeeping between ticks: last known position and the
/// press that may turn into a click.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Last position over the canvas, `None` after the pointer leaves.
    pub position: Option<Vec2>,
    pressed_at: Option<Vec2>,
}

impl PointerState {
    /// Feed a pointer event. Returns the click position when a press is
    /// released within `drag_threshold` of where it started.
    pub fn apply(&mut self, event: &InputEvent, drag_threshold: f32) -> Option<Vec2> {
        match *event {
            InputEvent::PointerMove { x, y } => {
                self.position = Some(Vec2::new(x, y));
                None
            }
            InputEvent::PointerDown { x, y } => {
                let p = Vec2::new(x, y);
                self.position = Some(p);
                self.pressed_at = Some(p);
                None
            }
            InputEvent::PointerUp { x, y } => {
                let p = Vec2::new(x, y);
                self.position = Some(p);
                let start = self.pressed_at.take()?;
                (start.distance(p) <= drag_threshold).then_some(p)
            }
            InputEvent::PointerLeave => {
                self.position = None;
                self.pressed_at = None;
                None
            }
            InputEvent::Custom { .. } => None,
        }
    }
}
