//! Outbound semantic commands.
//!
//! Every completed interaction produces commands for the authority. They
//! are fire-and-forget: the core never waits for an acknowledgement, it
//! only reconciles when the next authoritative render shows up.

use fc_core::{ConnectionId, ElementId, Viewport};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum Command {
    #[serde(rename = "canvas.click")]
    CanvasClick { x: f64, y: f64 },
    #[serde(rename = "canvas.zoomCommit")]
    ZoomCommit(Viewport),
    #[serde(rename = "canvas.deselectAll")]
    DeselectAll {},
    #[serde(rename = "marquee.select")]
    MarqueeSelect { ids: Vec<ElementId> },
    #[serde(rename = "element.select")]
    ElementSelect { id: ElementId },
    #[serde(rename = "element.shiftSelect")]
    ElementShiftSelect { id: ElementId },
    #[serde(rename = "element.dblclick")]
    ElementDblClick { id: ElementId },
    #[serde(rename = "element.move")]
    ElementMove { id: ElementId, dx: f64, dy: f64 },
    #[serde(rename = "element.resize")]
    ElementResize {
        id: ElementId,
        width: f64,
        height: f64,
    },
    #[serde(rename = "element.nudge")]
    ElementNudge { dx: f64, dy: f64 },
    #[serde(rename = "connection.select")]
    ConnectionSelect { id: ConnectionId },
    #[serde(rename = "streamEntry.click")]
    StreamEntryClick { payload: Value },
    #[serde(rename = "deleteSelected")]
    DeleteSelected {},
    #[serde(rename = "selectAll")]
    SelectAll {},
    #[serde(rename = "undo")]
    Undo {},
    #[serde(rename = "redo")]
    Redo {},
    #[serde(rename = "save")]
    Save {},
    #[serde(rename = "copy")]
    Copy {},
    #[serde(rename = "cut")]
    Cut {},
    #[serde(rename = "paste")]
    Paste {},
    #[serde(rename = "timeline.change")]
    TimelineChange { time: f64 },
    #[serde(rename = "timeline.goLive")]
    TimelineGoLive {},
    #[serde(rename = "timeline.playPause")]
    TimelinePlayPause {},
}

impl Command {
    /// Event name on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CanvasClick { .. } => "canvas.click",
            Command::ZoomCommit(_) => "canvas.zoomCommit",
            Command::DeselectAll {} => "canvas.deselectAll",
            Command::MarqueeSelect { .. } => "marquee.select",
            Command::ElementSelect { .. } => "element.select",
            Command::ElementShiftSelect { .. } => "element.shiftSelect",
            Command::ElementDblClick { .. } => "element.dblclick",
            Command::ElementMove { .. } => "element.move",
            Command::ElementResize { .. } => "element.resize",
            Command::ElementNudge { .. } => "element.nudge",
            Command::ConnectionSelect { .. } => "connection.select",
            Command::StreamEntryClick { .. } => "streamEntry.click",
            Command::DeleteSelected {} => "deleteSelected",
            Command::SelectAll {} => "selectAll",
            Command::Undo {} => "undo",
            Command::Redo {} => "redo",
            Command::Save {} => "save",
            Command::Copy {} => "copy",
            Command::Cut {} => "cut",
            Command::Paste {} => "paste",
            Command::TimelineChange { .. } => "timeline.change",
            Command::TimelineGoLive {} => "timeline.goLive",
            Command::TimelinePlayPause {} => "timeline.playPause",
        }
    }

    /// Payload object on the wire.
    pub fn payload(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove("payload").unwrap_or_else(empty_payload),
            _ => empty_payload(),
        }
    }

    pub fn send_to(&self, bus: &mut dyn EventBus) {
        log::debug!("→ {}", self.name());
        bus.send(self.name(), self.payload());
    }
}

fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The outbound half of the message bus to the authority.
pub trait EventBus {
    fn send(&mut self, name: &str, payload: Value);
}

/// Recording bus: each send is appended as `(name, payload)`.
impl EventBus for Vec<(String, Value)> {
    fn send(&mut self, name: &str, payload: Value) {
        self.push((name.to_string(), payload));
    }
}

/// Send a batch of commands in order.
pub fn dispatch(commands: impl IntoIterator<Item = Command>, bus: &mut dyn EventBus) {
    for command in commands {
        command.send_to(bus);
    }
}
