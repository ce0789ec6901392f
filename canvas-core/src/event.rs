//! Input events for canvas interaction.
//!
//! Gesture recognition happens upstream; the canvas receives already
//! recognised pan and pinch streams, each delivered as a begin, a run of
//! updates and an end (or cancel).

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// Phase of a pan gesture stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PanPhase {
    /// Finger down on the element.
    Begin,
    /// Finger moved.
    Update {
        /// Cumulative horizontal translation since the gesture began.
        translation_x: f32,
        /// Cumulative vertical translation since the gesture began.
        translation_y: f32,
    },
    /// Finger lifted; the live position is committed.
    End,
    /// Gesture aborted by the recogniser; the live position is discarded.
    Cancel,
}

/// Phase of a pinch gesture stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PinchPhase {
    /// Second finger down on the element.
    Begin,
    /// Fingers moved.
    Update {
        /// Cumulative scale factor since the gesture began (1.0 = no change).
        scale: f32,
    },
    /// Fingers lifted; the live scale is committed.
    End,
    /// Gesture aborted by the recogniser; the live scale is discarded.
    Cancel,
}

/// All input events the canvas can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InputEvent {
    /// Tap on an element.
    Tap {
        /// The tapped element.
        target: ElementId,
    },

    /// Tap at a canvas point; routed to the topmost element under it.
    TapAt {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Pan stream event on an element.
    Pan {
        /// The dragged element.
        target: ElementId,
        /// Stream phase.
        phase: PanPhase,
    },

    /// Pinch stream event on an element.
    Pinch {
        /// The pinched element.
        target: ElementId,
        /// Stream phase.
        phase: PinchPhase,
    },

    /// The text input of the element being edited changed.
    TextInput {
        /// Full current text of the input.
        text: String,
    },

    /// The text input lost focus.
    Blur,
}

impl InputEvent {
    /// The element this event is aimed at, if it names one.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Tap { target } | Self::Pan { target, .. } | Self::Pinch { target, .. } => {
                Some(*target)
            }
            Self::TapAt { .. } | Self::TextInput { .. } | Self::Blur => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_event_json_shape() {
        let event = InputEvent::Pan {
            target: ElementId::from_raw(7),
            phase: PanPhase::Update {
                translation_x: 5.0,
                translation_y: -2.0,
            },
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "pan");
        assert_eq!(json["data"]["target"], 7);
        assert_eq!(json["data"]["phase"]["phase"], "update");

        let back: InputEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_event_target() {
        let id = ElementId::from_raw(3);
        assert_eq!(InputEvent::Tap { target: id }.target(), Some(id));
        assert_eq!(InputEvent::Blur.target(), None);
    }
}
