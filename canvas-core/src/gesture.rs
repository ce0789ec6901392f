//! Per-element gesture handling.
//!
//! A [`GestureController`] owns the live transform of one element while
//! gestures are in flight. Pan and pinch are two independent state machines
//! sharing that live transform:
//!
//! ```text
//!   pan:    Idle ──begin──▶ Dragging ──end──▶ Idle  (commit)
//!                              │
//!                              └──cancel──▶ Idle    (restore base)
//!
//!   pinch:  Idle ──begin──▶ Pinching ──end──▶ Idle  (commit)
//!                              │
//!                              └──cancel──▶ Idle    (restore base)
//! ```
//!
//! Live values drive rendering only. The registry sees a single [`Commit`]
//! per ended stream, always carrying the full `(x, y, scale)` triple read from
//! the current live state, so neither stream can clobber the other.
//!
//! An ended stream's commit also carries the in-flight values of the other
//! stream. If that other stream is later cancelled, the cancel emits a
//! corrective commit with its axis restored.

use serde::{Deserialize, Serialize};

use crate::element::clamp_scale;
use crate::{ElementId, PanPhase, PinchPhase, Transform};

/// State of the pan stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PanState {
    /// No pan in progress.
    Idle,
    /// Pan in progress, anchored at the position captured on begin.
    Dragging {
        /// X at gesture start.
        base_x: f32,
        /// Y at gesture start.
        base_y: f32,
    },
}

/// State of the pinch stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PinchState {
    /// No pinch in progress.
    Idle,
    /// Pinch in progress, anchored at the scale captured on begin.
    Pinching {
        /// Scale at gesture start.
        base_scale: f32,
    },
}

/// Final transform of a gesture, to be written into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Element the gesture ran on.
    pub id: ElementId,
    /// Full transform at gesture end.
    pub transform: Transform,
}

/// Live gesture state for one element.
#[derive(Debug, Clone)]
pub struct GestureController {
    id: ElementId,
    scalable: bool,
    live: Transform,
    pan: PanState,
    pinch: PinchState,
    // A commit was emitted while a stream was still in flight.
    published_live: bool,
}

impl GestureController {
    /// Create an idle controller starting from the element's committed transform.
    #[must_use]
    pub fn new(id: ElementId, committed: Transform, scalable: bool) -> Self {
        Self {
            id,
            scalable,
            live: committed,
            pan: PanState::Idle,
            pinch: PinchState::Idle,
            published_live: false,
        }
    }

    /// The element this controller drives.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The transform to render right now.
    #[must_use]
    pub fn live(&self) -> Transform {
        self.live
    }

    /// Current pan state.
    #[must_use]
    pub fn pan_state(&self) -> PanState {
        self.pan
    }

    /// Current pinch state.
    #[must_use]
    pub fn pinch_state(&self) -> PinchState {
        self.pinch
    }

    /// Whether neither stream is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pan == PanState::Idle && self.pinch == PinchState::Idle
    }

    /// Adopt the committed transform. Ignored while a gesture is active.
    pub fn sync(&mut self, committed: Transform) {
        if self.is_idle() {
            self.live = committed;
        }
    }

    /// Feed one pan event. Returns a commit when the stream ends.
    pub fn pan(&mut self, phase: PanPhase) -> Option<Commit> {
        match phase {
            PanPhase::Begin => {
                self.pan = PanState::Dragging {
                    base_x: self.live.x,
                    base_y: self.live.y,
                };
                None
            }
            PanPhase::Update {
                translation_x,
                translation_y,
            } => {
                if let PanState::Dragging { base_x, base_y } = self.pan {
                    self.live.x = base_x + translation_x;
                    self.live.y = base_y + translation_y;
                } else {
                    tracing::debug!("Pan update on idle element {} ignored", self.id);
                }
                None
            }
            PanPhase::End => {
                if self.pan == PanState::Idle {
                    tracing::debug!("Pan end on idle element {} ignored", self.id);
                    return None;
                }
                self.pan = PanState::Idle;
                Some(self.end_stream())
            }
            PanPhase::Cancel => {
                let PanState::Dragging { base_x, base_y } = self.pan else {
                    return None;
                };
                self.live.x = base_x;
                self.live.y = base_y;
                self.pan = PanState::Idle;
                self.cancel_stream()
            }
        }
    }

    /// Feed one pinch event. Returns a commit when the stream ends.
    ///
    /// Pinch has no effect on elements that are not scalable.
    pub fn pinch(&mut self, phase: PinchPhase) -> Option<Commit> {
        if !self.scalable {
            tracing::debug!("Pinch on fixed-scale element {} ignored", self.id);
            return None;
        }
        match phase {
            PinchPhase::Begin => {
                self.pinch = PinchState::Pinching {
                    base_scale: self.live.scale,
                };
                None
            }
            PinchPhase::Update { scale } => {
                if let PinchState::Pinching { base_scale } = self.pinch {
                    self.live.scale = clamp_scale(scale * base_scale);
                } else {
                    tracing::debug!("Pinch update on idle element {} ignored", self.id);
                }
                None
            }
            PinchPhase::End => {
                if self.pinch == PinchState::Idle {
                    tracing::debug!("Pinch end on idle element {} ignored", self.id);
                    return None;
                }
                self.pinch = PinchState::Idle;
                Some(self.end_stream())
            }
            PinchPhase::Cancel => {
                let PinchState::Pinching { base_scale } = self.pinch else {
                    return None;
                };
                self.live.scale = base_scale;
                self.pinch = PinchState::Idle;
                self.cancel_stream()
            }
        }
    }

    fn end_stream(&mut self) -> Commit {
        self.published_live = !self.is_idle();
        self.commit()
    }

    /// A cancel only commits when an earlier commit published the values it
    /// just rolled back.
    fn cancel_stream(&mut self) -> Option<Commit> {
        if !self.published_live {
            return None;
        }
        self.published_live = !self.is_idle();
        Some(self.commit())
    }

    fn commit(&self) -> Commit {
        tracing::debug!(
            "Commit {} at ({}, {}) scale {}",
            self.id,
            self.live.x,
            self.live.y,
            self.live.scale
        );
        Commit {
            id: self.id,
            transform: self.live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::MIN_SCALE;

    fn controller() -> GestureController {
        GestureController::new(ElementId::from_raw(1), Transform::default(), true)
    }

    fn pan_update(x: f32, y: f32) -> PanPhase {
        PanPhase::Update {
            translation_x: x,
            translation_y: y,
        }
    }

    #[test]
    fn test_pan_commit_is_base_plus_final_translation() {
        let mut c = GestureController::new(
            ElementId::from_raw(1),
            Transform::new(10.0, 20.0, 1.0),
            true,
        );
        c.pan(PanPhase::Begin);
        for step in 1..=10 {
            #[allow(clippy::cast_precision_loss)]
            let s = step as f32;
            c.pan(pan_update(s * 3.0, -s));
        }
        let commit = c.pan(PanPhase::End).expect("commit on end");
        assert!((commit.transform.x - 40.0).abs() < f32::EPSILON);
        assert!((commit.transform.y - 10.0).abs() < f32::EPSILON);
        assert_eq!(c.pan_state(), PanState::Idle);
    }

    #[test]
    fn test_live_value_updates_without_commit() {
        let mut c = controller();
        c.pan(PanPhase::Begin);
        assert!(c.pan(pan_update(5.0, 5.0)).is_none());
        assert!((c.live().x - 5.0).abs() < f32::EPSILON);
        assert!(matches!(c.pan_state(), PanState::Dragging { .. }));
    }

    #[test]
    fn test_pinch_commit_multiplies_base_scale() {
        let mut c = GestureController::new(
            ElementId::from_raw(1),
            Transform::new(0.0, 0.0, 2.0),
            true,
        );
        c.pinch(PinchPhase::Begin);
        c.pinch(PinchPhase::Update { scale: 0.5 });
        c.pinch(PinchPhase::Update { scale: 1.25 });
        let commit = c.pinch(PinchPhase::End).expect("commit on end");
        assert!((commit.transform.scale - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pinch_clamps_to_floor() {
        let mut c = controller();
        c.pinch(PinchPhase::Begin);
        c.pinch(PinchPhase::Update { scale: 0.0 });
        assert!((c.live().scale - MIN_SCALE).abs() < f32::EPSILON);
        c.pinch(PinchPhase::Update { scale: -2.0 });
        let commit = c.pinch(PinchPhase::End).expect("commit");
        assert!(commit.transform.scale > 0.0);
    }

    #[test]
    fn test_concurrent_streams_commit_full_triple() {
        let mut c = controller();
        c.pan(PanPhase::Begin);
        c.pinch(PinchPhase::Begin);
        c.pan(pan_update(50.0, -20.0));
        c.pinch(PinchPhase::Update { scale: 1.5 });

        // Pinch ends first, while the pan is still live.
        let first = c.pinch(PinchPhase::End).expect("pinch commit");
        assert!((first.transform.x - 50.0).abs() < f32::EPSILON);
        assert!((first.transform.scale - 1.5).abs() < f32::EPSILON);

        let second = c.pan(PanPhase::End).expect("pan commit");
        assert_eq!(second.transform, Transform::new(50.0, -20.0, 1.5));
    }

    #[test]
    fn test_cancel_restores_base() {
        let mut c = controller();
        c.pan(PanPhase::Begin);
        c.pan(pan_update(30.0, 30.0));
        assert!(c.pan(PanPhase::Cancel).is_none());
        assert_eq!(c.live(), Transform::default());

        c.pinch(PinchPhase::Begin);
        c.pinch(PinchPhase::Update { scale: 3.0 });
        c.pinch(PinchPhase::Cancel);
        assert!((c.live().scale - 1.0).abs() < f32::EPSILON);
        assert!(c.is_idle());
    }

    #[test]
    fn test_cancel_after_other_stream_committed_corrects_registry() {
        let mut c = controller();
        c.pan(PanPhase::Begin);
        c.pinch(PinchPhase::Begin);
        c.pan(pan_update(50.0, -20.0));
        c.pinch(PinchPhase::Update { scale: 2.0 });

        let pinch = c.pinch(PinchPhase::End).expect("pinch commit");
        assert_eq!(pinch.transform, Transform::new(50.0, -20.0, 2.0));

        let corrective = c.pan(PanPhase::Cancel).expect("corrective commit");
        assert_eq!(corrective.transform, Transform::new(0.0, 0.0, 2.0));
        assert!(c.is_idle());

        // A later lone cancel has nothing to correct.
        c.pan(PanPhase::Begin);
        c.pan(pan_update(10.0, 10.0));
        assert!(c.pan(PanPhase::Cancel).is_none());
    }

    #[test]
    fn test_pinch_cancel_after_pan_committed_restores_scale() {
        let mut c = controller();
        c.pinch(PinchPhase::Begin);
        c.pan(PanPhase::Begin);
        c.pinch(PinchPhase::Update { scale: 3.0 });
        c.pan(pan_update(5.0, 6.0));

        let pan = c.pan(PanPhase::End).expect("pan commit");
        assert!((pan.transform.scale - 3.0).abs() < f32::EPSILON);

        let corrective = c.pinch(PinchPhase::Cancel).expect("corrective commit");
        assert_eq!(corrective.transform, Transform::new(5.0, 6.0, 1.0));
    }

    #[test]
    fn test_cancel_on_idle_stream_commits_nothing() {
        let mut c = controller();
        c.pinch(PinchPhase::Begin);
        c.pinch(PinchPhase::Update { scale: 2.0 });
        assert!(c.pan(PanPhase::Cancel).is_none());
        assert!((c.live().scale - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_events_on_idle_streams_are_ignored() {
        let mut c = controller();
        assert!(c.pan(pan_update(9.0, 9.0)).is_none());
        assert!(c.pan(PanPhase::End).is_none());
        assert!(c.pinch(PinchPhase::End).is_none());
        assert_eq!(c.live(), Transform::default());
    }

    #[test]
    fn test_pinch_ignored_for_fixed_scale_elements() {
        let mut c = GestureController::new(ElementId::from_raw(2), Transform::default(), false);
        c.pinch(PinchPhase::Begin);
        c.pinch(PinchPhase::Update { scale: 4.0 });
        assert!(c.pinch(PinchPhase::End).is_none());
        assert!((c.live().scale - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sync_only_when_idle() {
        let mut c = controller();
        c.sync(Transform::new(7.0, 8.0, 1.0));
        assert!((c.live().x - 7.0).abs() < f32::EPSILON);

        c.pan(PanPhase::Begin);
        c.sync(Transform::new(100.0, 100.0, 1.0));
        assert!((c.live().x - 7.0).abs() < f32::EPSILON);
    }
}
