//! Pan and zoom interaction for the crop editor
//!
//! `ViewController` owns the `ViewTransform` and is the only thing that
//! changes it. Rendering code reads the transform but never writes it.

use crate::constants::*;
use crate::layout::Vec2;
use crate::types::{ViewTransform, clamp_zoom};

/// Drag gesture state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer position minus pan at the moment the drag began
    Dragging { anchor: Vec2 },
}

/// Pointer and touch input on the crop frame, in preview pixels
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown(Vec2),
    MouseMove(Vec2),
    MouseUp,
    MouseLeave,
    /// Active touch points; only the first one is tracked
    TouchStart(Vec<Vec2>),
    TouchMove(Vec<Vec2>),
    TouchEnd,
}

#[derive(Debug, Clone, Default)]
pub struct ViewController {
    view: ViewTransform,
    drag: DragState,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Back to cover fit, centered, not dragging
    pub fn reset(&mut self) {
        self.view = ViewTransform::default();
        self.drag = DragState::Idle;
    }

    // =========================================================================
    // Drag
    // =========================================================================

    pub fn drag_start(&mut self, pointer: Vec2) {
        self.drag = DragState::Dragging {
            anchor: pointer - self.view.pan,
        };
    }

    /// Follow the pointer. Returns true when the pan changed.
    ///
    /// Pan is derived from the absolute pointer position, so dropped or
    /// coalesced move events cannot accumulate drift.
    pub fn drag_move(&mut self, pointer: Vec2) -> bool {
        let DragState::Dragging { anchor } = self.drag else {
            return false;
        };

        let pan = pointer - anchor;
        if pan == self.view.pan {
            return false;
        }
        self.view.pan = pan;
        true
    }

    pub fn drag_end(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Route a mouse or touch event to the drag handlers.
    /// Returns true when the view changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::MouseDown(p) => {
                self.drag_start(*p);
                false
            }
            InputEvent::TouchStart(touches) => {
                if let Some(p) = touches.first() {
                    self.drag_start(*p);
                }
                false
            }
            InputEvent::MouseMove(p) => self.drag_move(*p),
            InputEvent::TouchMove(touches) => match touches.first() {
                Some(p) => self.drag_move(*p),
                None => false,
            },
            InputEvent::MouseUp | InputEvent::MouseLeave | InputEvent::TouchEnd => {
                self.drag_end();
                false
            }
        }
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Set zoom directly, clamped. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.view.zoom = clamp_zoom(zoom, self.view.zoom);
    }

    /// Set zoom from the slider, snapped to its step
    pub fn set_zoom_slider(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        let steps = ((value - MIN_ZOOM) / ZOOM_SLIDER_STEP).round();
        self.set_zoom(MIN_ZOOM + steps * ZOOM_SLIDER_STEP);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.view.zoom + ZOOM_BUTTON_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.view.zoom - ZOOM_BUTTON_STEP);
    }

    /// Zoom as a whole percentage for display
    pub fn zoom_percent(&self) -> u32 {
        (self.view.zoom * 100.0).round() as u32
    }
}
