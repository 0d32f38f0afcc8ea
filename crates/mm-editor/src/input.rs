//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a unified `InputEvent` consumed
//! by the pointer tool. All positions are screen (container) coordinates.

/// A normalized input event from a pointing device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed. `clicks` is the browser's click count (2 = double).
    PointerDown { x: f32, y: f32, clicks: u8 },

    /// Pointer moved, pressed or not.
    PointerMove { x: f32, y: f32 },

    /// Pointer released.
    PointerUp { x: f32, y: f32 },

    /// Wheel or pinch zoom. `delta` is the scale change (positive = in).
    Wheel { x: f32, y: f32, delta: f32 },
}

impl InputEvent {
    /// Extract the screen position.
    pub fn position(&self) -> (f32, f32) {
        match *self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Wheel { x, y, .. } => (x, y),
        }
    }

    /// Convert a raw wheel `deltaY` into a scale change: one notch
    /// (100 px) zooms by 0.1, scrolling down zooms out.
    pub fn from_wheel(x: f32, y: f32, delta_y: f32) -> Self {
        Self::Wheel {
            x,
            y,
            delta: -delta_y / 1000.0,
        }
    }
}
