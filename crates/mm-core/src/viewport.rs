//! Canvas transform: zoom scale and pan offset.
//!
//! `screen = canvas * scale + translate`, per axis.

use crate::error::{MindMapError, Result};
use serde::{Deserialize, Serialize};

/// Left margin kept in front of the root when recentering on it.
pub const ROOT_LEFT_MARGIN: f32 = 50.0;

/// Allowed zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
        }
    }
}

impl ViewLimits {
    /// Both bounds finite and positive, `min_scale <= max_scale`.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min_scale, self.max_scale);
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            Ok(())
        } else {
            Err(MindMapError::InvalidData(format!(
                "zoom range {min}..{max} is not an ordered positive range"
            )))
        }
    }
}

/// Zoom/pan state of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasView {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    #[serde(skip)]
    pub limits: ViewLimits,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self::new(ViewLimits::default())
    }
}

impl CanvasView {
    /// Identity view. Invalid limits are replaced by the default range.
    pub fn new(limits: ViewLimits) -> Self {
        let limits = match limits.validate() {
            Ok(()) => limits,
            Err(e) => {
                log::warn!("{e}; using the default zoom range");
                ViewLimits::default()
            }
        };
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            limits,
        }
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        // `limits` is a public field and may be unordered; `clamp` would panic.
        scale.max(self.limits.min_scale).min(self.limits.max_scale)
    }

    /// Change the scale by `delta`, clamped to the limits. With a `center`
    /// (screen coordinates) the canvas point under it stays put.
    /// Returns the new scale.
    pub fn zoom(&mut self, delta: f32, center: Option<(f32, f32)>) -> f32 {
        let old = self.scale;
        let new = self.clamp_scale(old + delta);
        if let Some((cx, cy)) = center {
            let ratio = new / old;
            self.translate_x = cx - (cx - self.translate_x) * ratio;
            self.translate_y = cy - (cy - self.translate_y) * ratio;
        }
        self.scale = new;
        new
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Reset to scale 1. Given a container size, park the root near the
    /// left edge and center it vertically; otherwise go back to the origin.
    pub fn center_on_root(&mut self, container: Option<(f32, f32)>, root_height: f32) {
        self.scale = 1.0;
        match container {
            Some((_width, height)) => {
                self.translate_x = ROOT_LEFT_MARGIN;
                self.translate_y = height / 2.0 - root_height / 2.0;
            }
            None => {
                self.translate_x = 0.0;
                self.translate_y = 0.0;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.limits);
    }

    /// Adopt a stored view, keeping our own limits and clamping its scale.
    pub fn restore(&mut self, stored: &CanvasView) -> Result<()> {
        stored.validate()?;
        self.scale = self.clamp_scale(stored.scale);
        self.translate_x = stored.translate_x;
        self.translate_y = stored.translate_y;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(MindMapError::InvalidData(format!(
                "canvas scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !(self.translate_x.is_finite() && self.translate_y.is_finite()) {
            return Err(MindMapError::InvalidData(
                "canvas translation must be finite".into(),
            ));
        }
        Ok(())
    }

    pub fn canvas_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    pub fn screen_to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.translate_x) / self.scale,
            (y - self.translate_y) / self.scale,
        )
    }
}
