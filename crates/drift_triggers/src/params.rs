//! Construction parameters for triggers
//!
//! Every numeric field is optional on the wire. Missing values take their
//! defaults; NaN or negative extents are replaced by 0 with a warning.

use crate::error::{Result, TriggerError};
use crate::volume::Shape;
use serde::{Deserialize, Serialize};

/// Parameters shared by every trigger type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerParams {
    /// Reserved, stored but not acted upon
    pub cooldown: f32,
    /// Type-specific parameters
    #[serde(flatten)]
    pub kind: TriggerKindParams,
}

/// Type-specific parameters, tagged by `"type"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerKindParams {
    Area(AreaParams),
    Distance(DistanceParams),
    Timer(TimerParams),
}

impl Default for TriggerKindParams {
    fn default() -> Self {
        Self::Area(AreaParams::default())
    }
}

/// Area trigger parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaParams {
    /// Left of rectangle / center of circle
    pub x: f32,
    /// Top of rectangle / center of circle
    pub y: f32,
    /// Rectangle width
    pub w: f32,
    /// Rectangle height
    pub h: f32,
    /// Circle radius
    pub r: f32,
    pub shape: Shape,
}

/// Distance trigger parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceParams {
    pub x: f32,
    pub y: f32,
    /// Euclidean distance threshold, inclusive
    pub distance: f32,
}

/// Timer trigger parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerParams {
    /// Must be > 0
    pub interval: f32,
    /// Restart after each `timer_end`
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Cadence of `timer_update` events, 0 disables them
    pub update_on_each: f32,
}

impl TriggerParams {
    /// Rectangle area
    pub fn rectangle(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_kind(TriggerKindParams::Area(AreaParams {
            x,
            y,
            w,
            h,
            r: 0.0,
            shape: Shape::Rectangle,
        }))
    }

    /// Circle area
    pub fn circle(x: f32, y: f32, r: f32) -> Self {
        Self::from_kind(TriggerKindParams::Area(AreaParams {
            x,
            y,
            r,
            shape: Shape::Circle,
            ..Default::default()
        }))
    }

    /// Distance from a point
    pub fn distance(x: f32, y: f32, distance: f32) -> Self {
        Self::from_kind(TriggerKindParams::Distance(DistanceParams { x, y, distance }))
    }

    /// Timer
    pub fn timer(interval: f32, looping: bool) -> Self {
        Self::from_kind(TriggerKindParams::Timer(TimerParams {
            interval,
            looping,
            update_on_each: 0.0,
        }))
    }

    fn from_kind(kind: TriggerKindParams) -> Self {
        Self {
            cooldown: 0.0,
            kind,
        }
    }

    /// Set the cooldown
    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the timer update cadence. No effect on non-timer params.
    pub fn with_update_on_each(mut self, update_on_each: f32) -> Self {
        if let TriggerKindParams::Timer(timer) = &mut self.kind {
            timer.update_on_each = update_on_each;
        }
        self
    }

    /// Parse parameters from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TriggerError::InvalidParams(e.to_string()))
    }

    /// Cooldown, 0 unless positive
    pub(crate) fn sanitized_cooldown(&self) -> f32 {
        if self.cooldown > 0.0 {
            self.cooldown
        } else {
            0.0
        }
    }
}

/// Coordinates may be anything but NaN
pub(crate) fn coordinate(name: &str, value: f32) -> f32 {
    if value.is_nan() {
        log::warn!("Trigger parameter '{}' is NaN, using 0", name);
        0.0
    } else {
        value
    }
}

/// Extents (size, radius, distance) must be >= 0
pub(crate) fn extent(name: &str, value: f32) -> f32 {
    if value.is_nan() || value < 0.0 {
        log::warn!("Trigger parameter '{}' is {}, using 0", name, value);
        0.0
    } else {
        value
    }
}

/// Interval must be finite and > 0
pub(crate) fn interval(value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TriggerError::InvalidInterval(value))
    }
}
