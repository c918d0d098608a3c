use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShakeAxis {
    #[default]
    Vertical,
    Horizontal,
}

impl ShakeAxis {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

/// Triangular oscillator displacing a character along one screen axis.
///
/// `offset` is in pixels. The oscillator keeps running after the duration
/// runs out until the offset lands on or crosses zero, so a shake always
/// comes to rest at exactly zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeState {
    axis: ShakeAxis,
    power: f64,
    speed: f64,
    remaining_duration: i32,
    direction_sign: i8,
    offset: f64,
}

impl Default for ShakeState {
    fn default() -> Self {
        Self {
            axis: ShakeAxis::Vertical,
            power: 0.0,
            speed: 0.0,
            remaining_duration: 0,
            direction_sign: 1,
            offset: 0.0,
        }
    }
}

impl ShakeState {
    /// Replaces the running shake. The live offset is kept.
    pub fn start(&mut self, axis: ShakeAxis, power: f64, speed: f64, duration: i32) {
        self.axis = axis;
        self.power = power;
        self.speed = speed;
        self.remaining_duration = duration;
        self.direction_sign = 1;
        debug!(
            axis = axis.as_token(),
            power,
            speed,
            duration,
            offset = self.offset,
            "shake_started"
        );
    }

    pub fn is_shaking(&self) -> bool {
        self.remaining_duration > 0 || self.offset != 0.0
    }

    pub fn update(&mut self) {
        if !self.is_shaking() {
            return;
        }

        let delta = self.power * self.speed * f64::from(self.direction_sign) / 10.0;
        if self.remaining_duration <= 1 && self.offset * (self.offset + delta) < 0.0 {
            self.offset = 0.0;
        } else {
            self.offset += delta;
        }

        let bound = self.power * 2.0;
        if self.offset > bound {
            self.direction_sign = -1;
        }
        if self.offset < -bound {
            self.direction_sign = 1;
        }
        self.remaining_duration = self.remaining_duration.saturating_sub(1);
    }

    pub fn axis(&self) -> ShakeAxis {
        self.axis
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn remaining_duration(&self) -> i32 {
        self.remaining_duration
    }

    pub fn direction_sign(&self) -> i8 {
        self.direction_sign
    }

    /// Size of one oscillator step.
    pub fn step(&self) -> f64 {
        (self.power * self.speed / 10.0).abs()
    }

    /// `(horizontal, vertical)` displacement in pixels. Only the configured
    /// axis is ever non-zero.
    pub fn screen_offset_px(&self) -> (f64, f64) {
        match self.axis {
            ShakeAxis::Horizontal => (self.offset, 0.0),
            ShakeAxis::Vertical => (0.0, self.offset),
        }
    }

    /// `(horizontal, vertical)` displacement in tile units for scroll math.
    pub fn scroll_offset(&self, tile_width: f64, tile_height: f64) -> (f64, f64) {
        let (x_px, y_px) = self.screen_offset_px();
        (x_px / tile_width, y_px / tile_height)
    }
}
