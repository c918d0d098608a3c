use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeDirection {
    #[default]
    In,
    Out,
}

impl FadeDirection {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Linear opacity ramp. Opacity itself lives on the rendered body; this only
/// produces the per-tick delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FadeState {
    direction: FadeDirection,
    step_per_tick: f64,
    remaining_duration: u32,
    blocks_advance: bool,
}

impl FadeState {
    /// Starts a ramp of `opacity_span / duration` per tick. A fractional
    /// duration still runs whole ticks, rounded up; a duration that is not
    /// positive leaves nothing to run.
    pub fn start(
        &mut self,
        direction: FadeDirection,
        duration: f64,
        opacity_span: f64,
        blocks_advance: bool,
    ) {
        let ticks = if duration > 0.0 {
            duration.ceil().min(f64::from(u32::MAX)) as u32
        } else {
            0
        };
        self.direction = direction;
        self.step_per_tick = if ticks > 0 { opacity_span / duration } else { 0.0 };
        self.remaining_duration = ticks;
        self.blocks_advance = blocks_advance;
        debug!(
            direction = direction.as_token(),
            duration,
            step_per_tick = self.step_per_tick,
            blocks_advance,
            "fade_started"
        );
    }

    pub fn is_fading(&self) -> bool {
        self.remaining_duration > 0
    }

    /// Advances one tick and returns the signed opacity change to apply.
    pub fn update(&mut self) -> Option<f64> {
        if !self.is_fading() {
            return None;
        }
        self.remaining_duration -= 1;
        Some(match self.direction {
            FadeDirection::In => self.step_per_tick,
            FadeDirection::Out => -self.step_per_tick,
        })
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    pub fn step_per_tick(&self) -> f64 {
        self.step_per_tick
    }

    pub fn remaining_duration(&self) -> u32 {
        self.remaining_duration
    }

    pub fn blocks_advance(&self) -> bool {
        self.blocks_advance
    }
}
