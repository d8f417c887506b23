//! Data-driven Plinko tuning
//!
//! Every physics and timing knob lives here so a page can override it with a
//! JSON `data-tuning` attribute on the board element.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlinkoTuning {
    pub gravity: f32,

    pub start_y: f32,
    pub start_spread: f32,
    pub start_vx_spread: f32,
    pub start_vy: f32,

    pub max_x: f32,
    pub wall_damping: f32,

    pub bounce_base: f32,
    pub bounce_spread: f32,
    pub bounce_lift: f32,
    pub peg_jitter: f32,

    pub bucket_entry_y: f32,
    pub bucket_span: f32,
    pub bucket_entry_damping: f32,
    pub bucket_center_pull: f32,
    pub bucket_wall_nudge: f32,
    pub bucket_floor_padding: f32,
    pub floor_damping: f32,
    pub floor_jitter: f32,
    pub floor_friction: f32,
    pub settle_speed: f32,

    pub off_board_y: f32,

    pub first_drop_delay_ms: f64,
    pub peg_highlight_ms: f64,
    pub glow_ms: f64,
    pub next_ball_delay_ms: f64,
}

impl Default for PlinkoTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,

            start_y: START_Y,
            start_spread: START_SPREAD,
            start_vx_spread: START_VX_SPREAD,
            start_vy: START_VY,

            max_x: MAX_X,
            wall_damping: WALL_DAMPING,

            bounce_base: BOUNCE_BASE,
            bounce_spread: BOUNCE_SPREAD,
            bounce_lift: BOUNCE_LIFT,
            peg_jitter: PEG_JITTER,

            bucket_entry_y: BUCKET_ENTRY_Y,
            bucket_span: BUCKET_SPAN,
            bucket_entry_damping: BUCKET_ENTRY_DAMPING,
            bucket_center_pull: BUCKET_CENTER_PULL,
            bucket_wall_nudge: BUCKET_WALL_NUDGE,
            bucket_floor_padding: BUCKET_FLOOR_PADDING,
            floor_damping: FLOOR_DAMPING,
            floor_jitter: FLOOR_JITTER,
            floor_friction: FLOOR_FRICTION,
            settle_speed: SETTLE_SPEED,

            off_board_y: OFF_BOARD_Y,

            first_drop_delay_ms: FIRST_DROP_DELAY_MS,
            peg_highlight_ms: PEG_HIGHLIGHT_MS,
            glow_ms: GLOW_MS,
            next_ball_delay_ms: NEXT_BALL_DELAY_MS,
        }
    }
}

impl PlinkoTuning {
    /// Parse overrides from JSON, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring invalid tuning JSON: {}", e);
                Self::default()
            }
        }
    }

    /// Maximum speed a single peg bounce can produce
    ///
    /// The reflected vector has length `force`, plus the lift and jitter terms.
    pub fn max_bounce_speed(&self) -> f32 {
        self.bounce_base + self.bounce_spread + self.bounce_lift + self.peg_jitter / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let tuning = PlinkoTuning::from_json(r#"{ "gravity": 0.5, "glow_ms": 250 }"#);
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.glow_ms, 250.0);
        assert_eq!(tuning.max_x, MAX_X);
    }

    #[test]
    fn test_invalid_json_uses_defaults() {
        let tuning = PlinkoTuning::from_json("{ not json");
        assert_eq!(tuning, PlinkoTuning::default());
    }
}
