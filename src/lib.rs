//! Data Plinko - interactive behaviors for the staking landing page
//!
//! Core modules:
//! - `sim`: Pure ball-drop simulation (physics, collisions, bucket state)
//! - `schedule`: Virtual-clock task scheduler (frames, delays, cancellation)
//! - `surface`: Render/query boundary between the simulation and the page
//! - `engine`: Drives runs of the simulation against a surface
//! - `rewards`: Compounding staking-rewards projection
//! - `widgets`: Navigation menu and FAQ accordion state
//! - `page`: Browser glue (wasm32 only)

pub mod engine;
#[cfg(target_arch = "wasm32")]
pub mod page;
pub mod rewards;
pub mod schedule;
pub mod settings;
pub mod sim;
pub mod surface;
pub mod tuning;
pub mod widgets;

pub use engine::{MountError, Plinko, Task};
pub use settings::Settings;
pub use tuning::PlinkoTuning;

/// Default physics and timing constants
///
/// Distances are CSS pixels, velocities are pixels per frame.
pub mod consts {
    /// Vertical acceleration added every frame
    pub const GRAVITY: f32 = 0.2;

    /// Ball drop origin
    pub const START_Y: f32 = 10.0;
    /// Start offset is drawn from [-START_SPREAD, START_SPREAD)
    pub const START_SPREAD: f32 = 15.0;
    /// Initial horizontal speed is drawn from [-START_VX_SPREAD, START_VX_SPREAD)
    pub const START_VX_SPREAD: f32 = 3.0;
    pub const START_VY: f32 = 2.0;

    /// Side walls of the board (ball offset from center)
    pub const MAX_X: f32 = 100.0;
    /// Velocity retained after a side wall bounce
    pub const WALL_DAMPING: f32 = 0.8;

    /// Peg bounce strength is BOUNCE_BASE + [0, BOUNCE_SPREAD)
    pub const BOUNCE_BASE: f32 = 2.0;
    pub const BOUNCE_SPREAD: f32 = 2.0;
    /// Downward kick added after a peg bounce
    pub const BOUNCE_LIFT: f32 = 1.0;
    /// Peg bounce horizontal jitter range
    pub const PEG_JITTER: f32 = 2.0;

    /// Ball joins a bucket once it falls past this depth
    pub const BUCKET_ENTRY_Y: f32 = 240.0;
    /// Horizontal extent covered by the bucket row
    pub const BUCKET_SPAN: f32 = 250.0;
    /// Vertical speed kept when entering a bucket
    pub const BUCKET_ENTRY_DAMPING: f32 = 0.6;
    /// Pull toward the bucket center on entry
    pub const BUCKET_CENTER_PULL: f32 = 0.03;
    /// Nudge away from a bucket wall after contact (prevents sticking)
    pub const BUCKET_WALL_NUDGE: f32 = 2.0;
    /// Bucket floor sits this far above the bucket's bottom edge
    pub const BUCKET_FLOOR_PADDING: f32 = 10.0;
    pub const FLOOR_DAMPING: f32 = 0.5;
    pub const FLOOR_JITTER: f32 = 0.5;
    pub const FLOOR_FRICTION: f32 = 0.95;
    /// Both speed components must drop below this to settle
    pub const SETTLE_SPEED: f32 = 0.5;

    /// Ball is considered lost past this depth
    pub const OFF_BOARD_Y: f32 = 300.0;

    /// Timings (milliseconds)
    pub const FIRST_DROP_DELAY_MS: f64 = 500.0;
    pub const PEG_HIGHLIGHT_MS: f64 = 200.0;
    pub const GLOW_MS: f64 = 1000.0;
    pub const NEXT_BALL_DELAY_MS: f64 = 1000.0;

    /// Ball opacity after settling
    pub const FADED_OPACITY: f32 = 0.2;

    /// Nominal frame interval for headless runs (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
