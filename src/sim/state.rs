//! Simulation state types
//!
//! A `Run` is one ball's life from drop to settle. Bucket colors are the only
//! state that outlives a run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Rect};
use crate::tuning::PlinkoTuning;

/// Source of uniform random numbers in [0, 1)
///
/// Any `rand::Rng` works; tests can plug in fixed sequences.
pub trait RandomSource {
    fn unit(&mut self) -> f32;

    /// Uniform value in [-half_width, half_width)
    fn centered(&mut self, half_width: f32) -> f32 {
        (self.unit() - 0.5) * 2.0 * half_width
    }
}

impl<R: rand::Rng> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Where a run is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Free fall through the peg field
    Falling,
    /// Crossed the entry depth this frame; bucket collisions start next frame
    EnteringBucket { bucket: usize },
    /// Bouncing around inside a bucket
    Settling { bucket: usize },
    /// Came to rest; the run is over
    Settled { bucket: usize },
    /// Fell past the board without settling; the run is over
    OffBoard,
}

impl RunPhase {
    /// Bucket the ball belongs to, if any
    pub fn bucket(&self) -> Option<usize> {
        match *self {
            RunPhase::EnteringBucket { bucket }
            | RunPhase::Settling { bucket }
            | RunPhase::Settled { bucket } => Some(bucket),
            RunPhase::Falling | RunPhase::OffBoard => None,
        }
    }

    /// No more steps will be taken for this run
    pub fn is_finished(&self) -> bool {
        matches!(self, RunPhase::Settled { .. } | RunPhase::OffBoard)
    }
}

/// The single live ball
///
/// `pos` is the offset of the ball from its rest position: x from the board's
/// center line, y from the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// One drop of the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub ball: Ball,
    pub phase: RunPhase,
    /// Frames stepped so far
    pub steps: u32,
}

impl Run {
    /// Start a run from an explicit ball state
    pub fn new(ball: Ball) -> Self {
        Self {
            ball,
            phase: RunPhase::Falling,
            steps: 0,
        }
    }

    /// Start a run near the top center with a randomized offset and velocity
    pub fn drop_new<R: RandomSource + ?Sized>(tuning: &PlinkoTuning, rng: &mut R) -> Self {
        let x = rng.centered(tuning.start_spread);
        let vx = rng.centered(tuning.start_vx_spread);
        Self::new(Ball::new(
            Vec2::new(x, tuning.start_y),
            Vec2::new(vx, tuning.start_vy),
        ))
    }
}

/// Bucket fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BucketColor {
    #[default]
    White,
    Yellow,
}

impl BucketColor {
    pub fn toggled(self) -> Self {
        match self {
            BucketColor::White => BucketColor::Yellow,
            BucketColor::Yellow => BucketColor::White,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            BucketColor::White => "white",
            BucketColor::Yellow => "#ffff00",
        }
    }
}

/// Persistent per-bucket colors
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BucketColors {
    colors: Vec<BucketColor>,
}

impl BucketColors {
    /// All buckets start white
    pub fn new(count: usize) -> Self {
        Self {
            colors: vec![BucketColor::White; count],
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, bucket: usize) -> Option<BucketColor> {
        self.colors.get(bucket).copied()
    }

    /// Flip a bucket's color, returning the new color
    pub fn toggle(&mut self, bucket: usize) -> Option<BucketColor> {
        let color = self.colors.get_mut(bucket)?;
        *color = color.toggled();
        Some(*color)
    }
}

/// Board layout in ball space for a single frame
///
/// Ball space puts the ball's center at `Ball::pos`, so pegs and buckets are
/// expressed relative to the ball's rest center.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardGeometry {
    pub ball_radius: f32,
    pub pegs: Vec<Circle>,
    pub buckets: Vec<Rect>,
}

/// Decorative payload label shown on the ball ("742KB", "0.8MB")
pub fn data_size_label<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let size = (rng.unit() * 1000.0).floor() as u32;
    format_data_size(size)
}

/// Sizes above 500 are shown in megabytes with one decimal
pub fn format_data_size(size: u32) -> String {
    if size > 500 {
        format!("{:.1}MB", f64::from(size) / 1000.0)
    } else {
        format!("{}KB", size)
    }
}
