//! Collision detection and response for the Plinko board
//!
//! Everything here works in ball space (see `BoardGeometry`). Responses are
//! deliberately arcade-like: fixed damping factors and random jitter rather
//! than true restitution.

use glam::Vec2;

use super::geometry::{Circle, Rect};
use super::state::{Ball, RandomSource};
use crate::tuning::PlinkoTuning;

/// Clamp the ball between the board's side walls
///
/// Returns true if the ball hit a wall (velocity is reflected and damped).
pub fn clamp_to_walls(ball: &mut Ball, tuning: &PlinkoTuning) -> bool {
    let max_x = tuning.max_x;
    if ball.pos.x < -max_x {
        ball.pos.x = -max_x;
    } else if ball.pos.x > max_x {
        ball.pos.x = max_x;
    } else {
        return false;
    }
    ball.vel.x *= -tuning.wall_damping;
    true
}

/// Bounce the ball off a peg if they overlap
///
/// The new velocity points away from the peg center with a random strength,
/// replacing (not adding to) the previous velocity.
pub fn peg_bounce<R: RandomSource + ?Sized>(
    ball: &mut Ball,
    ball_radius: f32,
    peg: &Circle,
    tuning: &PlinkoTuning,
    rng: &mut R,
) -> bool {
    let ball_circle = Circle::new(ball.pos, ball_radius);
    if !ball_circle.overlaps(peg) {
        return false;
    }

    let to_peg = peg.center - ball.pos;
    let angle = to_peg.y.atan2(to_peg.x);
    let force = tuning.bounce_base + rng.unit() * tuning.bounce_spread;

    ball.vel = Vec2::new(
        -angle.cos() * force,
        -angle.sin() * force + tuning.bounce_lift,
    );
    ball.vel.x += rng.centered(tuning.peg_jitter / 2.0);
    true
}

/// Map a horizontal offset onto the bucket row, clamped to a valid index
pub fn bucket_index(x: f32, bucket_count: usize, span: f32) -> usize {
    if bucket_count == 0 {
        return 0;
    }
    let width = span / bucket_count as f32;
    let raw = ((x + span / 2.0) / width).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(bucket_count - 1)
    }
}

/// Velocity adjustment applied when the ball drops into a bucket
pub fn enter_bucket(ball: &mut Ball, bucket: &Rect, tuning: &PlinkoTuning) {
    ball.vel.y *= tuning.bucket_entry_damping;
    ball.vel.x += (bucket.center().x - ball.pos.x) * tuning.bucket_center_pull;
}

/// Which parts of a bucket the ball touched this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketContact {
    pub left: bool,
    pub right: bool,
    pub floor: bool,
}

/// Resolve the ball against a bucket's walls and floor
///
/// Side walls are exclusive (left wins); the floor is tested independently.
pub fn bucket_collision<R: RandomSource + ?Sized>(
    ball: &mut Ball,
    ball_radius: f32,
    bucket: &Rect,
    tuning: &PlinkoTuning,
    rng: &mut R,
) -> BucketContact {
    let mut contact = BucketContact::default();
    let floor = bucket.bottom() - tuning.bucket_floor_padding;

    if ball.pos.x - ball_radius < bucket.left {
        ball.vel.x = ball.vel.x.abs() * tuning.wall_damping;
        ball.pos.x += tuning.bucket_wall_nudge;
        contact.left = true;
    } else if ball.pos.x + ball_radius > bucket.right() {
        ball.vel.x = -ball.vel.x.abs() * tuning.wall_damping;
        ball.pos.x -= tuning.bucket_wall_nudge;
        contact.right = true;
    }

    if ball.pos.y + ball_radius > floor {
        ball.vel.y = -ball.vel.y.abs() * tuning.floor_damping;
        ball.vel.x += rng.centered(tuning.floor_jitter / 2.0);
        ball.vel.x *= tuning.floor_friction;
        contact.floor = true;
    }

    contact
}

/// Ball is slow enough on both axes to count as resting
#[inline]
pub fn is_at_rest(ball: &Ball, tuning: &PlinkoTuning) -> bool {
    ball.vel.x.abs() < tuning.settle_speed && ball.vel.y.abs() < tuning.settle_speed
}
