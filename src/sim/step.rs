//! Per-frame simulation step
//!
//! Advances one run by a single animation frame and reports what happened so
//! the engine can update the page.

use super::collision::{
    bucket_collision, bucket_index, clamp_to_walls, enter_bucket, is_at_rest, peg_bounce,
};
use super::state::{BoardGeometry, RandomSource, Run, RunPhase};
use crate::tuning::PlinkoTuning;

/// Something the page should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Ball bounced off the peg at this index
    PegHit(usize),
    /// Ball dropped into the bucket at this index
    EnteredBucket(usize),
    /// Ball came to rest in the bucket at this index
    Settled(usize),
    /// Ball fell past the board without settling
    OffBoard,
}

/// Advance a run by one frame
///
/// Finished runs are left untouched. Events are returned in the order they
/// happened.
pub fn step<R: RandomSource + ?Sized>(
    run: &mut Run,
    board: &BoardGeometry,
    tuning: &PlinkoTuning,
    rng: &mut R,
) -> Vec<StepEvent> {
    let mut events = Vec::new();
    if run.phase.is_finished() {
        return events;
    }

    run.steps += 1;
    let ball = &mut run.ball;
    ball.pos += ball.vel;
    ball.vel.y += tuning.gravity;

    match run.phase {
        RunPhase::EnteringBucket { bucket } | RunPhase::Settling { bucket } => {
            run.phase = RunPhase::Settling { bucket };
            if let Some(rect) = board.buckets.get(bucket) {
                let contact = bucket_collision(ball, board.ball_radius, rect, tuning, rng);
                if contact.floor && is_at_rest(ball, tuning) {
                    run.phase = RunPhase::Settled { bucket };
                    events.push(StepEvent::Settled(bucket));
                }
            }
        }
        RunPhase::Falling => {
            clamp_to_walls(ball, tuning);

            // Each overlapping peg overrides the previous bounce
            for (i, peg) in board.pegs.iter().enumerate() {
                if peg_bounce(ball, board.ball_radius, peg, tuning, rng) {
                    log::trace!("Peg {} hit at {:?}", i, ball.pos);
                    events.push(StepEvent::PegHit(i));
                }
            }

            if ball.pos.y > tuning.bucket_entry_y && !board.buckets.is_empty() {
                let bucket = bucket_index(ball.pos.x, board.buckets.len(), tuning.bucket_span);
                enter_bucket(ball, &board.buckets[bucket], tuning);
                run.phase = RunPhase::EnteringBucket { bucket };
                events.push(StepEvent::EnteredBucket(bucket));
            }
        }
        RunPhase::Settled { .. } | RunPhase::OffBoard => return events,
    }

    if !run.phase.is_finished() && run.ball.pos.y >= tuning.off_board_y {
        run.phase = RunPhase::OffBoard;
        events.push(StepEvent::OffBoard);
    }

    events
}
