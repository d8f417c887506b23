//! Ball-drop simulation module
//!
//! All Plinko physics lives here. This module must stay pure:
//! - One frame per `step` call, no clocks
//! - Randomness only through an injected `RandomSource`
//! - Pegs and buckets visited in page order
//! - No DOM or platform dependencies

pub mod collision;
pub mod geometry;
pub mod state;
pub mod step;

pub use collision::{BucketContact, bucket_index};
pub use geometry::{Circle, Rect};
pub use state::{
    Ball, BoardGeometry, BucketColor, BucketColors, RandomSource, Run, RunPhase, data_size_label,
};
pub use step::{StepEvent, step};
