//! Plinko engine: runs the simulation against a page surface
//!
//! Owns the current run, the bucket colors and the scheduler. The host only
//! needs to call `pump` with the current time once per display frame.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::schedule::{CancelToken, Scheduler};
use crate::sim::{
    BoardGeometry, BucketColors, RandomSource, Run, RunPhase, StepEvent, data_size_label, step,
};
use crate::surface::{Element, Surface, VisualFlag};
use crate::tuning::PlinkoTuning;

/// Work the engine schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    StartNewBall,
    Frame,
    ClearPegHighlight(usize),
    /// Glow over: paint the bucket and fade the ball
    FinishSettle { bucket: usize },
}

/// Why the engine refused to mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountError {
    MissingBall,
    MissingLabel,
    MissingBoard,
    NoPegs,
    NoBuckets,
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            MountError::MissingBall => "ball element not found",
            MountError::MissingLabel => "ball label element not found",
            MountError::MissingBoard => "board element not found",
            MountError::NoPegs => "no pegs on the board",
            MountError::NoBuckets => "no buckets on the board",
        };
        f.write_str(what)
    }
}

impl std::error::Error for MountError {}

/// Counters for finished runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub drops: u32,
    pub settles: u32,
    pub off_board: u32,
}

pub struct Plinko<S, R> {
    surface: S,
    rng: R,
    tuning: PlinkoTuning,
    scheduler: Scheduler<Task>,
    run: Option<Run>,
    colors: BucketColors,
    /// Pending highlight expiry per peg
    peg_timers: HashMap<usize, CancelToken>,
    active_bucket: Option<usize>,
    /// Offset last written to the surface
    rendered_offset: Vec2,
    stats: RunStats,
}

impl<S: Surface, R: RandomSource> Plinko<S, R> {
    /// Attach to a surface and schedule the first drop
    ///
    /// Fails without touching the surface if any required element is missing.
    pub fn mount(surface: S, rng: R, tuning: PlinkoTuning) -> Result<Self, MountError> {
        if !surface.is_present(Element::Ball) {
            return Err(MountError::MissingBall);
        }
        if !surface.is_present(Element::Label) {
            return Err(MountError::MissingLabel);
        }
        if !surface.is_present(Element::Board) {
            return Err(MountError::MissingBoard);
        }
        if surface.peg_count() == 0 {
            return Err(MountError::NoPegs);
        }
        if surface.bucket_count() == 0 {
            return Err(MountError::NoBuckets);
        }

        let colors = BucketColors::new(surface.bucket_count());
        let mut scheduler = Scheduler::new();
        scheduler.after(tuning.first_drop_delay_ms, Task::StartNewBall);

        log::info!(
            "Plinko mounted: {} pegs, {} buckets",
            surface.peg_count(),
            surface.bucket_count()
        );

        Ok(Self {
            surface,
            rng,
            tuning,
            scheduler,
            run: None,
            colors,
            peg_timers: HashMap::new(),
            active_bucket: None,
            rendered_offset: Vec2::ZERO,
            stats: RunStats::default(),
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn bucket_colors(&self) -> &BucketColors {
        &self.colors
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Fire due timers, then this frame's tasks
    pub fn pump(&mut self, now_ms: f64) {
        for task in self.scheduler.advance_to(now_ms) {
            self.handle(task);
        }
        for task in self.scheduler.take_frame() {
            self.handle(task);
        }
    }

    /// Drive the engine with evenly spaced frames
    pub fn run_for(&mut self, duration_ms: f64, frame_ms: f64) {
        let end = self.now_ms() + duration_ms;
        let mut now = self.now_ms();
        while now < end {
            now = (now + frame_ms).min(end);
            self.pump(now);
        }
    }

    /// Drop everything that is still scheduled
    pub fn stop(&mut self) {
        self.scheduler.cancel_all();
        self.peg_timers.clear();
    }

    fn handle(&mut self, task: Task) {
        match task {
            Task::StartNewBall => self.start_new_ball(),
            Task::Frame => self.frame(),
            Task::ClearPegHighlight(peg) => {
                self.peg_timers.remove(&peg);
                self.surface
                    .set_visual_state(Element::Peg(peg), VisualFlag::Highlight, false);
            }
            Task::FinishSettle { bucket } => self.finish_settle(bucket),
        }
    }

    /// Reset the ball near the top and start animating it
    pub fn start_new_ball(&mut self) {
        if self.run.as_ref().is_some_and(|r| !r.phase.is_finished()) {
            log::warn!("Ignoring new ball while a run is still animating");
            return;
        }

        if let Some(bucket) = self.active_bucket.take() {
            self.surface
                .set_visual_state(Element::Bucket(bucket), VisualFlag::Active, false);
        }

        let run = Run::drop_new(&self.tuning, &mut self.rng);
        let label = data_size_label(&mut self.rng);
        log::debug!("Dropping {} ball at {:?}", label, run.ball.pos);

        self.surface.set_label(&label);
        self.place_ball(run.ball.pos);
        self.surface
            .set_visual_state(Element::Ball, VisualFlag::Faded, false);

        self.run = Some(run);
        self.stats.drops += 1;
        self.scheduler.next_frame(Task::Frame);
    }

    fn frame(&mut self) {
        let Some(mut run) = self.run.take() else {
            return;
        };
        if run.phase.is_finished() {
            self.run = Some(run);
            return;
        }

        let Some(board) = self.board_geometry() else {
            // Layout not available (hidden or detached); try again next frame
            self.run = Some(run);
            self.scheduler.next_frame(Task::Frame);
            return;
        };

        let events = step(&mut run, &board, &self.tuning, &mut self.rng);
        for event in events {
            match event {
                StepEvent::PegHit(peg) => self.highlight_peg(peg),
                StepEvent::EnteredBucket(bucket) => {
                    self.active_bucket = Some(bucket);
                    self.surface
                        .set_visual_state(Element::Bucket(bucket), VisualFlag::Active, true);
                }
                StepEvent::Settled(_) => {}
                StepEvent::OffBoard => {
                    log::debug!("Ball left the board after {} frames", run.steps);
                }
            }
        }

        self.place_ball(run.ball.pos);
        let phase = run.phase;
        self.run = Some(run);

        match phase {
            RunPhase::Settled { bucket } => self.on_settle(bucket),
            RunPhase::OffBoard => {
                self.stats.off_board += 1;
                self.scheduler
                    .after(self.tuning.next_ball_delay_ms, Task::StartNewBall);
            }
            RunPhase::Falling | RunPhase::EnteringBucket { .. } | RunPhase::Settling { .. } => {
                self.scheduler.next_frame(Task::Frame);
            }
        }
    }

    /// Toggle the bucket color and start the glow
    fn on_settle(&mut self, bucket: usize) {
        self.stats.settles += 1;
        let color = self.colors.toggle(bucket);
        log::debug!("Ball settled in bucket {}, now {:?}", bucket, color);

        self.surface
            .set_visual_state(Element::Bucket(bucket), VisualFlag::Glow, true);
        self.scheduler
            .after(self.tuning.glow_ms, Task::FinishSettle { bucket });
    }

    fn finish_settle(&mut self, bucket: usize) {
        self.surface
            .set_visual_state(Element::Bucket(bucket), VisualFlag::Glow, false);
        if let Some(color) = self.colors.get(bucket) {
            let (flag, on) = VisualFlag::for_color(color);
            self.surface.set_visual_state(Element::Bucket(bucket), flag, on);
        }
        self.surface
            .set_visual_state(Element::Ball, VisualFlag::Faded, true);
        self.scheduler
            .after(self.tuning.next_ball_delay_ms, Task::StartNewBall);
    }

    /// Highlight a peg, restarting its timer if it was already lit
    fn highlight_peg(&mut self, peg: usize) {
        if let Some(token) = self.peg_timers.remove(&peg) {
            token.cancel();
        }
        self.surface
            .set_visual_state(Element::Peg(peg), VisualFlag::Highlight, true);
        let token = self
            .scheduler
            .after(self.tuning.peg_highlight_ms, Task::ClearPegHighlight(peg));
        self.peg_timers.insert(peg, token);
    }

    fn place_ball(&mut self, offset: Vec2) {
        self.surface.place_ball(offset);
        self.rendered_offset = offset;
    }

    /// Current layout translated into ball space
    fn board_geometry(&self) -> Option<BoardGeometry> {
        let ball = self.surface.bounds(Element::Ball)?;
        let origin = ball.center() - self.rendered_offset;

        let pegs = (0..self.surface.peg_count())
            .map(|i| {
                self.surface
                    .bounds(Element::Peg(i))
                    .map(|rect| rect.relative_to(origin).inscribed_circle())
            })
            .collect::<Option<Vec<_>>>()?;
        let buckets = (0..self.surface.bucket_count())
            .map(|i| {
                self.surface
                    .bounds(Element::Bucket(i))
                    .map(|rect| rect.relative_to(origin))
            })
            .collect::<Option<Vec<_>>>()?;

        Some(BoardGeometry {
            ball_radius: ball.width / 2.0,
            pegs,
            buckets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::{BucketColor, Rect};
    use crate::surface::HeadlessBoard;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn mounted(seed: u64) -> Plinko<HeadlessBoard, Pcg32> {
        Plinko::mount(
            HeadlessBoard::landing_page(),
            Pcg32::seed_from_u64(seed),
            PlinkoTuning::default(),
        )
        .expect("landing page board mounts")
    }

    /// Surface missing some elements
    struct Partial {
        inner: HeadlessBoard,
        missing: Element,
    }

    impl Surface for Partial {
        fn is_present(&self, element: Element) -> bool {
            element != self.missing
        }
        fn peg_count(&self) -> usize {
            self.inner.peg_count()
        }
        fn bucket_count(&self) -> usize {
            self.inner.bucket_count()
        }
        fn bounds(&self, element: Element) -> Option<Rect> {
            self.inner.bounds(element)
        }
        fn set_visual_state(&mut self, element: Element, flag: VisualFlag, on: bool) {
            self.inner.set_visual_state(element, flag, on)
        }
        fn place_ball(&mut self, offset: Vec2) {
            self.inner.place_ball(offset)
        }
        fn set_label(&mut self, text: &str) {
            self.inner.set_label(text)
        }
    }

    #[test]
    fn test_mount_requires_elements() {
        for (missing, expected) in [
            (Element::Ball, MountError::MissingBall),
            (Element::Label, MountError::MissingLabel),
            (Element::Board, MountError::MissingBoard),
        ] {
            let surface = Partial {
                inner: HeadlessBoard::landing_page(),
                missing,
            };
            let result = Plinko::mount(surface, Pcg32::seed_from_u64(1), PlinkoTuning::default());
            assert_eq!(result.err(), Some(expected));
        }

        let mut no_pegs = HeadlessBoard::landing_page();
        no_pegs.pegs.clear();
        let result = Plinko::mount(no_pegs, Pcg32::seed_from_u64(1), PlinkoTuning::default());
        assert_eq!(result.err(), Some(MountError::NoPegs));

        let mut no_buckets = HeadlessBoard::landing_page();
        no_buckets.buckets.clear();
        let result = Plinko::mount(no_buckets, Pcg32::seed_from_u64(1), PlinkoTuning::default());
        assert_eq!(result.err(), Some(MountError::NoBuckets));
    }

    #[test]
    fn test_first_drop_waits_for_delay() {
        let mut plinko = mounted(3);
        plinko.run_for(400.0, FRAME_MS);
        assert!(plinko.run().is_none());

        plinko.run_for(200.0, FRAME_MS);
        let run = plinko.run().expect("ball dropped");
        assert_eq!(plinko.stats().drops, 1);
        assert!(!plinko.surface().label().is_empty());
        assert!(!plinko.surface().has_flag(Element::Ball, VisualFlag::Faded));
        assert!(run.steps > 0);
    }

    #[test]
    fn test_ball_offset_written_each_frame() {
        let mut plinko = mounted(8);
        plinko.run_for(1000.0, FRAME_MS);
        let run = plinko.run().expect("ball dropped");
        assert_eq!(plinko.surface().ball_offset(), run.ball.pos);
    }

    #[test]
    fn test_settle_cycle_toggles_and_restarts() {
        let mut plinko = mounted(42);

        // Advance until the first run finishes
        let mut guard = 0;
        while !plinko.run().is_some_and(|r| r.phase.is_finished()) {
            plinko.run_for(FRAME_MS, FRAME_MS);
            guard += 1;
            assert!(guard < 5000, "first run never finished");
        }

        let run = plinko.run().cloned().unwrap();
        let RunPhase::Settled { bucket } = run.phase else {
            // Off-board runs just restart
            assert_eq!(plinko.stats().off_board, 1);
            return;
        };

        // Color is flipped immediately, painted after the glow
        assert_eq!(plinko.bucket_colors().get(bucket), Some(BucketColor::Yellow));
        let element = Element::Bucket(bucket);
        assert!(plinko.surface().has_flag(element, VisualFlag::Glow));
        assert!(plinko.surface().has_flag(element, VisualFlag::Active));
        assert!(!plinko.surface().has_flag(element, VisualFlag::Filled));

        plinko.run_for(1000.0 + FRAME_MS, FRAME_MS);
        assert!(!plinko.surface().has_flag(element, VisualFlag::Glow));
        assert!(plinko.surface().has_flag(element, VisualFlag::Filled));
        assert!(plinko.surface().has_flag(Element::Ball, VisualFlag::Faded));
        assert_eq!(plinko.stats().drops, 1);

        plinko.run_for(1000.0 + FRAME_MS, FRAME_MS);
        assert_eq!(plinko.stats().drops, 2);
        assert!(!plinko.surface().has_flag(element, VisualFlag::Active));
        assert!(!plinko.surface().has_flag(Element::Ball, VisualFlag::Faded));
    }

    #[test]
    fn test_off_board_run_restarts_after_delay() {
        // Buckets below the exit depth are never reached
        let tuning = PlinkoTuning {
            bucket_entry_y: 10_000.0,
            ..PlinkoTuning::default()
        };
        let mut plinko = Plinko::mount(
            HeadlessBoard::landing_page(),
            Pcg32::seed_from_u64(31),
            tuning,
        )
        .expect("landing page board mounts");

        let mut guard = 0;
        while !plinko.run().is_some_and(|r| r.phase.is_finished()) {
            plinko.run_for(FRAME_MS, FRAME_MS);
            guard += 1;
            assert!(guard < 5000, "run never left the board");
        }

        assert_eq!(plinko.run().map(|r| r.phase), Some(RunPhase::OffBoard));
        assert_eq!(plinko.stats().off_board, 1);
        assert_eq!(plinko.stats().settles, 0);
        assert_eq!(plinko.stats().drops, 1);

        plinko.run_for(900.0, FRAME_MS);
        assert_eq!(plinko.stats().drops, 1);

        plinko.run_for(200.0, FRAME_MS);
        assert_eq!(plinko.stats().drops, 2);
        assert_eq!(plinko.run().map(|r| r.phase), Some(RunPhase::Falling));
    }

    #[test]
    fn test_long_session_keeps_single_ball_and_alternates_colors() {
        let mut plinko = mounted(2024);
        let mut settles_per_bucket = vec![0u32; 5];
        let mut last_settles = 0;

        for _ in 0..(120 * 60) {
            plinko.run_for(FRAME_MS, FRAME_MS);
            let stats = plinko.stats();
            if stats.settles > last_settles {
                last_settles = stats.settles;
                if let Some(RunPhase::Settled { bucket }) = plinko.run().map(|r| r.phase) {
                    settles_per_bucket[bucket] += 1;
                }
            }
            // Drops never outrun finished runs by more than the one in flight
            assert!(stats.drops <= stats.settles + stats.off_board + 1);
        }

        assert!(plinko.stats().settles > 5);
        for (bucket, count) in settles_per_bucket.iter().enumerate() {
            let expected = if count % 2 == 0 {
                BucketColor::White
            } else {
                BucketColor::Yellow
            };
            assert_eq!(plinko.bucket_colors().get(bucket), Some(expected));
        }
    }

    #[test]
    fn test_peg_highlight_restarts_on_rehit() {
        // First drop is at 500ms, so nothing else touches the pegs here
        let mut plinko = mounted(77);
        let peg = Element::Peg(3);

        plinko.highlight_peg(3);
        assert!(plinko.surface().has_flag(peg, VisualFlag::Highlight));

        plinko.pump(100.0);
        plinko.highlight_peg(3);
        plinko.pump(250.0);
        assert!(plinko.surface().has_flag(peg, VisualFlag::Highlight));

        plinko.pump(300.0);
        assert!(!plinko.surface().has_flag(peg, VisualFlag::Highlight));
    }

    #[test]
    fn test_pegs_light_up_during_drops() {
        let mut plinko = mounted(77);
        let mut seen = false;
        for _ in 0..600 {
            plinko.run_for(FRAME_MS, FRAME_MS);
            seen |= (0..plinko.surface().peg_count())
                .any(|i| plinko.surface().has_flag(Element::Peg(i), VisualFlag::Highlight));
        }
        assert!(seen);
    }

    #[test]
    fn test_stop_freezes_engine() {
        let mut plinko = mounted(12);
        plinko.run_for(600.0, FRAME_MS);
        plinko.stop();
        let before = plinko.run().cloned();
        plinko.run_for(5000.0, FRAME_MS);
        assert_eq!(plinko.run().cloned(), before);
        assert_eq!(plinko.stats().drops, 1);
    }

    #[test]
    fn test_start_new_ball_ignored_mid_run() {
        let mut plinko = mounted(5);
        plinko.run_for(600.0, FRAME_MS);
        let before = plinko.run().cloned();
        plinko.start_new_ball();
        assert_eq!(plinko.run().cloned(), before);
        assert_eq!(plinko.stats().drops, 1);
    }
}
