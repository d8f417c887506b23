//! Virtual-clock task scheduler
//!
//! Stands in for `requestAnimationFrame` and `setTimeout`. The host advances
//! the clock (from frame timestamps in the browser, or by fixed increments in
//! tests) and gets back the tasks that became due, so nothing here waits on
//! real time.

use std::cell::Cell;
use std::rc::Rc;

/// Shared cancellation flag for a scheduled task
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug)]
struct Timer<T> {
    due_ms: f64,
    /// Insertion order, breaks ties between timers due at the same time
    seq: u64,
    task: T,
    token: CancelToken,
}

/// Frame and timer queues driven by an external clock
#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: f64,
    next_seq: u64,
    timers: Vec<Timer<T>>,
    frame: Vec<(T, CancelToken)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            timers: Vec::new(),
            frame: Vec::new(),
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Run `task` once `delay_ms` has elapsed
    pub fn after(&mut self, delay_ms: f64, task: T) -> CancelToken {
        let token = CancelToken::new();
        self.timers.push(Timer {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq: self.next_seq,
            task,
            token: token.clone(),
        });
        self.next_seq += 1;
        token
    }

    /// Run `task` on the next frame
    pub fn next_frame(&mut self, task: T) -> CancelToken {
        let token = CancelToken::new();
        self.frame.push((task, token.clone()));
        token
    }

    /// Move the clock forward and collect due timers in due order
    ///
    /// The clock never runs backwards; an earlier timestamp is ignored.
    pub fn advance_to(&mut self, now_ms: f64) -> Vec<T> {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        let now = self.now_ms;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|t| t.due_ms <= now);
        self.timers = pending;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter()
            .filter(|t| !t.token.is_cancelled())
            .map(|t| t.task)
            .collect()
    }

    /// Take the tasks queued for this frame
    ///
    /// Tasks queued while handling them land in the following frame.
    pub fn take_frame(&mut self) -> Vec<T> {
        self.frame
            .drain(..)
            .filter(|(_, token)| !token.is_cancelled())
            .map(|(task, _)| task)
            .collect()
    }

    /// Cancel everything that is still queued
    pub fn cancel_all(&mut self) {
        for timer in self.timers.drain(..) {
            timer.token.cancel();
        }
        for (_, token) in self.frame.drain(..) {
            token.cancel();
        }
    }

    /// Number of live (not cancelled) queued tasks
    pub fn pending(&self) -> usize {
        self.timers.iter().filter(|t| !t.token.is_cancelled()).count()
            + self.frame.iter().filter(|(_, t)| !t.is_cancelled()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut sched = Scheduler::new();
        sched.after(300.0, "c");
        sched.after(100.0, "a");
        sched.after(100.0, "b");

        assert!(sched.advance_to(50.0).is_empty());
        assert_eq!(sched.advance_to(150.0), vec!["a", "b"]);
        assert_eq!(sched.advance_to(1000.0), vec!["c"]);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut sched = Scheduler::new();
        sched.advance_to(1000.0);
        sched.after(200.0, 1);
        assert!(sched.advance_to(1100.0).is_empty());
        assert_eq!(sched.advance_to(1200.0), vec![1]);
    }

    #[test]
    fn test_cancelled_tasks_are_dropped() {
        let mut sched = Scheduler::new();
        let token = sched.after(100.0, 1);
        sched.after(100.0, 2);
        let frame = sched.next_frame(3);
        token.cancel();
        frame.cancel();
        assert_eq!(sched.advance_to(100.0), vec![2]);
        assert!(sched.take_frame().is_empty());
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut sched: Scheduler<u8> = Scheduler::new();
        sched.advance_to(500.0);
        sched.advance_to(100.0);
        assert_eq!(sched.now_ms(), 500.0);
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = Scheduler::new();
        let token = sched.after(10.0, 1);
        sched.next_frame(2);
        sched.cancel_all();
        assert!(token.is_cancelled());
        assert_eq!(sched.pending(), 0);
        assert!(sched.advance_to(100.0).is_empty());
    }
}
