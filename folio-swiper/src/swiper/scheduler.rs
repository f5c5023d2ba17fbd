//! Step queue for a pane's deferred work.
//!
//! Two kinds of work exist: tasks that must wait for the next render commit
//! (optionally followed by a delay), and plain timers. Keeping them apart
//! makes "after the DOM committed" a structural guarantee instead of a
//! guess about timer ordering.

use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

/// Deferred work a pane performs on itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneTask {
    /// Read the first set's height
    Measure,
    /// Jump to the middle of the scrollable range
    Recenter,
    /// Start acting on boundary notifications
    ArmBoundaries,
    /// Compensate a recycle so the viewer sees no jump
    ApplyCorrection { token: u64, delta_px: f64 },
    /// Clear the in-flight recycle token
    ReleaseRecycle { token: u64 },
}

#[derive(Debug, Clone, Copy)]
struct CommitTask {
    task: PaneTask,
    delay: Duration,
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    after_commit: VecDeque<CommitTask>,
    timed: BTreeMap<(Instant, u64), PaneTask>,
    seq: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` as part of the next commit.
    pub fn after_commit(&mut self, task: PaneTask) {
        self.after_commit_delayed(task, Duration::ZERO);
    }

    /// Start a `delay` timer for `task` once the next commit happens.
    pub fn after_commit_delayed(&mut self, task: PaneTask, delay: Duration) {
        self.after_commit.push_back(CommitTask { task, delay });
    }

    pub fn schedule_at(&mut self, deadline: Instant, task: PaneTask) {
        self.seq += 1;
        self.timed.insert((deadline, self.seq), task);
    }

    pub fn schedule_in(
        &mut self,
        now: Instant,
        delay: Duration,
        task: PaneTask,
    ) {
        self.schedule_at(now + delay, task);
    }

    /// Called on commit: immediate tasks are returned in FIFO order,
    /// delayed ones become timers starting at `now`.
    pub fn take_commit_tasks(&mut self, now: Instant) -> Vec<PaneTask> {
        let mut ready = Vec::new();
        while let Some(entry) = self.after_commit.pop_front() {
            if entry.delay.is_zero() {
                ready.push(entry.task);
            } else {
                self.schedule_in(now, entry.delay, entry.task);
            }
        }
        ready
    }

    /// Earliest timer due at `now`, if any. Ties run in scheduling order.
    pub fn pop_due(&mut self, now: Instant) -> Option<PaneTask> {
        let entry = self.timed.first_entry()?;
        if entry.key().0 > now {
            return None;
        }
        Some(entry.remove())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timed.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn has_commit_work(&self) -> bool {
        !self.after_commit.is_empty()
    }

    pub fn len(&self) -> usize {
        self.after_commit.len() + self.timed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.after_commit.clear();
        self.timed.clear();
    }
}
