use std::{
    cell::Cell,
    rc::{Rc, Weak},
};

use super::{compute_reveal_schedule, RevealCue, RevealTimings, Scheduler, Stage, TimerId};
use crate::lesson::Step;

// Stage storage for one run of the sequence. Each run gets a fresh slot, so a
// timer that outlives its run holds a dead weak reference and does nothing.
#[derive(Debug)]
struct StageSlot {
    stage: Cell<Stage>,
    pending: Cell<usize>,
}

impl StageSlot {
    fn new(stage: Stage, pending: usize) -> Rc<Self> {
        Rc::new(Self {
            stage: Cell::new(stage),
            pending: Cell::new(pending),
        })
    }

    fn reach(&self, stage: Stage) {
        if stage > self.stage.get() {
            self.stage.set(stage);
        }
        self.pending.set(self.pending.get().saturating_sub(1));
    }
}

/// Staged disclosure for one mounted slide.
///
/// Dropping the sequencer cancels every timer it still has pending.
pub struct RevealSequencer<S: Scheduler> {
    scheduler: S,
    schedule: Vec<RevealCue>,
    animated: bool,
    slot: Rc<StageSlot>,
    timers: Vec<TimerId>,
}

impl<S: Scheduler> RevealSequencer<S> {
    /// Mounts `step` and starts its sequence right away.
    pub fn mount(scheduler: S, step: &Step, animated: bool, timings: &RevealTimings) -> Self {
        let schedule = if animated {
            compute_reveal_schedule(step, timings)
        } else {
            Vec::new()
        };

        let mut sequencer = Self {
            scheduler,
            schedule,
            animated,
            slot: StageSlot::new(Stage::Revealed, 0),
            timers: Vec::new(),
        };
        sequencer.start();
        sequencer
    }

    pub fn stage(&self) -> Stage {
        self.slot.stage.get()
    }

    pub fn shows(&self, part: Stage) -> bool {
        self.stage().shows(part)
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    pub fn schedule(&self) -> &[RevealCue] {
        &self.schedule
    }

    pub fn pending_timers(&self) -> usize {
        self.slot.pending.get()
    }

    pub fn is_settled(&self) -> bool {
        self.pending_timers() == 0
    }

    /// Plays the sequence again from `Hidden`.
    pub fn replay(&mut self) {
        self.start();
    }

    /// Stops the sequence where it is. No pending timer can change the stage
    /// afterwards.
    pub fn unmount(&mut self) {
        self.cancel_pending();
        let stage = self.stage();
        self.slot = StageSlot::new(stage, 0);
    }

    fn start(&mut self) {
        self.cancel_pending();

        if !self.animated {
            self.slot = StageSlot::new(Stage::Revealed, 0);
            return;
        }

        self.slot = StageSlot::new(Stage::Hidden, self.schedule.len());
        for cue in &self.schedule {
            let slot: Weak<StageSlot> = Rc::downgrade(&self.slot);
            let stage = cue.stage;
            let id = self.scheduler.schedule(
                cue.delay,
                Box::new(move || {
                    if let Some(slot) = slot.upgrade() {
                        slot.reach(stage);
                    }
                }),
            );
            self.timers.push(id);
        }

        tracing::trace!(cues = self.schedule.len(), "reveal sequence started");
    }

    fn cancel_pending(&mut self) {
        for id in self.timers.drain(..) {
            self.scheduler.cancel(id);
        }
    }
}

impl<S: Scheduler> Drop for RevealSequencer<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl<S: Scheduler> std::fmt::Debug for RevealSequencer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealSequencer")
            .field("stage", &self.stage())
            .field("animated", &self.animated)
            .field("pending", &self.pending_timers())
            .finish()
    }
}
