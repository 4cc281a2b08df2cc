mod schedule;
mod scheduler;
mod sequencer;

pub use schedule::{compute_reveal_schedule, RevealCue, RevealTimings, Stage};
pub use scheduler::{ManualClock, Scheduler, Task, TimerId};
pub use sequencer::RevealSequencer;
