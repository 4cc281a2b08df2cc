use std::{cell::RefCell, collections::BTreeMap, rc::Rc, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

pub type Task = Box<dyn FnOnce()>;

/// Runs a task once after a delay, unless cancelled first.
///
/// Implementations are handles: cloning one must yield a handle to the same
/// timer queue.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId;

    /// Cancelling a timer that already fired, or was already cancelled, is a
    /// no-op.
    fn cancel(&self, id: TimerId);
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, TimerId), Task>,
}

/// A scheduler driven by hand. Time only moves when `advance` is called, and
/// due timers fire in deadline order.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Absolute time of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state
            .borrow()
            .timers
            .keys()
            .next()
            .map(|(deadline, _)| *deadline)
    }

    /// Moves time forward by `by`, firing every timer that falls due on the
    /// way. Returns how many fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;

        loop {
            // the borrow must end before the task runs, tasks may schedule
            let task = {
                let mut state = self.state.borrow_mut();
                let due = state.timers.keys().next().copied();
                match due {
                    Some(key) if key.0 <= target => {
                        state.now = key.0;
                        state.timers.remove(&key)
                    }
                    _ => None,
                }
            };

            match task {
                Some(task) => {
                    task();
                    fired += 1;
                }
                None => break,
            }
        }

        self.state.borrow_mut().now = target;
        fired
    }

    /// Fires everything that is pending.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            fired += self.advance(deadline.saturating_sub(self.now()));
        }
        fired
    }
}

impl Scheduler for ManualClock {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        let deadline = state.now + delay;
        state.timers.insert((deadline, id), task);
        id
    }

    fn cancel(&self, id: TimerId) {
        self.state
            .borrow_mut()
            .timers
            .retain(|(_, timer), _| *timer != id);
    }
}

impl std::fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualClock")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}
