//! Delay scheduling for playback ticks.
//!
//! Playback only needs one primitive: run this callback once, `delay_ms` from
//! now. There is no cancel API; playbacks cancel cooperatively by checking a
//! flag when their callback fires.
//!
//! `TimerQueue` is a single-threaded event queue with a virtual clock. Nothing
//! happens until the owner advances the clock, which makes timing fully
//! deterministic in tests. A host that wants wall-clock behavior sleeps until
//! `next_deadline()` and then calls `advance_to` with it.
//!
//! Callbacks scheduled from inside a firing callback inherit a nesting level.
//! Past `MAX_TIMER_NESTING` levels, delays shorter than `MIN_NESTED_DELAY_MS`
//! are raised to it, like browser timers. A chain of zero-delay callbacks
//! therefore keeps making progress without pinning the clock at one instant.
//!
//! # Example
//!
//! ```ignore
//! let queue = TimerQueue::new();
//! queue.schedule_after(400.0, Box::new(|| println!("fired")));
//! queue.advance(399.0); // nothing
//! queue.advance(1.0);   // prints "fired"
//! ```

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;

/// A fire-once callback.
pub type Task = Box<dyn FnOnce()>;

/// Fire-once delay scheduling.
pub trait Scheduler {
    /// Run `task` once, `delay_ms` milliseconds from now. Negative or NaN
    /// delays mean "as soon as possible".
    fn schedule_after(&self, delay_ms: f64, task: Task);

    /// Current time on this scheduler's clock, in milliseconds.
    fn now_ms(&self) -> f64;
}

/// Nesting depth after which short delays are clamped.
pub const MAX_TIMER_NESTING: u32 = 5;

/// Minimum delay of a callback scheduled deeper than `MAX_TIMER_NESTING`.
pub const MIN_NESTED_DELAY_MS: f64 = 4.0;

/// Normalize a requested delay: negative and NaN become zero.
pub fn clamp_delay(delay_ms: f64) -> f64 {
    if delay_ms.is_nan() || delay_ms < 0.0 {
        0.0
    } else {
        delay_ms
    }
}

struct Entry {
    deadline: f64,
    seq: u64,
    nesting: u32,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // BinaryHeap is a max-heap; invert so the earliest (deadline, seq) pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .total_cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct QueueState {
    now: f64,
    next_seq: u64,
    entries: BinaryHeap<Entry>,
    /// Nesting level of the callback currently running, if any.
    firing: Option<u32>,
}

/// Virtual-time timer queue. Clones share the same queue and clock.
#[derive(Clone, Default)]
pub struct TimerQueue {
    inner: Rc<RefCell<QueueState>>,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("TimerQueue")
            .field("now", &state.now)
            .field("pending", &state.entries.len())
            .finish()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting to fire.
    pub fn pending(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Deadline of the earliest pending callback.
    pub fn next_deadline(&self) -> Option<f64> {
        self.inner.borrow().entries.peek().map(|e| e.deadline)
    }

    /// Move the clock forward by `delta_ms`, firing everything that becomes due.
    ///
    /// Returns the number of callbacks fired.
    pub fn advance(&self, delta_ms: f64) -> usize {
        let target = self.now_ms() + clamp_delay(delta_ms);
        self.advance_to(target)
    }

    /// Move the clock to `instant_ms`, firing everything due at or before it.
    /// The clock never moves backwards.
    pub fn advance_to(&self, instant_ms: f64) -> usize {
        let fired = self.fire_until(instant_ms);
        let mut state = self.inner.borrow_mut();
        if instant_ms > state.now {
            state.now = instant_ms;
        }
        fired
    }

    /// Fire callbacks in order until the queue is empty or the next deadline
    /// lies more than `limit_ms` ahead of the starting time. The clock stops at
    /// the last fired deadline.
    pub fn run_until_idle(&self, limit_ms: f64) -> usize {
        let end = self.now_ms() + clamp_delay(limit_ms);
        self.fire_until(end)
    }

    fn fire_until(&self, end: f64) -> usize {
        let mut fired = 0;
        loop {
            // The borrow must end before the task runs: tasks schedule more tasks.
            let (task, outer) = {
                let mut state = self.inner.borrow_mut();
                match state.entries.peek() {
                    Some(next) if next.deadline <= end => {}
                    _ => break,
                }
                let Some(entry) = state.entries.pop() else {
                    break;
                };
                if entry.deadline > state.now {
                    state.now = entry.deadline;
                }
                let outer = state.firing.replace(entry.nesting);
                (entry.task, outer)
            };
            task();
            self.inner.borrow_mut().firing = outer;
            fired += 1;
        }
        fired
    }
}

impl Scheduler for TimerQueue {
    fn schedule_after(&self, delay_ms: f64, task: Task) {
        let mut state = self.inner.borrow_mut();
        let nesting = state.firing.unwrap_or(0);
        let mut delay = clamp_delay(delay_ms);
        if nesting > MAX_TIMER_NESTING && delay < MIN_NESTED_DELAY_MS {
            delay = MIN_NESTED_DELAY_MS;
        }
        let deadline = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.push(Entry {
            deadline,
            seq,
            nesting: nesting + 1,
            task,
        });
    }

    fn now_ms(&self) -> f64 {
        self.inner.borrow().now
    }
}
