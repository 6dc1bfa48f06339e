use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// A periodic task registered with a scheduler.
pub type Task = Box<dyn FnMut() + Send>;

/// Something that can run a task periodically.
pub trait Scheduler: Send + Sync {
    /// Run `task` every `interval` until the returned token is cancelled.
    fn every(&self, interval: Duration, task: Task) -> CancelToken;
}

/// A handle to a periodic task.
///
/// Once [CancelToken::cancel] returns, the task is guaranteed to never be invoked again.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

struct Timer {
    id: u64,
    interval: Duration,
    due: Duration,
    task: Task,
    token: CancelToken,
}

#[derive(Default)]
struct QueueState {
    timers: Vec<Timer>,
    now: Duration,
    next_id: u64,
}

/// The timer bookkeeping shared by every scheduler implementation.
///
/// Time is expressed as an offset from an arbitrary origin. Tasks are always run with the queue
/// unlocked so they can register or cancel other timers.
#[derive(Default)]
struct TimerQueue {
    state: Mutex<QueueState>,
}

impl TimerQueue {
    fn register(&self, interval: Duration, task: Task) -> CancelToken {
        // A zero interval would spin forever inside a single `fire_until`.
        let interval = interval.max(Duration::from_millis(1));
        let token = CancelToken::default();
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + interval;
        state.timers.push(Timer { id, interval, due, task, token: token.clone() });
        token
    }

    /// Fire every timer that becomes due up to and including `target`, in deadline order.
    fn fire_until(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let mut timer = {
                let mut state = self.state.lock().unwrap();
                state.timers.retain(|timer| !timer.token.is_cancelled());
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.id))
                    .map(|(index, _)| index);
                let Some(index) = next else {
                    state.now = state.now.max(target);
                    return fired;
                };
                let timer = state.timers.swap_remove(index);
                state.now = state.now.max(timer.due);
                timer
            };
            (timer.task)();
            fired += 1;
            if !timer.token.is_cancelled() {
                timer.due += timer.interval;
                self.state.lock().unwrap().timers.push(timer);
            }
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        let state = self.state.lock().unwrap();
        state.timers.iter().filter(|timer| !timer.token.is_cancelled()).map(|timer| timer.due).min()
    }

    fn sync_clock(&self, now: Duration) {
        let mut state = self.state.lock().unwrap();
        state.now = state.now.max(now);
    }

    fn now(&self) -> Duration {
        self.state.lock().unwrap().now
    }
}

/// A scheduler driven by virtual time.
///
/// Nothing happens until [ManualScheduler::advance] is called, which makes animations fully
/// deterministic.
#[derive(Default)]
pub struct ManualScheduler {
    queue: TimerQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward, running every task that becomes due. Returns the number of task runs.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.queue.now() + by;
        self.queue.fire_until(target)
    }

    /// The amount of virtual time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.queue.now()
    }

    /// Whether there's at least one live timer.
    pub fn has_pending(&self) -> bool {
        self.queue.next_deadline().is_some()
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, interval: Duration, task: Task) -> CancelToken {
        self.queue.register(interval, task)
    }
}

/// A scheduler driven by the wall clock.
///
/// This is cooperative: tasks only run inside [ClockScheduler::run_for] and
/// [ClockScheduler::run_until_idle], on the calling thread, and never overlap.
pub struct ClockScheduler {
    queue: TimerQueue,
    origin: Instant,
}

impl ClockScheduler {
    pub fn new() -> Self {
        Self { queue: TimerQueue::default(), origin: Instant::now() }
    }

    /// Run due tasks for up to `limit`, sleeping between deadlines.
    pub fn run_for(&self, limit: Duration) {
        let end = self.origin.elapsed() + limit;
        loop {
            let now = self.origin.elapsed();
            self.queue.fire_until(now);
            let Some(deadline) = self.queue.next_deadline() else {
                return;
            };
            let wake = deadline.min(end);
            let now = self.origin.elapsed();
            if wake <= now {
                if now >= end {
                    return;
                }
                continue;
            }
            thread::sleep(wake - now);
            if wake == end {
                self.queue.fire_until(self.origin.elapsed());
                return;
            }
        }
    }

    /// Run until every timer has been cancelled.
    pub fn run_until_idle(&self) {
        while self.queue.next_deadline().is_some() {
            self.run_for(Duration::from_millis(100));
        }
    }

    pub fn is_idle(&self) -> bool {
        self.queue.next_deadline().is_none()
    }
}

impl Default for ClockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ClockScheduler {
    fn every(&self, interval: Duration, task: Task) -> CancelToken {
        // The queue's clock only moves while running, so catch it up before computing the
        // first deadline.
        self.queue.sync_clock(self.origin.elapsed());
        self.queue.register(interval, task)
    }
}
