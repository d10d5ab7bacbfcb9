//! Cancellable timer wheel for the scene's three kinds of callbacks: fixed-interval timers,
//! one-shot delays and per-frame subscriptions.
//!
//! The scheduler never runs anything itself. [`Scheduler::advance`] returns the payloads that
//! came due, and the owner dispatches them. Every subscription returns a [`TaskHandle`] that can
//! be cancelled individually, or all at once at teardown.

/// Identifies one subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Cadence {
    Once,
    Periodic(f64),
    EveryFrame,
}

#[derive(Debug)]
struct Subscription<T> {
    id: u64,
    due: f64,
    cadence: Cadence,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: f64,
    next_id: u64,
    subscriptions: Vec<Subscription<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            subscriptions: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires every `interval_secs`, first after one full interval.
    pub fn subscribe_periodic(&mut self, interval_secs: f64, task: T) -> TaskHandle {
        let interval = interval_secs.max(f64::from(f32::EPSILON));
        self.insert(self.now + interval, Cadence::Periodic(interval), task)
    }

    /// Fires once after `delay_secs`. A zero delay fires on the next advance.
    pub fn subscribe_once(&mut self, delay_secs: f64, task: T) -> TaskHandle {
        let due = self.now + delay_secs.max(0.0);
        self.insert(due, Cadence::Once, task)
    }

    /// Fires on every advance, after all timed tasks of that advance.
    pub fn subscribe_frame(&mut self, task: T) -> TaskHandle {
        self.insert(self.now, Cadence::EveryFrame, task)
    }

    fn insert(&mut self, due: f64, cadence: Cadence, task: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, due, cadence, task });
        TaskHandle(id)
    }

    /// Returns `false` if the subscription already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != handle.0);
        self.subscriptions.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.subscriptions.len();
        self.subscriptions.clear();
        count
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.subscriptions.iter().any(|s| s.id == handle.0)
    }

    pub fn pending(&self) -> usize {
        self.subscriptions.len()
    }

    /// Moves the clock forward and collects due payloads.
    ///
    /// Timed tasks come first in due order (ties by subscription order). A periodic task fires once
    /// per elapsed interval. Per-frame tasks follow.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += f64::from(dt.max(0.0));

        let mut fired: Vec<(f64, u64, T)> = Vec::new();
        let now = self.now;
        self.subscriptions.retain_mut(|sub| match sub.cadence {
            Cadence::Once => {
                if sub.due <= now {
                    fired.push((sub.due, sub.id, sub.task.clone()));
                    false
                } else {
                    true
                }
            }
            Cadence::Periodic(interval) => {
                while sub.due <= now {
                    fired.push((sub.due, sub.id, sub.task.clone()));
                    sub.due += interval;
                }
                true
            }
            Cadence::EveryFrame => true,
        });
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut tasks: Vec<T> = fired.into_iter().map(|(_, _, task)| task).collect();
        tasks.extend(
            self.subscriptions
                .iter()
                .filter(|s| s.cadence == Cadence::EveryFrame)
                .map(|s| s.task.clone()),
        );
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Task {
        Timer,
        Once(u32),
        Frame,
    }

    #[test]
    fn periodic_fires_on_interval_and_catches_up() {
        let mut scheduler = Scheduler::new();
        scheduler.subscribe_periodic(0.8, Task::Timer);

        assert!(scheduler.advance(0.5).is_empty());
        assert_eq!(scheduler.advance(0.5), vec![Task::Timer]);
        // 1.0 → 3.5 covers the 1.6, 2.4 and 3.2 deadlines
        assert_eq!(scheduler.advance(2.5), vec![Task::Timer; 3]);
    }

    #[test]
    fn one_shots_fire_once_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.subscribe_once(0.3, Task::Once(3));
        scheduler.subscribe_once(0.0, Task::Once(0));
        scheduler.subscribe_once(0.1, Task::Once(1));

        assert_eq!(scheduler.advance(0.0), vec![Task::Once(0)]);
        assert_eq!(scheduler.advance(0.5), vec![Task::Once(1), Task::Once(3)]);
        assert!(scheduler.advance(1.0).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn frame_tasks_run_after_timed_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.subscribe_frame(Task::Frame);
        scheduler.subscribe_once(0.01, Task::Once(7));

        assert_eq!(scheduler.advance(0.016), vec![Task::Once(7), Task::Frame]);
        assert_eq!(scheduler.advance(0.016), vec![Task::Frame]);
    }

    #[test]
    fn cancelled_subscriptions_never_fire() {
        let mut scheduler = Scheduler::new();
        let timer = scheduler.subscribe_periodic(0.1, Task::Timer);
        let once = scheduler.subscribe_once(0.05, Task::Once(1));
        let frame = scheduler.subscribe_frame(Task::Frame);

        assert!(scheduler.cancel(once));
        assert!(!scheduler.cancel(once));
        assert!(scheduler.is_pending(timer));
        assert!(scheduler.cancel(frame));
        assert_eq!(scheduler.advance(0.1), vec![Task::Timer]);

        assert_eq!(scheduler.cancel_all(), 1);
        assert!(!scheduler.is_pending(timer));
        assert!(scheduler.advance(10.0).is_empty());
    }
}
