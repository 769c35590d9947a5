//! Deferred events driven by the game tick.
//!
//! Delayed effects (respawn after a few seconds, and so on) are queued here
//! instead of on independent timers. Each event carries the [`Liveness`] of the
//! thing it will mutate; when it comes due against a dead target it is dropped.

use std::{cell::Cell, rc::Rc};

/// Shared "is my target still around" flag.
///
/// Cloning shares the flag. Single-threaded: the whole core runs on the frame loop.
#[derive(Clone, Debug)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    /// Mark the target gone. Every clone observes it.
    pub fn kill(&self) {
        self.0.set(false);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies one scheduled event for [`TickScheduler::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

#[derive(Debug)]
struct Scheduled<E> {
    id: u64,
    due: f64,
    liveness: Liveness,
    event: E,
}

#[derive(Debug)]
pub struct TickScheduler<E> {
    now: f64,
    next_id: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for TickScheduler<E> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> TickScheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of tick time accumulated so far.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue `event` to fire `delay` seconds from now. Negative delays fire on the next advance.
    pub fn schedule(&mut self, delay: f32, liveness: &Liveness, event: E) -> ScheduleHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due: self.now + f64::from(delay.max(0.0)),
            liveness: liveness.clone(),
            event,
        });
        ScheduleHandle(id)
    }

    /// Remove a pending event. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: ScheduleHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != handle.0);
        self.pending.len() != before
    }

    /// Advance time by `dt` and return every live event that came due, in due order
    /// (ties in scheduling order).
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = rest;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter()
            .filter_map(|s| {
                if s.liveness.is_alive() {
                    Some(s.event)
                } else {
                    log::warn!("dropping scheduled event {}: target is gone", s.id);
                    None
                }
            })
            .collect()
    }
}
