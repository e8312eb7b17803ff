//! Timer plumbing for the result page.
//!
//! Everything the page does on a clock is listed in the tables below as
//! `(delay, action)` pairs relative to the moment they are armed. A
//! [`Scheduler`] turns an entry into a live timer and hands back a
//! [`TimerHandle`]; dropping the handle cancels the timer.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;

use gloo_timers::callback::{Interval, Timeout};

use super::state::Stage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunnelAction {
    AdvanceProgress,
    CountdownTick,
    SpotsTick,
    Enter(Stage),
    ScrollToOffer,
    EmbedVideo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Every,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub delay_ms: u32,
    pub repeat: Repeat,
    pub action: FunnelAction,
}

impl Scheduled {
    pub const fn once(delay_ms: u32, action: FunnelAction) -> Self {
        Self { delay_ms, repeat: Repeat::Once, action }
    }

    pub const fn every(delay_ms: u32, action: FunnelAction) -> Self {
        Self { delay_ms, repeat: Repeat::Every, action }
    }
}

/// Armed when the result page mounts.
pub const MOUNT_SCHEDULE: [Scheduled; 6] = [
    Scheduled::every(100, FunnelAction::AdvanceProgress),
    Scheduled::every(1_000, FunnelAction::CountdownTick),
    Scheduled::every(45_000, FunnelAction::SpotsTick),
    Scheduled::once(6_500, FunnelAction::Enter(Stage::Reveal1)),
    Scheduled::once(12_500, FunnelAction::Enter(Stage::Reveal2)),
    Scheduled::once(15_500, FunnelAction::Enter(Stage::OfferButton)),
];

/// Armed when the visitor reveals the offer.
pub const REVEAL_OFFER_SCHEDULE: [Scheduled; 2] = [
    Scheduled::once(300, FunnelAction::ScrollToOffer),
    Scheduled::once(3_000, FunnelAction::Enter(Stage::Reveal4)),
];

/// Armed the first time the video section is on screen.
pub const VIDEO_EMBED: Scheduled = Scheduled::once(500, FunnelAction::EmbedVideo);

/// A live timer. Dropping it cancels the timer.
pub struct TimerHandle {
    _timer: Box<dyn Any>,
}

impl TimerHandle {
    pub fn new<T: Any>(timer: T) -> Self {
        Self { _timer: Box::new(timer) }
    }
}

pub trait Scheduler {
    fn once(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle;
    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle;
}

impl dyn Scheduler {
    pub fn arm(&self, entry: &Scheduled, mut callback: impl FnMut() + 'static) -> TimerHandle {
        match entry.repeat {
            Repeat::Once => self.once(entry.delay_ms, Box::new(move || callback())),
            Repeat::Every => self.every(entry.delay_ms, Box::new(callback)),
        }
    }
}

/// Browser timers (`setTimeout` / `setInterval`).
#[derive(Clone, Copy, Default)]
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    fn once(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::new(Timeout::new(delay_ms, callback))
    }

    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle {
        TimerHandle::new(Interval::new(period_ms, callback))
    }
}

/// The cancellation token for one page visit: every live timer, keyed by
/// the action it drives.
#[derive(Default)]
pub struct TimerSet {
    timers: RefCell<HashMap<FunnelAction, TimerHandle>>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks `handle`, cancelling any timer already armed for `action`.
    pub fn insert(&self, action: FunnelAction, handle: TimerHandle) {
        let previous = self.timers.borrow_mut().insert(action, handle);
        drop(previous);
    }

    pub fn cancel(&self, action: FunnelAction) {
        let handle = self.timers.borrow_mut().remove(&action);
        drop(handle);
    }

    #[cfg(test)]
    pub fn contains(&self, action: FunnelAction) -> bool {
        self.timers.borrow().contains_key(&action)
    }

    pub fn len(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn clear(&self) {
        let timers = std::mem::take(&mut *self.timers.borrow_mut());
        drop(timers);
    }
}


#[cfg(test)]
mod tests {
    use super::manual::ManualScheduler;
    use super::*;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<(u64, &'static str)>>>, Rc<ManualScheduler>) {
        (Rc::new(RefCell::new(Vec::new())), Rc::new(ManualScheduler::new()))
    }

    #[test]
    fn mount_schedule_reveals_in_ascending_order() {
        let reveals: Vec<u32> = MOUNT_SCHEDULE
            .iter()
            .filter(|entry| matches!(entry.action, FunnelAction::Enter(_)))
            .map(|entry| entry.delay_ms)
            .collect();
        assert_eq!(reveals, vec![6_500, 12_500, 15_500]);
        assert!(MOUNT_SCHEDULE
            .iter()
            .filter(|entry| matches!(entry.action, FunnelAction::Enter(_)))
            .all(|entry| entry.repeat == Repeat::Once));
    }

    #[test]
    fn manual_scheduler_fires_in_due_order() {
        let (log, scheduler) = recorder();
        let clock = scheduler.clone();
        let mut handles = Vec::new();
        for (delay, label) in [(300u32, "late"), (100, "early"), (300, "late-second")] {
            let log = log.clone();
            let clock = clock.clone();
            handles.push(scheduler.once(delay, Box::new(move || log.borrow_mut().push((clock.now(), label)))));
        }
        scheduler.advance(299);
        assert_eq!(*log.borrow(), vec![(100, "early")]);
        scheduler.advance(1);
        assert_eq!(*log.borrow(), vec![(100, "early"), (300, "late"), (300, "late-second")]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn repeating_timer_runs_until_dropped() {
        let (log, scheduler) = recorder();
        let clock = scheduler.clone();
        let tick_log = log.clone();
        let handle = scheduler.every(
            1_000,
            Box::new(move || tick_log.borrow_mut().push((clock.now(), "tick"))),
        );
        scheduler.advance(3_500);
        assert_eq!(log.borrow().len(), 3);
        drop(handle);
        scheduler.advance(10_000);
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn timer_set_cancels_on_clear_and_replace() {
        let (log, scheduler) = recorder();
        let timers = TimerSet::new();
        let first = log.clone();
        timers.insert(
            FunnelAction::ScrollToOffer,
            scheduler.once(100, Box::new(move || first.borrow_mut().push((0, "first")))),
        );
        let second = log.clone();
        timers.insert(
            FunnelAction::ScrollToOffer,
            scheduler.once(200, Box::new(move || second.borrow_mut().push((0, "second")))),
        );
        assert_eq!(timers.len(), 1);
        scheduler.advance(250);
        assert_eq!(*log.borrow(), vec![(0, "second")]);

        let third = log.clone();
        timers.insert(
            FunnelAction::EmbedVideo,
            scheduler.once(100, Box::new(move || third.borrow_mut().push((0, "third")))),
        );
        timers.clear();
        assert_eq!(timers.len(), 0);
        scheduler.advance(1_000);
        assert_eq!(log.borrow().len(), 1);
    }
}
