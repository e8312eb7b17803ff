use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info};
use yew::Callback;

use super::effects::PageEffects;
use super::schedule::{FunnelAction, Scheduled, Scheduler, TimerSet, MOUNT_SCHEDULE, REVEAL_OFFER_SCHEDULE, VIDEO_EMBED};
use super::state::{FunnelState, Stage};
use super::video::VideoEmbedder;
use crate::storage::SpotsStore;
use crate::tracking::Trackers;

/// Collaborators the sequencer drives. All are narrow capabilities so the
/// page can run against the browser and tests against fakes.
#[derive(Clone)]
pub struct FunnelDeps {
    pub trackers: Trackers,
    pub spots: Rc<dyn SpotsStore>,
    pub embedder: Rc<dyn VideoEmbedder>,
    pub effects: Rc<dyn PageEffects>,
    pub video_widget_id: &'static str,
}

/// Drives the result page from mount to the final offer.
///
/// Reveals, cosmetic tickers and the deferred video embed all run off timers
/// armed on one [`Scheduler`] and tracked in one [`TimerSet`];
/// [`Sequencer::deactivate`] cancels every one of them. Timer callbacks hold
/// only a weak reference, so a dropped sequencer silently stops.
pub struct Sequencer {
    state: RefCell<FunnelState>,
    deps: FunnelDeps,
    scheduler: Rc<dyn Scheduler>,
    timers: TimerSet,
    video_armed: Cell<bool>,
    on_change: Callback<FunnelState>,
}

impl Sequencer {
    pub fn new(deps: FunnelDeps, scheduler: Rc<dyn Scheduler>, on_change: Callback<FunnelState>) -> Rc<Self> {
        let state = FunnelState::new(deps.spots.spots_left());
        Rc::new(Self {
            state: RefCell::new(state),
            deps,
            scheduler,
            timers: TimerSet::new(),
            video_armed: Cell::new(false),
            on_change,
        })
    }

    pub fn state(&self) -> FunnelState {
        self.state.borrow().clone()
    }

    /// Starts the page timeline. Call once per mount.
    pub fn activate(self: &Rc<Self>) {
        info!("Result page mounted, {} spots left", self.state.borrow().spots_left);
        self.deps.trackers.result_page_view();
        for entry in MOUNT_SCHEDULE.iter() {
            self.arm(entry);
        }
    }

    /// Cancels every pending timer. State is left as it is.
    pub fn deactivate(&self) {
        debug!("Cancelling {} funnel timers", self.timers.len());
        self.timers.clear();
    }

    /// The visitor asked to see the offer. Moves straight to the offer reveal
    /// from any earlier stage; later calls do nothing.
    pub fn reveal_offer(self: &Rc<Self>) {
        if !self.enter(Stage::Reveal3) {
            debug!("Offer already revealed");
            return;
        }
        self.deps.effects.play_reveal_sound();
        for entry in REVEAL_OFFER_SCHEDULE.iter() {
            self.arm(entry);
        }
        self.notify();
    }

    fn arm(self: &Rc<Self>, entry: &Scheduled) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let action = entry.action;
        let handle = self.scheduler.arm(entry, move || {
            if let Some(sequencer) = weak.upgrade() {
                sequencer.dispatch(action);
            }
        });
        self.timers.insert(action, handle);
    }

    fn dispatch(self: &Rc<Self>, action: FunnelAction) {
        match action {
            FunnelAction::AdvanceProgress => {
                let saturated = self.state.borrow_mut().tick_progress();
                if saturated {
                    self.timers.cancel(FunnelAction::AdvanceProgress);
                }
            }
            FunnelAction::CountdownTick => self.state.borrow_mut().tick_countdown(),
            FunnelAction::SpotsTick => {
                let updated = self.state.borrow_mut().tick_spots();
                if let Some(spots) = updated {
                    debug!("Spots left: {}", spots);
                    self.deps.spots.set_spots_left(spots);
                    self.deps.trackers.spots_updated(spots);
                }
            }
            FunnelAction::Enter(stage) => {
                self.enter(stage);
            }
            FunnelAction::ScrollToOffer => self.deps.effects.scroll_to_offer(),
            FunnelAction::EmbedVideo => {
                if let Err(e) = self.deps.embedder.ensure_loaded(self.deps.video_widget_id) {
                    error!("Failed to embed video: {}", e);
                }
            }
        }
        self.notify();
    }

    /// One-shot transition. Fires the stage's events and arms the video embed
    /// the first time the video section is reached.
    fn enter(self: &Rc<Self>, stage: Stage) -> bool {
        let advanced = self.state.borrow_mut().advance_to(stage);
        if !advanced {
            return false;
        }
        info!("Funnel stage: {}", stage);
        self.deps.trackers.stage_entered(stage);
        if stage >= Stage::Reveal2 && !self.video_armed.replace(true) {
            self.arm(&VIDEO_EMBED);
        }
        true
    }

    fn notify(&self) {
        self.on_change.emit(self.state());
    }
}
