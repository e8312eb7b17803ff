use std::fmt;

pub const COUNTDOWN_SECONDS: u32 = 47 * 60;
pub const SPOTS_FLOOR: u32 = 15;
pub const PROGRESS_STEP: u8 = 2;
pub const PROGRESS_MAX: u8 = 100;

/// Point reached in the reveal sequence. Ordered; the funnel only moves
/// forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Loading,
    Reveal1,
    Reveal2,
    OfferButton,
    Reveal3,
    Reveal4,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "loading",
            Stage::Reveal1 => "reveal_1",
            Stage::Reveal2 => "reveal_2",
            Stage::OfferButton => "offer_button",
            Stage::Reveal3 => "reveal_3",
            Stage::Reveal4 => "reveal_4",
        };
        f.write_str(name)
    }
}

/// Per-visit state of the result page.
#[derive(Clone, Debug, PartialEq)]
pub struct FunnelState {
    pub stage: Stage,
    pub loading_progress: u8,
    pub time_left: u32,
    pub spots_left: u32,
}

impl FunnelState {
    pub fn new(spots_left: u32) -> Self {
        Self {
            stage: Stage::Loading,
            loading_progress: 0,
            time_left: COUNTDOWN_SECONDS,
            spots_left,
        }
    }

    /// Moves to `stage` if it lies ahead. Returns whether the stage changed.
    pub fn advance_to(&mut self, stage: Stage) -> bool {
        if stage <= self.stage {
            return false;
        }
        self.stage = stage;
        true
    }

    /// Returns `true` once progress has saturated.
    pub fn tick_progress(&mut self) -> bool {
        self.loading_progress = self.loading_progress.saturating_add(PROGRESS_STEP).min(PROGRESS_MAX);
        self.loading_progress >= PROGRESS_MAX
    }

    pub fn tick_countdown(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
    }

    /// Decrements while above the floor. Returns the new value when it
    /// changed.
    pub fn tick_spots(&mut self) -> Option<u32> {
        if self.spots_left <= SPOTS_FLOOR {
            return None;
        }
        self.spots_left -= 1;
        Some(self.spots_left)
    }

    /// Highlighted row of the loading checklist, derived from progress:
    /// 0-39 → 0, 40-79 → 1, 80-99 → 2, 100 → 3.
    pub fn loading_step(&self) -> usize {
        match self.loading_progress {
            0..=39 => 0,
            40..=79 => 1,
            80..=99 => 2,
            _ => 3,
        }
    }

    /// Seconds shown under the progress bar, one per ten points left.
    pub fn loading_seconds_left(&self) -> u8 {
        PROGRESS_MAX.saturating_sub(self.loading_progress).div_ceil(10)
    }

    pub fn shows_offer_button(&self) -> bool {
        self.stage == Stage::OfferButton
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_only_move_forward() {
        let mut state = FunnelState::new(30);
        assert!(state.advance_to(Stage::Reveal2));
        assert!(!state.advance_to(Stage::Reveal1));
        assert!(!state.advance_to(Stage::Reveal2));
        assert_eq!(state.stage, Stage::Reveal2);
        assert!(state.advance_to(Stage::Reveal4));
    }

    #[test]
    fn progress_saturates_at_max() {
        let mut state = FunnelState::new(30);
        let ticks = (0..49).filter(|_| state.tick_progress()).count();
        assert_eq!(ticks, 0);
        assert_eq!(state.loading_progress, 98);
        assert!(state.tick_progress());
        assert!(state.tick_progress());
        assert_eq!(state.loading_progress, 100);
    }

    #[test]
    fn countdown_floors_at_zero() {
        let mut state = FunnelState::new(30);
        state.time_left = 1;
        state.tick_countdown();
        state.tick_countdown();
        assert_eq!(state.time_left, 0);
    }

    #[test]
    fn spots_stop_at_floor() {
        let mut state = FunnelState::new(SPOTS_FLOOR + 1);
        assert_eq!(state.tick_spots(), Some(SPOTS_FLOOR));
        assert_eq!(state.tick_spots(), None);
        assert_eq!(state.spots_left, SPOTS_FLOOR);
    }

    #[test]
    fn spots_below_floor_are_left_alone() {
        let mut state = FunnelState::new(3);
        assert_eq!(state.tick_spots(), None);
        assert_eq!(state.spots_left, 3);
    }

    #[test]
    fn loading_step_follows_progress() {
        let mut state = FunnelState::new(30);
        assert_eq!(state.loading_step(), 0);
        state.loading_progress = 40;
        assert_eq!(state.loading_step(), 1);
        state.loading_progress = 98;
        assert_eq!(state.loading_step(), 2);
        state.loading_progress = 100;
        assert_eq!(state.loading_step(), 3);
    }

    #[test]
    fn loading_seconds_round_up() {
        let mut state = FunnelState::new(30);
        assert_eq!(state.loading_seconds_left(), 10);
        state.loading_progress = 92;
        assert_eq!(state.loading_seconds_left(), 1);
        state.loading_progress = 100;
        assert_eq!(state.loading_seconds_left(), 0);
    }
}
