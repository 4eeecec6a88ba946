//! Slide-in panel state machine
//!
//! Closed -> Opening -> Open -> Closing -> Closed, with the Opening and
//! Closing phases lasting `transition`. Time is passed in so the machine
//! stays deterministic under test.

use std::time::{Duration, Instant};

/// Default slide animation length
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Opening { since: Instant },
    Open,
    Closing { since: Instant },
}

/// State without timestamps, for matching and display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone)]
pub struct Panel {
    state: PanelState,
    transition: Duration,
}

impl Panel {
    pub fn new(transition: Duration) -> Self {
        Self { state: PanelState::Closed, transition }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn phase(&self) -> PanelPhase {
        match self.state {
            PanelState::Closed => PanelPhase::Closed,
            PanelState::Opening { .. } => PanelPhase::Opening,
            PanelState::Open => PanelPhase::Open,
            PanelState::Closing { .. } => PanelPhase::Closing,
        }
    }

    /// Anything but Closed is drawn
    pub fn is_visible(&self) -> bool {
        self.state != PanelState::Closed
    }

    /// Open or opening; the panel should receive input
    pub fn is_engaged(&self) -> bool {
        matches!(self.state, PanelState::Opening { .. } | PanelState::Open)
    }

    pub fn open(&mut self, now: Instant) {
        match self.state {
            PanelState::Closed | PanelState::Closing { .. } => {
                self.state = if self.transition.is_zero() {
                    PanelState::Open
                } else {
                    PanelState::Opening { since: now }
                };
            }
            PanelState::Opening { .. } | PanelState::Open => {}
        }
    }

    pub fn close(&mut self, now: Instant) {
        match self.state {
            PanelState::Open | PanelState::Opening { .. } => {
                self.state = if self.transition.is_zero() {
                    PanelState::Closed
                } else {
                    PanelState::Closing { since: now }
                };
            }
            PanelState::Closing { .. } | PanelState::Closed => {}
        }
    }

    /// Finish any transition whose time is up. Returns true on a phase change.
    pub fn tick(&mut self, now: Instant) -> bool {
        let next = match self.state {
            PanelState::Opening { since } if now.saturating_duration_since(since) >= self.transition => {
                PanelState::Open
            }
            PanelState::Closing { since } if now.saturating_duration_since(since) >= self.transition => {
                PanelState::Closed
            }
            _ => return false,
        };
        self.state = next;
        true
    }

    /// How far the panel is shown, 0.0 (hidden) to 1.0 (fully open)
    pub fn progress(&self, now: Instant) -> f32 {
        let ratio = |since: Instant| {
            if self.transition.is_zero() {
                return 1.0;
            }
            (now.saturating_duration_since(since).as_secs_f32() / self.transition.as_secs_f32()).min(1.0)
        };
        match self.state {
            PanelState::Closed => 0.0,
            PanelState::Opening { since } => ratio(since),
            PanelState::Open => 1.0,
            PanelState::Closing { since } => 1.0 - ratio(since),
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_full_cycle() {
        let t0 = Instant::now();
        let mut panel = Panel::new(millis(300));
        assert_eq!(panel.phase(), PanelPhase::Closed);
        assert!(!panel.is_visible());

        panel.open(t0);
        assert_eq!(panel.phase(), PanelPhase::Opening);
        assert!(panel.is_visible());

        assert!(!panel.tick(t0 + millis(299)));
        assert!(panel.tick(t0 + millis(300)));
        assert_eq!(panel.phase(), PanelPhase::Open);

        panel.close(t0 + millis(1000));
        assert_eq!(panel.phase(), PanelPhase::Closing);
        assert!(!panel.is_engaged());
        assert!(panel.tick(t0 + millis(1300)));
        assert_eq!(panel.phase(), PanelPhase::Closed);
    }

    #[test]
    fn test_redundant_transitions_are_noops() {
        let t0 = Instant::now();
        let mut panel = Panel::new(millis(300));
        panel.close(t0);
        assert_eq!(panel.phase(), PanelPhase::Closed);

        panel.open(t0);
        panel.open(t0 + millis(200));
        assert_eq!(panel.state(), PanelState::Opening { since: t0 });
    }

    #[test]
    fn test_reverse_mid_transition() {
        let t0 = Instant::now();
        let mut panel = Panel::new(millis(300));
        panel.open(t0);
        panel.close(t0 + millis(100));
        assert_eq!(panel.phase(), PanelPhase::Closing);
        panel.open(t0 + millis(150));
        assert_eq!(panel.phase(), PanelPhase::Opening);
    }

    #[test]
    fn test_progress() {
        let t0 = Instant::now();
        let mut panel = Panel::new(millis(200));
        assert_eq!(panel.progress(t0), 0.0);
        panel.open(t0);
        assert!((panel.progress(t0 + millis(100)) - 0.5).abs() < 0.01);
        assert_eq!(panel.progress(t0 + millis(500)), 1.0);
    }

    #[test]
    fn test_zero_transition_is_immediate() {
        let t0 = Instant::now();
        let mut panel = Panel::new(Duration::ZERO);
        panel.open(t0);
        assert_eq!(panel.phase(), PanelPhase::Open);
        panel.close(t0);
        assert_eq!(panel.phase(), PanelPhase::Closed);
    }
}
