//! Fixed-cycle signal controller.
//!
//! ```text
//! phase k: GREEN ─► YELLOW ─► RED (clearance) ─► phase k+1: GREEN ─► …
//! ```
//!
//! A lane sees its phase's state while that phase is active and RED
//! otherwise, so the clearance interval is all-red.

use cs_core::{GraphConfig, LaneId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignalState {
    Green,
    Yellow,
    Red,
}

impl SignalState {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalState::Green  => "green",
            SignalState::Yellow => "yellow",
            SignalState::Red    => "red",
        }
    }
}

/// One set of lanes allowed to move together.
pub type Phase = Vec<LaneId>;

#[derive(Clone, Debug, PartialEq)]
pub struct SignalController {
    pub phases: Vec<Phase>,
    /// Index of the active phase.
    pub current: usize,
    /// Seconds spent in `state`.
    pub timer: f32,
    pub state: SignalState,
    green_secs: f32,
    yellow_secs: f32,
    red_secs: f32,
}

impl SignalController {
    /// A controller starting at GREEN of `current`, `timer` seconds in.
    pub fn new(phases: Vec<Phase>, current: usize, timer: f32, config: &GraphConfig) -> Self {
        let current = if phases.is_empty() { 0 } else { current % phases.len() };
        Self {
            phases,
            current,
            timer: timer.max(0.0),
            state: SignalState::Green,
            green_secs: config.green_secs,
            yellow_secs: config.yellow_secs,
            red_secs: config.red_secs,
        }
    }

    /// A controller with no phases; every lane sees GREEN.
    pub fn unsignalled(config: &GraphConfig) -> Self {
        Self::new(Vec::new(), 0, 0.0, config)
    }

    pub fn is_signalled(&self) -> bool {
        !self.phases.is_empty()
    }

    fn duration(&self, state: SignalState) -> f32 {
        match state {
            SignalState::Green  => self.green_secs,
            SignalState::Yellow => self.yellow_secs,
            SignalState::Red    => self.red_secs,
        }
    }

    /// Advance the cycle by `dt` seconds, crossing as many intervals as
    /// `dt` covers.
    pub fn advance(&mut self, dt: f32) {
        if self.phases.is_empty() {
            return;
        }
        self.timer += dt;
        loop {
            let limit = self.duration(self.state);
            if self.timer < limit {
                break;
            }
            self.timer -= limit;
            self.state = match self.state {
                SignalState::Green  => SignalState::Yellow,
                SignalState::Yellow => SignalState::Red,
                SignalState::Red    => {
                    self.current = (self.current + 1) % self.phases.len();
                    SignalState::Green
                }
            };
        }
    }

    /// State seen by an agent approaching on `lane`.
    pub fn signal_for(&self, lane: LaneId) -> SignalState {
        let Some(active) = self.phases.get(self.current) else {
            return SignalState::Green;
        };
        if self.state != SignalState::Red && active.contains(&lane) {
            self.state
        } else {
            SignalState::Red
        }
    }

    /// Lanes of the active phase.
    pub fn active_phase(&self) -> &[LaneId] {
        self.phases.get(self.current).map(Vec::as_slice).unwrap_or(&[])
    }
}
