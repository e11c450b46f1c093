//! Elapsed-time clock
//!
//! Started once by the first interaction, advanced by whole-second ticks,
//! stopped for good when the game is won.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Not started yet this game
    #[default]
    Idle,
    Running,
    /// Stopped on win; cannot be restarted
    Stopped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameTimer {
    state: TimerState,
    elapsed_seconds: u32,
}

impl GameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle timer holding previously elapsed time (restored game)
    pub fn resumed(elapsed_seconds: u32) -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_seconds,
        }
    }

    /// Start if idle. Returns true if this call started the clock.
    pub fn start(&mut self) -> bool {
        if self.state == TimerState::Idle {
            self.state = TimerState::Running;
            true
        } else {
            false
        }
    }

    /// Count one elapsed second. Returns the new total while running.
    pub fn tick(&mut self) -> Option<u32> {
        if self.state != TimerState::Running {
            return None;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        Some(self.elapsed_seconds)
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }
}
