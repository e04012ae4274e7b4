use serde::Serialize;

use crate::model::Half;

/// Length of a regulation half in seconds.
pub const HALF_LENGTH_SECS: u32 = 45 * 60;

/// Elapsed match time, the run flag and the current half.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchClock {
    elapsed: u32,
    running: bool,
    half: Half,
    /// Set once the automatic 1H -> 2H switch has happened. Cleared by reset.
    #[serde(skip)]
    half_time_passed: bool,
}

impl MatchClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn half(&self) -> Half {
        self.half
    }

    pub fn minute(&self) -> u32 {
        self.elapsed / 60
    }

    pub fn second(&self) -> u32 {
        self.elapsed % 60
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Zero the clock and go back to the first half. The run flag is kept.
    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.half = Half::First;
        self.half_time_passed = false;
    }

    /// Manual override; elapsed time is untouched.
    pub fn set_half(&mut self, half: Half) {
        self.half = half;
    }

    /// Advance by one second if running.
    ///
    /// The half flips on the tick that takes elapsed time to
    /// [`HALF_LENGTH_SECS`], and only the first time that happens.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        let next = self.elapsed.saturating_add(1);
        if self.half == Half::First && !self.half_time_passed && next >= HALF_LENGTH_SECS {
            self.half = Half::Second;
            self.half_time_passed = true;
        }
        self.elapsed = next;
    }

    /// `M:SS` rendering of the elapsed time.
    pub fn display(&self) -> String {
        format_clock(self.elapsed)
    }
}

/// Render seconds as `M:SS`, minutes unpadded.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_clock() -> MatchClock {
        let mut clock = MatchClock::new();
        clock.start();
        clock
    }

    fn tick_n(clock: &mut MatchClock, n: u32) {
        for _ in 0..n {
            clock.tick();
        }
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(125), "2:05");
        assert_eq!(format_clock(2700), "45:00");
        assert_eq!(format_clock(6001), "100:01");
    }

    #[test]
    fn test_tick_only_while_running() {
        let mut clock = MatchClock::new();
        clock.tick();
        assert_eq!(clock.elapsed(), 0);

        clock.start();
        clock.start();
        tick_n(&mut clock, 3);
        assert_eq!(clock.elapsed(), 3);

        clock.pause();
        clock.tick();
        assert_eq!(clock.elapsed(), 3);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_half_flips_at_2700() {
        let mut clock = running_clock();
        tick_n(&mut clock, HALF_LENGTH_SECS - 1);
        assert_eq!(clock.elapsed(), 2699);
        assert_eq!(clock.half(), Half::First);

        clock.tick();
        assert_eq!(clock.elapsed(), 2700);
        assert_eq!(clock.half(), Half::Second);
        assert_eq!(clock.display(), "45:00");
    }

    #[test]
    fn test_automatic_switch_happens_once() {
        let mut clock = running_clock();
        tick_n(&mut clock, HALF_LENGTH_SECS);
        clock.set_half(Half::First);
        tick_n(&mut clock, 10);
        assert_eq!(clock.half(), Half::First);
        assert_eq!(clock.elapsed(), 2710);
    }

    #[test]
    fn test_reset_keeps_run_flag() {
        let mut clock = running_clock();
        tick_n(&mut clock, HALF_LENGTH_SECS + 5);
        clock.reset();
        assert_eq!(clock.elapsed(), 0);
        assert_eq!(clock.half(), Half::First);
        assert!(clock.is_running());

        tick_n(&mut clock, HALF_LENGTH_SECS);
        assert_eq!(clock.half(), Half::Second);
    }

    #[test]
    fn test_set_half_leaves_elapsed() {
        let mut clock = running_clock();
        tick_n(&mut clock, 125);
        clock.set_half(Half::ExtraTime);
        assert_eq!(clock.half(), Half::ExtraTime);
        assert_eq!(clock.minute(), 2);
        assert_eq!(clock.second(), 5);
    }
}
