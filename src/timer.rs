use chrono::{Local, NaiveTime};

/// Elapsed-seconds counter for a talk.
///
/// Each tick adds exactly one second while running; ticks are not measured
/// against the wall clock, so a late tick is never compensated. Stopping
/// pauses the count, only [`reset`](Self::reset) brings it back to zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    elapsed: u64,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Advances by one second if running. Returns whether the count changed.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        true
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed = 0;
    }

    pub fn display(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

/// `MM:SS`, minutes zero-padded but not capped.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Wall-clock display, resampled by the caller once per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clock {
    now: NaiveTime,
}

impl Clock {
    pub fn new() -> Self {
        Self::at(Local::now().time())
    }

    pub fn at(now: NaiveTime) -> Self {
        Self { now }
    }

    pub fn sample(&mut self) {
        self.now = Local::now().time();
    }

    pub fn display(&self) -> String {
        self.now.format("%H:%M").to_string()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_times(timer: &mut Timer, count: usize) {
        for _ in 0..count {
            timer.tick();
        }
    }

    #[test]
    fn pause_keeps_elapsed_time() {
        let mut timer = Timer::new();
        timer.start();
        tick_times(&mut timer, 5);
        timer.stop();
        tick_times(&mut timer, 4);
        assert_eq!(timer.elapsed(), 5);

        timer.start();
        tick_times(&mut timer, 3);
        assert_eq!(timer.elapsed(), 8);

        timer.reset();
        assert_eq!(timer.elapsed(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn reset_while_stopped_still_zeroes() {
        let mut timer = Timer::new();
        timer.start();
        tick_times(&mut timer, 2);
        timer.stop();
        timer.reset();
        assert_eq!(timer, Timer::new());
    }

    #[test]
    fn tick_reports_changes_only_while_running() {
        let mut timer = Timer::new();
        assert!(!timer.tick());
        timer.set_running(true);
        assert!(timer.tick());
        assert_eq!(timer.elapsed(), 1);
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(59 * 60 + 59), "59:59");
        assert_eq!(format_elapsed(125 * 60 + 1), "125:01");
    }

    #[test]
    fn clock_shows_hours_and_minutes() {
        let clock = Clock::at(NaiveTime::from_hms_opt(9, 5, 42).unwrap());
        assert_eq!(clock.display(), "09:05");
    }
}
