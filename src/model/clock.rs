use crate::model::types::{GameClockState, PeriodStructure};
use tracing::warn;

/// Parse a game clock like "08:00", "7:45" or "0:04.3" into seconds remaining.
pub fn parse_clock(clock: &str) -> Option<f64> {
    let re = regex::Regex::new(r"^(\d{1,3}):(\d{1,2}(?:\.\d+)?)$").ok()?;
    let cap = re.captures(clock.trim())?;

    let minutes = cap[1].parse::<u32>().ok()?;
    let seconds = cap[2].parse::<f64>().ok()?;
    if seconds >= 60.0 {
        return None;
    }

    Some(minutes as f64 * 60.0 + seconds)
}

impl GameClockState {
    /// Build a clock from a feed string.
    ///
    /// A clock that cannot be parsed is read as 0:00 remaining, i.e. the
    /// period has just ended. Noisy feeds would otherwise make every
    /// projection fail, but this does change the output silently, so it is
    /// logged.
    pub fn from_clock_str(period: u32, clock: &str, structure: PeriodStructure) -> Self {
        let seconds_remaining_in_period = match parse_clock(clock) {
            Some(seconds) => seconds,
            None => {
                warn!(
                    "Unparseable clock {:?} in period {}, assuming 0:00 remaining",
                    clock, period
                );
                0.0
            }
        };

        Self {
            period,
            seconds_remaining_in_period,
            structure,
        }
    }

    /// Build a clock from an already split minutes/seconds reading.
    pub fn from_parts(period: u32, minutes: u32, seconds: f64, structure: PeriodStructure) -> Self {
        Self {
            period,
            seconds_remaining_in_period: minutes as f64 * 60.0 + seconds.max(0.0),
            structure,
        }
    }

    // Period 0 never comes from a live game; read it as the opening period.
    fn effective_period(&self) -> u32 {
        self.period.max(1)
    }

    pub fn is_overtime(&self) -> bool {
        self.effective_period() > self.structure.regulation_periods
    }

    /// Second half or later: period >= 3 with quarters, >= 2 with halves.
    pub fn is_second_half(&self) -> bool {
        self.effective_period() > self.structure.regulation_periods / 2
    }

    pub fn current_period_length(&self) -> f64 {
        if self.is_overtime() {
            self.structure.overtime_length_minutes
        } else {
            self.structure.period_length_minutes
        }
    }

    /// Minutes of game time played so far.
    pub fn elapsed_minutes(&self) -> f64 {
        let period = self.effective_period();
        let length = self.current_period_length();
        let remaining = (self.seconds_remaining_in_period.max(0.0) / 60.0).min(length);
        let played_in_period = length - remaining;

        if self.is_overtime() {
            let overtimes_done = (period - self.structure.regulation_periods - 1) as f64;
            self.structure.regulation_minutes()
                + overtimes_done * self.structure.overtime_length_minutes
                + played_in_period
        } else {
            (period - 1) as f64 * self.structure.period_length_minutes + played_in_period
        }
    }

    /// Length of the game to extrapolate to.
    ///
    /// `full_game_minutes` in regulation; once in overtime, the length through
    /// the end of the current overtime period.
    pub fn game_length_minutes(&self, full_game_minutes: f64) -> f64 {
        let period = self.effective_period();
        let end_of_period = if self.is_overtime() {
            let overtimes = (period - self.structure.regulation_periods) as f64;
            self.structure.regulation_minutes() + overtimes * self.structure.overtime_length_minutes
        } else {
            period as f64 * self.structure.period_length_minutes
        };

        full_game_minutes.max(end_of_period)
    }
}
