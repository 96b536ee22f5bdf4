//! Timer trigger state

/// Upper bound on `TimerUpdate` checkpoints within one interval
pub const MAX_UPDATES_PER_INTERVAL: u32 = 10_000;

/// Something the timer wants announced after an `advance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerTick {
    /// Intermediate checkpoint reached, carries the checkpoint time
    Update(f32),
    /// Interval elapsed
    End,
}

/// Runtime state of a timer trigger
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    interval: f32,
    looping: bool,
    update_on_each: f32,
    progress: f32,
    /// Checkpoints reached in the current run
    updates: u32,
    /// Checkpoints that fit in one interval
    max_updates: u32,
    ended: bool,
}

impl TimerState {
    /// `interval` must already be validated as finite and > 0.
    ///
    /// A cadence finer than `interval / MAX_UPDATES_PER_INTERVAL` is raised to it.
    pub(crate) fn new(interval: f32, looping: bool, mut update_on_each: f32) -> Self {
        let finest = interval / MAX_UPDATES_PER_INTERVAL as f32;
        if update_on_each > 0.0 && update_on_each < finest {
            log::warn!(
                "Timer update cadence {} too fine for interval {}, using {}",
                update_on_each,
                interval,
                finest
            );
            update_on_each = finest;
        }

        let max_updates = if update_on_each > 0.0 {
            ((interval / update_on_each).floor() as u32).min(MAX_UPDATES_PER_INTERVAL)
        } else {
            0
        };

        Self {
            interval,
            looping,
            update_on_each,
            progress: 0.0,
            updates: 0,
            max_updates,
            ended: false,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Cadence of `TimerUpdate` events, 0 when disabled
    pub fn update_on_each(&self) -> f32 {
        self.update_on_each
    }

    /// Time accumulated in the current run
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Set once a non-looping timer reached its interval
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Start over, as if freshly constructed
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.updates = 0;
        self.ended = false;
    }

    /// Advance by `time_step` and report what happened, in order.
    ///
    /// Every whole `update_on_each` step crossed yields one `Update`, so a
    /// large step yields several. Checkpoints never pass the interval, and
    /// at most `MAX_UPDATES_PER_INTERVAL` are reported per run. When
    /// the interval is reached an `End` follows; a looping timer then restarts
    /// from zero and the surplus of the step is dropped.
    pub fn advance(&mut self, time_step: f32) -> Vec<TimerTick> {
        let mut ticks = Vec::new();

        if self.ended {
            return ticks;
        }

        if !time_step.is_finite() || time_step < 0.0 {
            log::warn!("Ignoring invalid timer step {}", time_step);
            return ticks;
        }

        self.progress += time_step;

        if self.update_on_each > 0.0 {
            let due = ((self.progress / self.update_on_each).floor() as u32).min(self.max_updates);
            ticks.extend(
                (self.updates + 1..=due)
                    .map(|n| TimerTick::Update((n as f32 * self.update_on_each).min(self.interval))),
            );
            self.updates = self.updates.max(due);
        }

        if self.progress >= self.interval {
            self.ended = !self.looping;
            self.progress = 0.0;
            self.updates = 0;
            ticks.push(TimerTick::End);
        }

        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_timer() {
        let mut timer = TimerState::new(1.0, false, 0.0);

        assert!(timer.advance(0.6).is_empty());
        assert_eq!(timer.advance(0.6), vec![TimerTick::End]);
        assert!(timer.has_ended());
        assert!(timer.advance(0.6).is_empty());
        assert!(timer.advance(5.0).is_empty());
    }

    #[test]
    fn test_looping_timer() {
        let mut timer = TimerState::new(1.0, true, 0.0);

        assert_eq!(timer.advance(1.0), vec![TimerTick::End]);
        assert!(!timer.has_ended());
        assert_eq!(timer.progress(), 0.0);
        assert!(timer.advance(0.5).is_empty());
        assert_eq!(timer.advance(0.5), vec![TimerTick::End]);
    }

    #[test]
    fn test_updates_keep_cadence_on_large_steps() {
        let mut timer = TimerState::new(2.0, false, 0.25);

        assert_eq!(
            timer.advance(0.875),
            vec![
                TimerTick::Update(0.25),
                TimerTick::Update(0.5),
                TimerTick::Update(0.75),
            ]
        );
        assert!(timer.advance(0.0625).is_empty());
        assert_eq!(timer.advance(0.0625), vec![TimerTick::Update(1.0)]);
    }

    #[test]
    fn test_updates_stop_at_interval() {
        let mut timer = TimerState::new(1.0, false, 0.5);

        assert_eq!(
            timer.advance(3.0),
            vec![TimerTick::Update(0.5), TimerTick::Update(1.0), TimerTick::End]
        );
    }

    #[test]
    fn test_tiny_cadence_is_bounded() {
        let mut timer = TimerState::new(1.0, false, 1e-8);
        assert!(timer.update_on_each() >= 1.0 / MAX_UPDATES_PER_INTERVAL as f32);

        let ticks = timer.advance(1.0);
        assert_eq!(ticks.last(), Some(&TimerTick::End));
        assert!(ticks.len() <= MAX_UPDATES_PER_INTERVAL as usize + 1);

        let times: Vec<f32> = ticks
            .iter()
            .filter_map(|t| match t {
                TimerTick::Update(time) => Some(*time),
                TimerTick::End => None,
            })
            .collect();
        assert!(times.len() >= MAX_UPDATES_PER_INTERVAL as usize - 1);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert!(times.iter().all(|&t| t <= 1.0));
    }

    #[test]
    fn test_invalid_step_is_ignored() {
        let mut timer = TimerState::new(1.0, false, 0.0);
        assert!(timer.advance(-1.0).is_empty());
        assert!(timer.advance(f32::NAN).is_empty());
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut timer = TimerState::new(1.0, false, 0.0);
        timer.advance(2.0);
        assert!(timer.has_ended());

        timer.reset();
        assert!(!timer.has_ended());
        assert_eq!(timer.advance(1.0), vec![TimerTick::End]);
    }
}
