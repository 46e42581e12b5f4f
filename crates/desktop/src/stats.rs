use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling event counter behind the "analyses/s" readout.
pub struct RateMeter {
    events: VecDeque<Instant>,
    window: Duration,
}

impl RateMeter {
    pub fn new(window: Duration) -> Self {
        Self {
            events: VecDeque::new(),
            window,
        }
    }

    pub fn record(&mut self, now: Instant) {
        self.events.push_back(now);
        self.prune(now);
    }

    /// Events inside the window, scaled to per-second.
    pub fn rate(&self, now: Instant) -> f32 {
        let cutoff = now.checked_sub(self.window);
        let count = self
            .events
            .iter()
            .filter(|&&at| cutoff.map_or(true, |cutoff| at > cutoff))
            .count();
        count as f32 / self.window.as_secs_f32()
    }

    fn prune(&mut self, now: Instant) {
        if let Some(cutoff) = now.checked_sub(self.window) {
            while self.events.front().is_some_and(|&at| at <= cutoff) {
                self.events.pop_front();
            }
        }
    }
}

impl Default for RateMeter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_counts_events_inside_the_window() {
        let t0 = Instant::now();
        let mut meter = RateMeter::new(Duration::from_secs(1));
        meter.record(t0);
        meter.record(t0 + Duration::from_millis(300));
        meter.record(t0 + Duration::from_millis(600));
        assert_eq!(meter.rate(t0 + Duration::from_millis(700)), 3.0);
    }

    #[test]
    fn test_old_events_fall_out_of_the_window() {
        let t0 = Instant::now();
        let mut meter = RateMeter::new(Duration::from_secs(1));
        meter.record(t0);
        meter.record(t0 + Duration::from_millis(900));
        assert_eq!(meter.rate(t0 + Duration::from_millis(1500)), 1.0);
        assert_eq!(meter.rate(t0 + Duration::from_secs(3)), 0.0);
    }

    #[test]
    fn test_empty_meter_reads_zero() {
        let meter = RateMeter::default();
        assert_eq!(meter.rate(Instant::now()), 0.0);
    }
}
