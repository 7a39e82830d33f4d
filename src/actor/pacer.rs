//! Frame pacing for the render loop.
//!
//! Deadlines are computed from a fixed epoch (`epoch + k * period`) rather
//! than from the time the previous frame finished, so lateness in one frame
//! does not push every later frame back.

use std::time::{Duration, Instant};

/// Generates frame deadlines at a fixed rate.
#[derive(Debug, Clone)]
pub struct FramePacer {
    /// Time of frame 0.
    epoch: Instant,
    /// Time between frames.
    period: Duration,
    /// Index of the last deadline handed out.
    frame: u32,
}

impl FramePacer {
    /// Start pacing now at the given period.
    pub fn new(period: Duration) -> Self {
        Self::starting_at(Instant::now(), period)
    }

    /// Start pacing from an explicit epoch.
    pub const fn starting_at(epoch: Instant, period: Duration) -> Self {
        Self {
            epoch,
            period,
            frame: 0,
        }
    }

    /// Time between frames.
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Index of the last deadline handed out.
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// The next frame boundary.
    ///
    /// If the caller has fallen more than a whole period behind, the missed
    /// boundaries are skipped instead of being fired back to back.
    pub fn next_deadline(&mut self) -> Instant {
        self.next_deadline_from(Instant::now())
    }

    fn next_deadline_from(&mut self, now: Instant) -> Instant {
        self.frame = self.frame.saturating_add(1);
        let deadline = self.epoch + self.period * self.frame;

        if deadline + self.period < now && !self.period.is_zero() {
            let elapsed = now - self.epoch;
            let behind = elapsed.as_nanos() / self.period.as_nanos();
            self.frame = u32::try_from(behind + 1).unwrap_or(u32::MAX);
            return self.epoch + self.period * self.frame;
        }
        deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadlines_align_to_epoch() {
        let epoch = Instant::now();
        let period = Duration::from_millis(20);
        let mut pacer = FramePacer::starting_at(epoch, period);

        assert_eq!(pacer.next_deadline_from(epoch), epoch + period);
        // Finishing a frame late does not shift the next boundary.
        let late = epoch + Duration::from_millis(27);
        assert_eq!(pacer.next_deadline_from(late), epoch + period * 2);
        assert_eq!(pacer.frame(), 2);
    }

    #[test]
    fn test_skips_missed_frames() {
        let epoch = Instant::now();
        let period = Duration::from_millis(10);
        let mut pacer = FramePacer::starting_at(epoch, period);

        let stalled = epoch + Duration::from_millis(95);
        let deadline = pacer.next_deadline_from(stalled);
        assert_eq!(deadline, epoch + Duration::from_millis(100));
        assert_eq!(pacer.frame(), 10);
    }

    #[test]
    fn test_frame_count_tracks_elapsed() {
        let epoch = Instant::now();
        let period = Duration::from_secs(1) / 50;
        let mut pacer = FramePacer::starting_at(epoch, period);
        let mut now = epoch;
        for _ in 0..100 {
            let deadline = pacer.next_deadline_from(now);
            // Every frame overruns its boundary by a little.
            now = deadline + Duration::from_millis(3);
        }
        assert_eq!(pacer.frame(), 100);
        assert_eq!(now - epoch, Duration::from_secs(2) + Duration::from_millis(3));
    }

    #[test]
    fn test_real_clock() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(Duration::from_millis(5));
        assert_eq!(pacer.period(), Duration::from_millis(5));
        assert!(pacer.next_deadline() > start);
    }
}
