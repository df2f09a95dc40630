use std::time::Instant;

/// Accumulates wall-clock time over one or more start/stop laps.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Timer {
    pub total_time: u128,
    pub curr: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self { total_time: 0, curr: Instant::now() }
    }
}

impl Timer {
    /// A timer whose first lap starts now.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn start(&mut self) {
        self.curr = Instant::now();
    }

    /// Ends the current lap and returns its length in nanoseconds.
    #[inline(always)]
    pub fn stop(&mut self) -> u128 {
        let diff = self.curr.elapsed().as_nanos();
        self.total_time += diff;
        diff
    }

    pub fn total_ns(&self) -> u64 {
        u64::try_from(self.total_time).unwrap_or(u64::MAX)
    }

    /// Throughput in MB/s for `bytes` processed over the accumulated time.
    pub fn mb_per_sec(&self, bytes: usize) -> f64 {
        if self.total_time == 0 {
            return 0.0;
        }
        (bytes as f64 / 1_000_000.0) / (self.total_time as f64 / 1e9)
    }
}

#[test]
fn test_timer_accumulates_laps() {
    use std::{thread, time};

    let mut timer = Timer::new();

    thread::sleep(time::Duration::from_millis(20));
    let first = timer.stop();

    timer.start();
    thread::sleep(time::Duration::from_millis(20));
    let second = timer.stop();

    assert!(first >= 20_000_000);
    assert!(second >= 20_000_000);
    assert_eq!(timer.total_time, first + second);
    assert!(timer.mb_per_sec(1_000_000) > 0.0);
}
