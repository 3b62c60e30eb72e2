//! Randomized spawn timing

use rand::Rng;

/// Uniform draw from `[lo, hi)`; collapses to `lo` when the range is empty
pub fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Accumulates time and signals when a new entity should appear.
///
/// Intervals are drawn uniformly from `[min, max]`; once `cap` live entities
/// exist, spawning is skipped until the population drops.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    since_last: f32,
    next_interval: f32,
    min: f32,
    max: f32,
    cap: usize,
}

impl SpawnScheduler {
    pub fn new(min: f32, max: f32, cap: usize, first_interval: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            since_last: 0.0,
            next_interval: first_interval.max(0.0),
            min: min.max(0.0),
            max: max.max(0.0),
            cap,
        }
    }

    pub fn reset(&mut self, first_interval: f32) {
        self.since_last = 0.0;
        self.next_interval = first_interval.max(0.0);
    }

    pub fn since_last(&self) -> f32 {
        self.since_last
    }

    pub fn next_interval(&self) -> f32 {
        self.next_interval
    }

    /// Advance by `dt` seconds. Returns true when one spawn is due now.
    pub fn advance<R: Rng>(&mut self, dt: f32, live: usize, rng: &mut R) -> bool {
        self.since_last += dt;
        if self.since_last <= self.next_interval {
            return false;
        }
        if live >= self.cap {
            return false;
        }
        self.since_last = 0.0;
        self.next_interval = if self.max > self.min {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawns_after_first_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = SpawnScheduler::new(1.5, 3.0, 10, 1.0);
        assert!(!s.advance(0.5, 0, &mut rng));
        assert!(!s.advance(0.5, 0, &mut rng));
        assert!(s.advance(0.1, 0, &mut rng));
        assert_eq!(s.since_last(), 0.0);
        assert!((1.5..=3.0).contains(&s.next_interval()));
    }

    #[test]
    fn test_cap_defers_spawn_until_population_drops() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut s = SpawnScheduler::new(1.0, 1.0, 2, 0.5);
        assert!(!s.advance(1.0, 2, &mut rng));
        assert!(!s.advance(1.0, 2, &mut rng));
        assert!(s.advance(0.0, 1, &mut rng));
    }

    #[test]
    fn test_intervals_stay_in_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut s = SpawnScheduler::new(0.8, 4.0, 100, 0.0);
        for _ in 0..1000 {
            if s.advance(0.05, 0, &mut rng) {
                let next = s.next_interval();
                assert!((0.8..=4.0).contains(&next));
            }
        }
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let run = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut s = SpawnScheduler::new(0.5, 2.0, 10, 0.1);
            (0..500)
                .map(|_| s.advance(1.0 / 60.0, 0, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
