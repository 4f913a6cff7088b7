use crate::scheduler::{Millis, Scheduler};

/// A deferred request to insert one freshly randomized particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnTask;

/// Tops the population up to its target with a staggered ramp-in.
#[derive(Clone, Copy, Debug)]
pub struct Spawner {
    pub target: usize,
    pub frequency_ms: Millis,
}

impl Spawner {
    pub fn new(target: usize, frequency_ms: Millis) -> Self {
        Self {
            target,
            frequency_ms,
        }
    }

    /// Schedules enough spawns to reach `target` once the `live` particles and
    /// the `pending` spawns are accounted for. The i-th new spawn is due
    /// `i * frequency_ms` from now. Returns the number scheduled.
    pub fn top_up(
        &self,
        live: usize,
        pending: usize,
        scheduler: &mut Scheduler<SpawnTask>,
    ) -> usize {
        let missing = self.target.saturating_sub(live + pending);
        for i in 0..missing {
            let delay = (i as Millis).saturating_mul(self.frequency_ms);
            scheduler.schedule_in(delay, SpawnTask);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod top_up {
        use super::*;

        #[test]
        fn staggers_ten_spawns_by_frequency() {
            let spawner = Spawner::new(10, 10);
            let mut scheduler = Scheduler::new();
            assert_eq!(spawner.top_up(0, 0, &mut scheduler), 10);
            assert_eq!(
                scheduler.due_times(),
                vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90]
            );
        }

        #[test]
        fn each_advance_releases_exactly_one_spawn() {
            let spawner = Spawner::new(10, 10);
            let mut scheduler = Scheduler::new();
            spawner.top_up(0, 0, &mut scheduler);
            assert_eq!(scheduler.advance(0).len(), 1);
            for _ in 1..10 {
                assert!(scheduler.advance(9).is_empty());
                assert_eq!(scheduler.advance(1).len(), 1);
            }
            assert_eq!(scheduler.pending(), 0);
        }

        #[test]
        fn counts_live_and_pending() {
            let spawner = Spawner::new(10, 10);
            let mut scheduler = Scheduler::new();
            assert_eq!(spawner.top_up(4, 3, &mut scheduler), 3);
        }

        #[test]
        fn huge_frequency_saturates_due_times() {
            let spawner = Spawner::new(3, u64::MAX);
            let mut scheduler = Scheduler::new();
            assert_eq!(spawner.top_up(0, 0, &mut scheduler), 3);
            assert_eq!(scheduler.due_times(), vec![0, u64::MAX, u64::MAX]);
        }

        #[test]
        fn never_schedules_above_target() {
            let spawner = Spawner::new(5, 10);
            let mut scheduler = Scheduler::new();
            assert_eq!(spawner.top_up(8, 0, &mut scheduler), 0);
            assert_eq!(scheduler.pending(), 0);
        }
    }
}
