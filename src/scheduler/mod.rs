use std::{cmp::Reverse, collections::BinaryHeap};

/// Milliseconds on the scheduler's own monotonic clock.
pub type Millis = u64;

#[derive(Debug)]
struct Entry<T> {
    due: Millis,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.due, self.seq) == (other.due, other.seq)
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Delayed tasks keyed by due time. Nothing runs until the clock is advanced,
/// and tasks due at the same instant come out in scheduling order.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Millis,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn schedule_in(&mut self, delay: Millis, task: T) {
        let entry = Entry {
            due: self.now.saturating_add(delay),
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Moves the clock forward by `dt` and returns every task now due.
    pub fn advance(&mut self, dt: Millis) -> Vec<T> {
        self.now = self.now.saturating_add(dt);
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due > self.now {
                break;
            }
            if let Some(Reverse(entry)) = self.queue.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    /// Due times of everything still queued, earliest first.
    #[cfg(test)]
    pub fn due_times(&self) -> Vec<Millis> {
        let mut times: Vec<Millis> = self.queue.iter().map(|Reverse(e)| e.due).collect();
        times.sort_unstable();
        times
    }

    /// Drops every queued task and returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod advance {
        use super::*;

        #[test]
        fn nothing_fires_before_due_time() {
            let mut scheduler = Scheduler::new();
            scheduler.schedule_in(10, "a");
            assert!(scheduler.advance(9).is_empty());
            assert_eq!(scheduler.advance(1), vec!["a"]);
        }

        #[test]
        fn zero_delay_waits_for_next_advance() {
            let mut scheduler = Scheduler::new();
            scheduler.schedule_in(0, 1);
            assert_eq!(scheduler.pending(), 1);
            assert_eq!(scheduler.advance(0), vec![1]);
        }

        #[test]
        fn returns_tasks_in_due_then_schedule_order() {
            let mut scheduler = Scheduler::new();
            scheduler.schedule_in(20, 'c');
            scheduler.schedule_in(5, 'a');
            scheduler.schedule_in(5, 'b');
            assert_eq!(scheduler.advance(100), vec!['a', 'b', 'c']);
        }

        #[test]
        fn delays_are_relative_to_current_clock() {
            let mut scheduler = Scheduler::new();
            scheduler.advance(50);
            scheduler.schedule_in(10, ());
            assert_eq!(scheduler.due_times(), vec![60]);
            assert_eq!(scheduler.now(), 50);
        }
    }

    mod cancel_all {
        use super::*;

        #[test]
        fn clears_queue_and_reports_count() {
            let mut scheduler = Scheduler::new();
            for i in 0..4 {
                scheduler.schedule_in(i * 10, i);
            }
            assert_eq!(scheduler.cancel_all(), 4);
            assert_eq!(scheduler.pending(), 0);
            assert!(scheduler.advance(1000).is_empty());
        }
    }
}
