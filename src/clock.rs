//! Single scheduler for every timed sequence in a round (digit reveal, scan
//! detections, confirm unlock). Time only moves when the host calls
//! `pop_due` with a frame timestamp, so tests drive it with plain numbers.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Scheduled<E> {
    due_ms: u64,
    id: TimerId,
    event: E,
}

/// Pending delayed events ordered by due time, then registration order.
#[derive(Debug)]
pub struct Timeline<E> {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Scheduled<E>>, // sorted by (due_ms, id)
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self { now_ms: 0, next_id: 0, pending: Vec::new() }
    }

    /// Current logical time. While an event is being dispatched this is the
    /// event's due time, so follow-up timers are offset from it.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn after(&mut self, delay_ms: u64, event: E) -> TimerId {
        let due_ms = self.now_ms.saturating_add(delay_ms);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // ids grow monotonically, so inserting after every equal due time keeps FIFO order
        let at = self.pending.partition_point(|s| s.due_ms <= due_ms);
        self.pending.insert(at, Scheduled { due_ms, id, event });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Pop the earliest event due at or before `now_ms`. Returns `None` once
    /// nothing else is due, leaving the clock at `now_ms`. Never moves backwards.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, E)> {
        if self.pending.first().is_some_and(|s| s.due_ms <= now_ms) {
            let s = self.pending.remove(0);
            self.now_ms = self.now_ms.max(s.due_ms);
            return Some((s.due_ms, s.event));
        }
        self.now_ms = self.now_ms.max(now_ms);
        None
    }

    /// Drop every pending event; returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(t: &mut Timeline<&'static str>, now: u64) -> Vec<(u64, &'static str)> {
        std::iter::from_fn(|| t.pop_due(now)).collect()
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut t = Timeline::new();
        t.after(300, "c");
        t.after(100, "a");
        t.after(200, "b");
        assert!(drain(&mut t, 50).is_empty());
        assert_eq!(drain(&mut t, 250), vec![(100, "a"), (200, "b")]);
        assert_eq!(drain(&mut t, 1000), vec![(300, "c")]);
        assert!(t.is_empty());
    }

    #[test]
    fn test_equal_due_times_keep_registration_order() {
        let mut t = Timeline::new();
        t.after(1000, "first");
        t.after(1000, "second");
        t.after(400, "early");
        t.after(1000, "third");
        assert_eq!(
            drain(&mut t, 1000),
            vec![(400, "early"), (1000, "first"), (1000, "second"), (1000, "third")]
        );
    }

    #[test]
    fn test_delays_are_relative_to_dispatch_time() {
        let mut t = Timeline::new();
        t.after(500, "a");
        assert_eq!(t.pop_due(2000), Some((500, "a")));
        // Scheduling while dispatching "a" is relative to its due time
        assert_eq!(t.now_ms(), 500);
        t.after(100, "b");
        assert_eq!(t.pop_due(2000), Some((600, "b")));
        assert_eq!(t.pop_due(2000), None);
        assert_eq!(t.now_ms(), 2000);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut t: Timeline<&str> = Timeline::new();
        assert_eq!(t.pop_due(1000), None);
        assert_eq!(t.pop_due(10), None);
        assert_eq!(t.now_ms(), 1000);
    }

    #[test]
    fn test_cancel_and_clear() {
        let mut t = Timeline::new();
        let a = t.after(10, "a");
        t.after(20, "b");
        assert!(t.cancel(a));
        assert!(!t.cancel(a));
        assert_eq!(t.len(), 1);
        assert_eq!(t.clear(), 1);
        assert!(drain(&mut t, 100).is_empty());
    }
}
