//! Deadline queue owning every pending timer of a component.
//!
//! Timers are plain data keyed by [`TimerId`]; the owner polls the registry
//! with the current time and handles whatever came due. Disposing the
//! registry drops all pending work at once and refuses new timers.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    id: TimerId,
    due_ms: f64,
    task: T,
}

#[derive(Clone, Debug)]
pub struct TimerRegistry<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
    disposed: bool,
}

impl<T> Default for TimerRegistry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
            disposed: false,
        }
    }
}

impl<T> TimerRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` for `due_ms`. A disposed registry hands out an id but keeps nothing.
    pub fn schedule_at(&mut self, due_ms: f64, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        if !self.disposed {
            self.entries.push(Entry { id, due_ms, task });
        }
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Earliest timer due at or before `now_ms`; ties resolve in scheduling order.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerId, f64, T)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let e = self.entries.swap_remove(idx);
        Some((e.id, e.due_ms, e.task))
    }

    pub fn next_due(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn dispose(&mut self) {
        self.entries.clear();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_order() {
        let mut r = TimerRegistry::new();
        r.schedule_at(30.0, "c");
        r.schedule_at(10.0, "a");
        r.schedule_at(10.0, "b");
        assert_eq!(r.next_due(), Some(10.0));
        assert_eq!(r.pop_due(5.0).map(|t| t.2), None);
        assert_eq!(r.pop_due(100.0).map(|t| t.2), Some("a"));
        assert_eq!(r.pop_due(100.0).map(|t| t.2), Some("b"));
        assert_eq!(r.pop_due(100.0).map(|t| t.2), Some("c"));
        assert!(r.is_empty());
    }

    #[test]
    fn cancel_and_dispose() {
        let mut r = TimerRegistry::new();
        let id = r.schedule_at(1.0, ());
        assert!(r.cancel(id));
        assert!(!r.cancel(id));
        r.schedule_at(2.0, ());
        r.dispose();
        assert!(r.is_empty());
        r.schedule_at(3.0, ());
        assert!(r.is_empty());
        assert!(r.is_disposed());
    }
}
