//! A four-level priority queue: `put` is non-blocking, `get` waits up to a timeout.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Notify;

use crate::error::ResilienceError;

/// Priority level for an enqueued item. Higher variants are served first;
/// items of equal priority are served FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Served last.
    Low,
    /// Default priority.
    Normal,
    /// Served ahead of `Normal` and `Low`.
    High,
    /// Served ahead of everything else.
    Critical,
}

const LEVELS: [Priority; 4] = [Priority::Critical, Priority::High, Priority::Normal, Priority::Low];

struct Lanes<T> {
    critical: VecDeque<T>,
    high: VecDeque<T>,
    normal: VecDeque<T>,
    low: VecDeque<T>,
}

impl<T> Lanes<T> {
    fn new() -> Self {
        Self {
            critical: VecDeque::new(),
            high: VecDeque::new(),
            normal: VecDeque::new(),
            low: VecDeque::new(),
        }
    }

    fn lane(&mut self, priority: Priority) -> &mut VecDeque<T> {
        match priority {
            Priority::Critical => &mut self.critical,
            Priority::High => &mut self.high,
            Priority::Normal => &mut self.normal,
            Priority::Low => &mut self.low,
        }
    }

    fn pop_highest(&mut self) -> Option<T> {
        for level in LEVELS {
            if let Some(item) = self.lane(level).pop_front() {
                return Some(item);
            }
        }
        None
    }
}

/// Admission-control point for bounding in-flight work: non-blocking `put`,
/// throttling `get`.
pub struct PriorityQueue<T> {
    lanes: Mutex<Lanes<T>>,
    notify: Notify,
}

impl<T> PriorityQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lanes: Mutex::new(Lanes::new()),
            notify: Notify::new(),
        }
    }

    /// Enqueue `item` at `priority`. Never blocks.
    pub fn put(&self, item: T, priority: Priority) {
        let mut lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        lanes.lane(priority).push_back(item);
        drop(lanes);
        self.notify.notify_one();
    }

    /// Dequeue the highest-priority item, waiting up to `timeout` if the
    /// queue is empty.
    ///
    /// # Errors
    /// Returns [`ResilienceError::Empty`] if nothing arrives within `timeout`.
    pub async fn get(&self, timeout: Duration) -> Result<T, ResilienceError> {
        if let Some(item) = self.try_get() {
            return Ok(item);
        }

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(ResilienceError::Empty);
            }

            let notified = self.notify.notified();
            tokio::select! {
                () = notified => {
                    if let Some(item) = self.try_get() {
                        return Ok(item);
                    }
                },
                () = tokio::time::sleep(remaining) => {
                    return Err(ResilienceError::Empty);
                },
            }
        }
    }

    /// Dequeue the highest-priority item if one is already present.
    #[must_use]
    pub fn try_get(&self) -> Option<T> {
        let mut lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        lanes.pop_highest()
    }

    /// Total number of items across all priority lanes.
    #[must_use]
    pub fn len(&self) -> usize {
        let lanes = self.lanes.lock().unwrap_or_else(|e| e.into_inner());
        lanes.critical.len() + lanes.high.len() + lanes.normal.len() + lanes.low.len()
    }

    /// Whether the queue has no items in any lane.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_highest_priority_first() {
        let queue: PriorityQueue<&str> = PriorityQueue::new();
        queue.put("low", Priority::Low);
        queue.put("critical", Priority::Critical);
        queue.put("normal", Priority::Normal);

        assert_eq!(queue.get(Duration::from_millis(10)).await.unwrap(), "critical");
        assert_eq!(queue.get(Duration::from_millis(10)).await.unwrap(), "normal");
        assert_eq!(queue.get(Duration::from_millis(10)).await.unwrap(), "low");
    }

    #[tokio::test]
    async fn ties_broken_fifo() {
        let queue: PriorityQueue<i32> = PriorityQueue::new();
        queue.put(1, Priority::Normal);
        queue.put(2, Priority::Normal);
        assert_eq!(queue.get(Duration::from_millis(10)).await.unwrap(), 1);
        assert_eq!(queue.get(Duration::from_millis(10)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn timeout_returns_empty() {
        let queue: PriorityQueue<i32> = PriorityQueue::new();
        let result = queue.get(Duration::from_millis(5)).await;
        assert!(matches!(result, Err(ResilienceError::Empty)));
    }
}
