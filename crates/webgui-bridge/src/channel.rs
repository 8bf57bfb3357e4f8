//! Unbounded FIFO queue carrying content-to-host messages.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Default)]
struct Shared {
    queue: Mutex<VecDeque<String>>,
    available: Condvar,
}

/// Multi-producer queue of raw message strings. Clones share the queue.
///
/// `put` never blocks. `get` waits up to a timeout and yields `None` when
/// nothing arrived, which is an ordinary outcome rather than an error.
#[derive(Clone, Default)]
pub struct MessageChannel {
    shared: Arc<Shared>,
}

impl MessageChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A VecDeque is never left half-updated by a panicking holder.
        self.shared.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append to the tail and wake one waiting consumer.
    pub fn put(&self, message: impl Into<String>) {
        self.queue().push_back(message.into());
        self.shared.available.notify_one();
    }

    /// Remove the head, waiting up to `timeout` for one to arrive. A timeout
    /// too large to express as an instant waits without a deadline.
    pub fn get(&self, timeout: Duration) -> Option<String> {
        let deadline = Instant::now().checked_add(timeout);
        let mut queue = self.queue();
        loop {
            if let Some(message) = queue.pop_front() {
                return Some(message);
            }
            queue = match deadline {
                None => self
                    .shared
                    .available
                    .wait(queue)
                    .unwrap_or_else(|e| e.into_inner()),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    match self.shared.available.wait_timeout(queue, deadline - now) {
                        Ok((guard, _)) => guard,
                        Err(poisoned) => poisoned.into_inner().0,
                    }
                }
            };
        }
    }

    /// Remove the head without waiting.
    pub fn try_get(&self) -> Option<String> {
        self.queue().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }
}

impl std::fmt::Debug for MessageChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageChannel")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn preserves_fifo_order() {
        let channel = MessageChannel::new();
        for i in 0..100 {
            channel.put(format!("m{i}"));
        }
        for i in 0..100 {
            assert_eq!(channel.get(Duration::ZERO), Some(format!("m{i}")));
        }
        assert!(channel.is_empty());
    }

    #[test]
    fn empty_get_times_out_with_none() {
        let channel = MessageChannel::new();
        let timeout = Duration::from_millis(50);
        let start = Instant::now();
        assert_eq!(channel.get(timeout), None);
        assert!(start.elapsed() >= timeout);
    }

    #[test]
    fn zero_timeout_does_not_block() {
        let channel = MessageChannel::new();
        assert_eq!(channel.get(Duration::ZERO), None);
        assert_eq!(channel.try_get(), None);
    }

    #[test]
    fn get_wakes_when_message_arrives() {
        let channel = MessageChannel::new();
        let producer = channel.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            producer.put("got-a-click");
        });

        assert_eq!(
            channel.get(Duration::from_secs(5)).as_deref(),
            Some("got-a-click")
        );
        handle.join().unwrap();
    }

    #[test]
    fn document_ready_scenario() {
        let channel = MessageChannel::new();
        channel.put(r#"{"event":"document-ready"}"#);

        let raw = channel.get(Duration::from_millis(100)).unwrap();
        assert_eq!(raw, r#"{"event":"document-ready"}"#);

        let decoded: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded, serde_json::json!({"event": "document-ready"}));
    }

    #[test]
    fn per_producer_order_survives_concurrency() {
        let channel = MessageChannel::new();
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let channel = channel.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        channel.put(format!("{p}:{i}"));
                    }
                })
            })
            .collect();
        for handle in producers {
            handle.join().unwrap();
        }

        let mut last = [-1i32; 4];
        while let Some(message) = channel.try_get() {
            let (p, i) = message.split_once(':').unwrap();
            let (p, i): (usize, i32) = (p.parse().unwrap(), i.parse().unwrap());
            assert!(i > last[p]);
            last[p] = i;
        }
        assert_eq!(last, [49; 4]);
    }

    #[test]
    fn oversized_timeout_waits_for_message() {
        let channel = MessageChannel::new();
        let producer = channel.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            producer.put("late");
        });

        assert_eq!(channel.get(Duration::MAX).as_deref(), Some("late"));
        handle.join().unwrap();
    }
}
