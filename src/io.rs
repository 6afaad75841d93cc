//! External I/O queues: the time-stamped input priority queue and the FIFO
//! output queue.
//!
//! The input queue is the simulator's one multi-producer boundary: it is
//! stored behind a `Mutex` so a cloneable `ExternalInputQueue` handle can be
//! handed to another carrier for push-only access, while draining a pushed
//! event into the coupling graph and schedule queue always happens on the
//! executor's own carrier.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use crate::message::Message;
use crate::time::{Time, TimeKey};

struct TimestampedMessage {
    time: TimeKey,
    seq: u64,
    message: Message,
}

impl PartialEq for TimestampedMessage {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}
impl Eq for TimestampedMessage {}

impl PartialOrd for TimestampedMessage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimestampedMessage {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.time, self.seq).cmp(&(other.time, other.seq))
    }
}

/// Thread-safe, time-ordered input queue. `Clone` is cheap (an `Arc` bump)
/// and yields a handle suitable for handing to another carrier.
#[derive(Clone)]
pub struct ExternalInputQueue {
    heap: Arc<Mutex<BinaryHeap<Reverse<TimestampedMessage>>>>,
    seq: Arc<AtomicU64>,
}

impl ExternalInputQueue {
    pub fn new() -> Self {
        Self {
            heap: Arc::new(Mutex::new(BinaryHeap::new())),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Enqueues `message` to fire at absolute time `at`. Safe to call
    /// concurrently from any carrier.
    pub fn push(&self, message: Message, at: Time) {
        let seq = self.seq.fetch_add(1, AtomicOrdering::Relaxed);
        let mut heap = self.heap.lock().expect("external input queue poisoned");
        heap.push(Reverse(TimestampedMessage {
            time: TimeKey(at),
            seq,
            message,
        }));
    }

    /// Pops every entry with `time <= up_to`, in ascending (time, seq)
    /// order, i.e. arrival order for same-instant events.
    pub fn drain_due(&self, up_to: Time) -> Vec<Message> {
        let mut heap = self.heap.lock().expect("external input queue poisoned");
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = heap.peek() {
            if entry.time.0 > up_to {
                break;
            }
            let Reverse(entry) = heap.pop().unwrap();
            due.push(entry.message);
        }
        due
    }

    pub fn is_empty(&self) -> bool {
        self.heap.lock().expect("external input queue poisoned").is_empty()
    }

    pub fn reset(&self) {
        self.heap.lock().expect("external input queue poisoned").clear();
    }
}

impl Default for ExternalInputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// FIFO queue of outputs destined for the host, owned solely by the
/// executor carrier (no cross-thread contract is specified for it).
#[derive(Default)]
pub struct ExternalOutputQueue {
    entries: Vec<(Time, Message)>,
}

impl ExternalOutputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: Time, message: Message) {
        self.entries.push((time, message));
    }

    pub fn peek(&self) -> &[(Time, Message)] {
        &self.entries
    }

    /// Atomically returns and clears the queue.
    pub fn drain(&mut self) -> Vec<(Time, Message)> {
        std::mem::take(&mut self.entries)
    }
}
