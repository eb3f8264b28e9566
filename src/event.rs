//! Interrupt → main loop notifications.
//!
//! Interrupts change `Mode` and force the output safe themselves; events
//! only tell the main loop what happened so it can report it. Losing an
//! event therefore never affects control flow, and an overflow is counted
//! instead of blocking the producer.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;
use heapless::Deque;

/// Default queue depth.
pub const EVENT_QUEUE_SIZE: usize = 8;

/// Something an interrupt handler did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Sweep reached its upper bound after `ticks` samples
    SweepCompleted { ticks: u64 },
    /// Sweep stopped by the button after `ticks` samples
    SweepCancelled { ticks: u64 },
    /// Game tone stopped by the button
    ToneStopped,
    /// Button pressed on the result screen
    Replay,
}

/// Bounded multi-producer event queue.
pub struct EventQueue<const N: usize = EVENT_QUEUE_SIZE> {
    queue: Mutex<RefCell<Deque<Event, N>>>,
    overflow: AtomicU32,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
            overflow: AtomicU32::new(0),
        }
    }

    /// Queue an event. Returns `false` and counts it if the queue is full.
    #[inline]
    pub fn post(&self, event: Event) -> bool {
        let queued =
            critical_section::with(|cs| self.queue.borrow_ref_mut(cs).push_back(event).is_ok());
        if !queued {
            self.overflow.fetch_add(1, Ordering::Relaxed);
        }
        queued
    }

    /// Oldest pending event.
    #[inline]
    pub fn next(&self) -> Option<Event> {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).pop_front())
    }

    /// Events dropped because the queue was full.
    pub fn overflow(&self) -> u32 {
        self.overflow.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let q = EventQueue::<4>::new();
        q.post(Event::ToneStopped);
        q.post(Event::Replay);
        assert_eq!(q.next(), Some(Event::ToneStopped));
        assert_eq!(q.next(), Some(Event::Replay));
        assert_eq!(q.next(), None);
    }

    #[test]
    fn test_overflow_counted() {
        let q = EventQueue::<2>::new();
        assert!(q.post(Event::Replay));
        assert!(q.post(Event::Replay));
        assert!(!q.post(Event::Replay));
        assert_eq!(q.overflow(), 1);
    }
}
