//! Blocking hand-off queue for VMs running on separate threads.
//!
//! Each VM still owns its memory exclusively; the queue is the only state two
//! VMs share.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::error::VmResult;
use crate::io::{InputChannel, OutputChannel};
use crate::vm::Vm;

#[derive(Default)]
struct QueueState {
    items: VecDeque<i64>,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<QueueState>,
    ready: Condvar,
}

/// Unbounded multi-producer multi-consumer queue of words.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct BlockingQueue {
    shared: Arc<Shared>,
}

impl BlockingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue pre-loaded with `values`.
    pub fn with_values(values: impl IntoIterator<Item = i64>) -> Self {
        let queue = Self::new();
        queue.shared.state.lock().items.extend(values);
        queue
    }

    pub fn push(&self, val: i64) {
        let mut state = self.shared.state.lock();
        state.items.push_back(val);
        drop(state);
        self.shared.ready.notify_one();
    }

    /// Blocks until a value is available. Returns `None` once the queue is
    /// closed and drained.
    pub fn pop(&self) -> Option<i64> {
        let mut state = self.shared.state.lock();
        loop {
            if let Some(val) = state.items.pop_front() {
                return Some(val);
            }
            if state.closed {
                return None;
            }
            self.shared.ready.wait(&mut state);
        }
    }

    pub fn try_pop(&self) -> Option<i64> {
        self.shared.state.lock().items.pop_front()
    }

    /// No more values will be pushed. Wakes every blocked reader.
    pub fn close(&self) {
        self.shared.state.lock().closed = true;
        self.shared.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns everything currently queued.
    pub fn drain(&self) -> Vec<i64> {
        self.shared.state.lock().items.drain(..).collect()
    }
}

impl fmt::Debug for BlockingQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("BlockingQueue")
            .field("items", &state.items)
            .field("closed", &state.closed)
            .finish()
    }
}

/// Runs `vm` to completion on its own thread, reading from `input` and writing
/// to `output`. `output` is closed when the VM stops, whether it halted or
/// failed, so a downstream reader sees the end instead of blocking forever.
pub fn spawn(mut vm: Vm, input: BlockingQueue, output: BlockingQueue) -> JoinHandle<VmResult<Vm>> {
    thread::spawn(move || {
        let mut inp = InputChannel::Queue(input);
        let mut out = OutputChannel::Queue(output.clone());
        let result = vm.run(&mut inp, &mut out, false);
        output.close();
        if let Err(e) = &result {
            log::debug!("queued vm stopped: {}", e);
        }
        result.map(|()| vm)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let q = BlockingQueue::with_values([1, 2]);
        q.push(3);
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.drain(), vec![2, 3]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_try_pop_never_blocks() {
        let q = BlockingQueue::new();
        assert_eq!(q.try_pop(), None);
        q.push(6);
        assert_eq!(q.try_pop(), Some(6));
        q.close();
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn test_pop_after_close() {
        let q = BlockingQueue::with_values([4]);
        q.close();
        assert_eq!(q.pop(), Some(4));
        assert_eq!(q.pop(), None);
        assert!(q.is_closed());
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let q = BlockingQueue::new();
        let peer = q.clone();
        let reader = thread::spawn(move || peer.pop());
        q.push(11);
        assert_eq!(reader.join().unwrap(), Some(11));
    }

    #[test]
    fn test_close_wakes_reader() {
        let q = BlockingQueue::new();
        let peer = q.clone();
        let reader = thread::spawn(move || peer.pop());
        q.close();
        assert_eq!(reader.join().unwrap(), None);
    }
}
