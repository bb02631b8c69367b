//! Cross-thread redraw requests.
//!
//! The view tree is single-threaded. The one thing another thread may do is
//! ask the event loop to redraw; it does so through a cloned
//! [`RedrawHandle`], and the loop polls [`RedrawHandle::take`].

use std::sync::{Arc, Mutex};

/// Shared "please redraw" flag.
#[derive(Debug, Clone, Default)]
pub struct RedrawHandle {
    requested: Arc<Mutex<bool>>,
}

impl RedrawHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a redraw, waiting for the lock if the event loop holds it.
    pub fn request_redraw_in_thread(&self) {
        let mut requested = self
            .requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *requested = true;
    }

    /// Request a redraw only if the lock is free right now.
    ///
    /// Returns `false` when the request was dropped; callers on a hot path
    /// simply try again on their next tick.
    pub fn try_request_redraw_in_thread(&self) -> bool {
        match self.requested.try_lock() {
            Ok(mut requested) => {
                *requested = true;
                true
            }
            Err(_) => false,
        }
    }

    /// Read and reset the flag.
    pub fn take(&self) -> bool {
        let mut requested = self
            .requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn take_resets_flag() {
        let handle = RedrawHandle::new();
        assert!(!handle.take());
        handle.request_redraw_in_thread();
        assert!(handle.take());
        assert!(!handle.take());
    }

    #[test]
    fn worker_thread_can_request() {
        let handle = RedrawHandle::new();
        let worker = handle.clone();
        thread::spawn(move || worker.request_redraw_in_thread())
            .join()
            .unwrap();
        assert!(handle.take());
    }

    #[test]
    fn try_request_fails_while_locked() {
        let handle = RedrawHandle::new();
        let guard = handle.requested.lock().unwrap();
        let other = handle.clone();
        let accepted = thread::spawn(move || other.try_request_redraw_in_thread())
            .join()
            .unwrap();
        drop(guard);
        assert!(!accepted);
        assert!(!handle.take());
        assert!(handle.try_request_redraw_in_thread());
    }
}
