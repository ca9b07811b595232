// semaphore.rs
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct State {
    count: usize,
    waiters: usize,
}

/// Counting semaphore with no upper bound on its capacity.
///
/// `wait` takes one unit of capacity, suspending the task while none is available;
/// `post` returns one unit and wakes a suspended waiter. Posting without a matching
/// wait is allowed and simply raises the capacity.
///
/// Every wake re-checks the count under the lock, so a wakeup that races with
/// another taker only sends the woken task back to sleep. A waiter that is dropped
/// after being picked for a wakeup hands that wakeup on to the next waiter.
#[derive(Debug)]
pub struct Semaphore {
    state: Mutex<State>,
    notify: Notify,
}

impl Semaphore {
    pub fn new(initial: usize) -> Self {
        Self {
            state: Mutex::new(State {
                count: initial,
                waiters: 0,
            }),
            notify: Notify::new(),
        }
    }

    // The lock is never held across user code, so a poisoned state is still consistent.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes one unit of capacity, waiting for a `post` if there is none.
    pub async fn wait(&self) {
        if self.try_wait() {
            return;
        }

        let _waiting = WaiterGuard::register(self);
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register interest before checking, so a post landing in between is not missed.
            notified.as_mut().enable();

            if self.try_wait() {
                return;
            }
            log::trace!("semaphore exhausted, suspending");
            notified.await;
        }
    }

    /// Takes one unit of capacity if available. Never blocks.
    pub fn try_wait(&self) -> bool {
        let mut state = self.state();
        if state.count > 0 {
            state.count -= 1;
            true
        } else {
            false
        }
    }

    /// Returns one unit of capacity and wakes a waiter, if any.
    pub fn post(&self) {
        self.state().count += 1;
        self.notify.notify_one();
    }

    /// Snapshot of the available capacity.
    pub fn available(&self) -> usize {
        self.state().count
    }

    /// Snapshot of the number of suspended waiters.
    pub fn waiters(&self) -> usize {
        self.state().waiters
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

struct WaiterGuard<'a> {
    semaphore: &'a Semaphore,
}

impl<'a> WaiterGuard<'a> {
    fn register(semaphore: &'a Semaphore) -> Self {
        semaphore.state().waiters += 1;
        Self { semaphore }
    }
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        self.semaphore.state().waiters -= 1;
    }
}
