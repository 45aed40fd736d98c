//! Observable state container.
//!
//! Mutate, then notify: every successful update wakes all subscribers, which
//! re-read the latest value. Built on `tokio::sync::watch`, so an update closure
//! runs while holding the container's lock. A check-then-write inside one
//! closure is atomic with respect to every other update.

use tokio::sync::watch;

#[derive(Debug)]
pub struct StateContainer<T> {
    tx: watch::Sender<T>,
}

impl<T> StateContainer<T> {
    pub fn new(initial: T) -> Self { Self { tx: watch::Sender::new(initial) } }

    /// Applies `f`; subscribers are notified only when `f` returns `true`.
    pub fn update_if<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        self.tx.send_if_modified(f)
    }

    /// Applies `f` and always notifies.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.tx.send_modify(f)
    }

    /// Reads the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R { f(&self.tx.borrow()) }

    pub fn subscribe(&self) -> watch::Receiver<T> { self.tx.subscribe() }
}

impl<T: Clone> StateContainer<T> {
    pub fn snapshot(&self) -> T { self.tx.borrow().clone() }
}

impl<T: Default> Default for StateContainer<T> {
    fn default() -> Self { Self::new(T::default()) }
}
