//! Poll listeners
//!
//! Listeners receive the results of a poller. All methods are invoked on the
//! poller's task, one at a time and in tick order. None of them is invoked
//! once [`PollHandle::cancel`](crate::PollHandle::cancel) has returned.
//!
//! Listener methods must not call `cancel` on the handle of the poller that
//! is invoking them; stopping from inside a callback is done by making the
//! terminal predicate return `true` instead.

/// Receives status updates and stop notifications from a poller
pub trait PollListener<S, E>: Send + 'static {
    /// A status check succeeded. Called for terminal statuses too.
    fn on_update(&mut self, _status: &S) {}

    /// The error budget is exhausted; `error` is the last failure.
    fn on_error(&mut self, _error: &E) {}

    /// The deadline passed before a terminal status was observed.
    fn on_timeout(&mut self, _last_status: Option<&S>) {}
}

/// Listener ignoring every notification
impl<S, E> PollListener<S, E> for () {}

type UpdateFn<S> = Box<dyn FnMut(&S) + Send>;
type ErrorFn<E> = Box<dyn FnMut(&E) + Send>;
type TimeoutFn<S> = Box<dyn FnMut(Option<&S>) + Send>;

/// Listener assembled from closures
///
/// # Example
/// ```
/// use furrow_poller::Callbacks;
///
/// let callbacks = Callbacks::<String, String>::new()
///     .on_update(|status| println!("status: {status}"))
///     .on_error(|error| eprintln!("giving up: {error}"))
///     .on_timeout(|_| eprintln!("taking longer than usual"));
/// # let _ = callbacks;
/// ```
pub struct Callbacks<S, E> {
    update: Option<UpdateFn<S>>,
    error: Option<ErrorFn<E>>,
    timeout: Option<TimeoutFn<S>>,
}

impl<S, E> Callbacks<S, E> {
    pub fn new() -> Self {
        Self {
            update: None,
            error: None,
            timeout: None,
        }
    }

    pub fn on_update(mut self, f: impl FnMut(&S) + Send + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnMut(&E) + Send + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    pub fn on_timeout(mut self, f: impl FnMut(Option<&S>) + Send + 'static) -> Self {
        self.timeout = Some(Box::new(f));
        self
    }
}

impl<S, E> Default for Callbacks<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, E: 'static> PollListener<S, E> for Callbacks<S, E> {
    fn on_update(&mut self, status: &S) {
        if let Some(f) = self.update.as_mut() {
            f(status);
        }
    }

    fn on_error(&mut self, error: &E) {
        if let Some(f) = self.error.as_mut() {
            f(error);
        }
    }

    fn on_timeout(&mut self, last_status: Option<&S>) {
        if let Some(f) = self.timeout.as_mut() {
            f(last_status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_callbacks_dispatch() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let updates = Arc::clone(&seen);
        let errors = Arc::clone(&seen);
        let mut callbacks = Callbacks::<u32, String>::new()
            .on_update(move |s| updates.lock().unwrap().push(format!("update {s}")))
            .on_error(move |e| errors.lock().unwrap().push(format!("error {e}")));

        // Builder methods shadow the listener methods on the concrete type
        PollListener::on_update(&mut callbacks, &1);
        PollListener::on_error(&mut callbacks, &"boom".to_string());
        // No timeout callback registered
        PollListener::on_timeout(&mut callbacks, Some(&1));

        assert_eq!(*seen.lock().unwrap(), vec!["update 1", "error boom"]);
    }
}
