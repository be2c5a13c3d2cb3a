use std::fmt::{self, Formatter, Debug};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crate::config;
use crate::context::Context;
use crate::cvmx::CvMx;
use crate::error::Error;
use crate::inner::{State, Waiter};

/// A value which becomes available at most once, or fails.
///
/// A `Future` starts out pending and is settled exactly once, either fulfilled with a value or
/// rejected with an `Error`. Settling an already settled `Future` does nothing: the first
/// settlement wins.
///
/// `Future` is a shared handle. Clones refer to the same underlying state, so a producer can
/// keep one clone to settle it while consumers attach reactions through others. It is safe to
/// settle and attach reactions concurrently from any number of threads.
///
/// Every `Future` is bound to an execution context. Reactions are never run in the caller's
/// stack frame; they are always scheduled on a context, and combinators default to the context
/// of the `Future` they are attached to, so a chain stays on one context unless rebound with
/// `on`.
pub struct Future<T> {
    inner: Arc<CvMx<State<T>>>,
    context: Context,
}

impl<T: Clone + Send + 'static> Future<T> {
    fn with_state(state: State<T>, context: &Context) -> Future<T> {
        Future {
            inner: Arc::new(CvMx::new(state)),
            context: context.clone(),
        }
    }

    /// Construct an unsettled `Future` bound to the default context.
    ///
    /// ```
    /// # use settle::Future;
    /// let fut = Future::pending();
    /// assert!(fut.is_pending());
    /// fut.fulfill(123);
    /// assert_eq!(fut.wait().ok(), Some(123));
    /// ```
    #[inline]
    pub fn pending() -> Future<T> {
        Future::pending_on(&config::default_context())
    }

    /// Construct an unsettled `Future` bound to `context`.
    pub fn pending_on(context: &Context) -> Future<T> {
        Future::with_state(State::new(), context)
    }

    /// Construct an already fulfilled `Future`. Reactions attached to it are scheduled at once.
    ///
    /// ```
    /// # use settle::Future;
    /// let fut = Future::value(123);
    /// assert_eq!(fut.peek().and_then(Result::ok), Some(123));
    /// ```
    pub fn value(v: T) -> Future<T> {
        Future::with_state(State::Fulfilled(v), &config::default_context())
    }

    /// Construct an already rejected `Future`.
    ///
    /// ```
    /// # use settle::{Future, FutureError};
    /// let fut = Future::<i32>::error(FutureError::Abandoned);
    /// let err = fut.wait().unwrap_err();
    /// assert_eq!(err.downcast_ref::<FutureError>(), Some(&FutureError::Abandoned));
    /// ```
    pub fn error<E: Into<Error>>(e: E) -> Future<T> {
        Future::with_state(State::Rejected(e.into()), &config::default_context())
    }

    /// Return a handle to the same `Future` bound to another context.
    ///
    /// Combinators called on the returned handle schedule their reactions on `context`, and the
    /// `Future`s they return carry `context` on to their own descendants.
    pub fn on(&self, context: &Context) -> Future<T> {
        Future {
            inner: self.inner.clone(),
            context: context.clone(),
        }
    }

    /// The context this handle schedules reactions on.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Fulfill the `Future` with a value. Does nothing if it is already settled.
    #[inline]
    pub fn fulfill(&self, v: T) {
        self.settle(Ok(v))
    }

    /// Reject the `Future` with an error. Does nothing if it is already settled.
    #[inline]
    pub fn reject<E: Into<Error>>(&self, e: E) {
        self.settle(Err(e.into()))
    }

    /// Settle the `Future` with an outcome. Does nothing if it is already settled.
    ///
    /// Every waiter registered so far has its matching reaction scheduled on its own context, in
    /// registration order. The reactions run after the lock is released.
    pub fn settle(&self, outcome: Result<T, Error>) {
        let waiters = {
            let mut lk = self.inner.lock();
            let waiters = lk.settle(&outcome);

            if waiters.is_some() {
                self.inner.notify_all();
            }
            waiters
        };

        match waiters {
            None => debug!("future already settled; ignoring {}",
                           if outcome.is_ok() { "fulfill" } else { "reject" }),
            Some(waiters) => {
                trace!("settled future ({}), firing {} waiters",
                       if outcome.is_ok() { "fulfilled" } else { "rejected" }, waiters.len());
                for w in waiters {
                    w.fire(&outcome)
                }
            },
        }
    }

    /// Register a pair of reactions to run on `context` once the `Future` settles.
    ///
    /// Exactly one of the two is eventually called, exactly once. If the `Future` is pending the
    /// reactions are queued; otherwise the matching one is scheduled on `context` immediately.
    /// Either way this returns before the reaction can run.
    ///
    /// ```
    /// # use settle::Future;
    /// # use std::sync::mpsc::channel;
    /// let fut = Future::pending();
    /// let (tx, rx) = channel();
    /// let ctx = fut.context().clone();
    ///
    /// fut.add_callbacks(move |v| tx.send(v).unwrap(), |_| (), &ctx);
    /// fut.fulfill(5);
    /// assert_eq!(rx.recv().unwrap(), 5);
    /// ```
    #[inline]
    pub fn add_callbacks<S, F>(&self, on_success: S, on_failure: F, context: &Context)
        where S: FnOnce(T) + Send + 'static,
              F: FnOnce(Error) + Send + 'static
    {
        self.add_callback(move |outcome| match outcome {
            Ok(v) => on_success(v),
            Err(e) => on_failure(e),
        }, context)
    }

    /// Register a single reaction which is passed the outcome, whichever it is.
    ///
    /// This is the most general way to attach to a `Future`; `add_callbacks` and every
    /// combinator are built on it.
    pub fn add_callback<F>(&self, callback: F, context: &Context)
        where F: FnOnce(Result<T, Error>) + Send + 'static
    {
        let waiter = Waiter {
            callback: Box::new(callback),
            context: context.clone(),
        };

        let outcome = {
            let mut lk = self.inner.lock();

            if let State::Pending(ref mut waiters) = *lk {
                waiters.push(waiter);
                trace!("queued waiter #{} on pending future", waiters.len());
                return;
            }
            lk.outcome()
        };

        if let Some(outcome) = outcome {
            waiter.fire(&outcome)
        }
    }

    /// Forward this `Future`'s eventual outcome into `out`.
    ///
    /// The transfer is scheduled on this handle's context.
    pub fn forward(&self, out: &Future<T>) {
        let out = out.clone();

        self.add_callback(move |outcome| out.settle(outcome), &self.context)
    }

    /// Return true if the `Future` has not been settled yet.
    pub fn is_pending(&self) -> bool {
        self.inner.lock().is_pending()
    }

    /// Return true if the `Future` has been settled.
    #[inline]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Return the outcome if the `Future` is settled, without blocking.
    ///
    /// ```
    /// # use settle::Future;
    /// let fut = Future::<i32>::pending();
    /// assert!(fut.peek().is_none());
    /// fut.fulfill(1);
    /// assert_eq!(fut.peek().and_then(Result::ok), Some(1));
    /// ```
    pub fn peek(&self) -> Option<Result<T, Error>> {
        self.inner.lock().outcome()
    }

    /// Block until the `Future` is settled and return its outcome.
    ///
    /// This is meant for tests and for the edges of a program. Calling it from a job running on
    /// the context which is expected to settle the `Future` deadlocks a serial context.
    pub fn wait(&self) -> Result<T, Error> {
        let mut lk = self.inner.lock();

        loop {
            if let Some(outcome) = lk.outcome() {
                return outcome;
            }
            lk = self.inner.wait(lk);
        }
    }

    /// As `wait`, but give up after `timeout`, returning `None` if the `Future` is still pending.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T, Error>> {
        let deadline = Instant::now() + timeout;
        let mut lk = self.inner.lock();

        loop {
            if let Some(outcome) = lk.outcome() {
                return Some(outcome);
            }

            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            lk = self.inner.wait_timeout(lk, deadline - now);
        }
    }

    // Number of handles and queued waiters which could still observe a settlement, excluding
    // the caller's own handle.
    pub(crate) fn observers(&self) -> usize {
        let waiters = self.inner.lock().waiter_count();

        Arc::strong_count(&self.inner) - 1 + waiters
    }

    // A handle which doesn't keep the state alive or count as an observer.
    pub(crate) fn downgrade(&self) -> WeakFuture<T> {
        WeakFuture {
            inner: Arc::downgrade(&self.inner),
            context: self.context.clone(),
        }
    }
}

pub(crate) struct WeakFuture<T> {
    inner: Weak<CvMx<State<T>>>,
    context: Context,
}

impl<T> WeakFuture<T> {
    pub fn upgrade(&self) -> Option<Future<T>> {
        self.inner.upgrade().map(|inner| Future { inner: inner, context: self.context.clone() })
    }
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Future<T> {
        Future {
            inner: self.inner.clone(),
            context: self.context.clone(),
        }
    }
}

impl<T: Clone + Send + Debug + 'static> Debug for Future<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let (outcome, waiters) = {
            let lk = self.inner.lock();
            (lk.outcome(), lk.waiter_count())
        };

        match outcome {
            None => write!(f, "Future(Pending({} waiters))", waiters),
            Some(Ok(v)) => write!(f, "Future(Fulfilled({:?}))", v),
            Some(Err(e)) => write!(f, "Future(Rejected({}))", e),
        }
    }
}

impl<T, E> From<Result<T, E>> for Future<T>
    where T: Clone + Send + 'static,
          E: Into<Error>
{
    fn from(r: Result<T, E>) -> Future<T> {
        match r {
            Ok(v) => Future::value(v),
            Err(e) => Future::error(e),
        }
    }
}
