use std::fmt::{self, Formatter, Debug};
use std::sync::{Arc, Mutex};

use crate::context::Context;
use crate::error::{catch_panic, Error, FutureError};
use crate::future::Future;

/// A write-once handle for settling a `Future`.
///
/// A `Promise` is the producer's side of a `Future`. It is consumed by `fulfill` or `reject`; if
/// it is dropped without either, the `Future` is rejected with `FutureError::Abandoned` so that
/// consumers are never left waiting on a producer which has gone away.
///
/// It is created in a pair with a `Future` using `future_promise()`, or handed to the work
/// closure passed to `Future::spawn`.
pub struct Promise<T: Clone + Send + 'static> {
    future: Option<Future<T>>,
    deferral: Option<Arc<Mutex<Deferral>>>,
}

// Shared with `Future::spawn` while its work closure runs. A `Promise` dropped in that window
// records the fact here instead of rejecting, so that an error returned by the closure wins.
struct Deferral {
    running: bool,
    dropped: bool,
}

impl<T: Clone + Send + 'static> Promise<T> {
    pub fn new(future: Future<T>) -> Promise<T> {
        Promise { future: Some(future), deferral: None }
    }

    /// Fulfill the corresponding `Future` with a value.
    pub fn fulfill(mut self, v: T) {
        if let Some(f) = self.future.take() {
            f.fulfill(v)
        }
    }

    /// Reject the corresponding `Future` with an error.
    pub fn reject<E: Into<Error>>(mut self, e: E) {
        if let Some(f) = self.future.take() {
            f.reject(e)
        }
    }

    /// A consumer handle for the `Future` this `Promise` settles.
    pub fn future(&self) -> Option<Future<T>> {
        self.future.clone()
    }

    /// Return true if nothing could observe the value any more: no other handle to the `Future`
    /// exists and no reaction is waiting on it. A producer may use this to abandon work whose
    /// result would be discarded.
    ///
    /// ```
    /// # use settle::future_promise;
    /// # use std::mem;
    /// let (fut, prom) = future_promise::<u32>();
    ///
    /// assert!(!prom.canceled());
    /// mem::drop(fut);
    /// assert!(prom.canceled());
    /// ```
    pub fn canceled(&self) -> bool {
        match self.future {
            Some(ref f) => f.observers() == 0,
            None => true,
        }
    }
}

impl<T: Clone + Send + 'static> Drop for Promise<T> {
    fn drop(&mut self) {
        if let Some(f) = self.future.take() {
            if let Some(ref deferral) = self.deferral {
                let mut d = deferral.lock().unwrap_or_else(|e| e.into_inner());
                if d.running {
                    d.dropped = true;
                    return;
                }
            }

            if f.is_pending() {
                debug!("promise dropped unsettled; rejecting its future");
            }
            f.reject(FutureError::Abandoned)
        }
    }
}

impl<T: Clone + Send + Debug + 'static> Debug for Promise<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.future {
            Some(ref fut) => write!(f, "Promise({:?})", fut),
            None => write!(f, "Promise(complete)"),
        }
    }
}

/// Construct a `Future`/`Promise` pair bound to the default context.
///
/// ```
/// # use settle::future_promise;
/// let (fut, prom) = future_promise::<i32>();
/// prom.fulfill(1);
/// assert_eq!(fut.wait().ok(), Some(1));
/// ```
pub fn future_promise<T: Clone + Send + 'static>() -> (Future<T>, Promise<T>) {
    let fut = Future::pending();
    let prom = Promise::new(fut.clone());

    (fut, prom)
}

impl<T: Clone + Send + 'static> Future<T> {
    /// Run `work` on `context` to produce the value of a new `Future`.
    ///
    /// `work` is passed the `Promise` for the returned `Future`. It may settle it directly or
    /// hand it on to be settled later. If `work` returns an error or panics, the `Future` is
    /// rejected with that error, unless it was already settled.
    ///
    /// ```
    /// # use settle::{Future, context};
    /// # use threadpool::ThreadPool;
    /// let pool = context(ThreadPool::new(2));
    /// let fut = Future::spawn(&pool, |p| { p.fulfill(6 * 7); Ok(()) });
    /// assert_eq!(fut.wait().ok(), Some(42));
    /// ```
    pub fn spawn<W>(context: &Context, work: W) -> Future<T>
        where W: FnOnce(Promise<T>) -> Result<(), Error> + Send + 'static
    {
        let fut = Future::pending_on(context);
        let out = fut.downgrade();
        let deferral = Arc::new(Mutex::new(Deferral { running: true, dropped: false }));
        let prom = Promise { future: Some(fut.clone()), deferral: Some(deferral.clone()) };

        context.schedule(Box::new(move || {
            let res = catch_panic("work closure", move || work(prom)).and_then(|r| r);
            let dropped = {
                let mut d = deferral.lock().unwrap_or_else(|e| e.into_inner());
                d.running = false;
                d.dropped
            };

            // Nothing to report to if every handle has gone.
            let out = match out.upgrade() {
                Some(out) => out,
                None => return,
            };
            match res {
                Err(e) => out.reject(e),
                Ok(()) if dropped => out.reject(FutureError::Abandoned),
                Ok(()) => (),
            }
        }));

        fut
    }
}
