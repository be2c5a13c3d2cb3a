use crate::error::{catch_panic, Error};
use crate::future::Future;

impl<T: Clone + Send + 'static> Future<T> {
    /// Run `on_success` with the value once the `Future` is fulfilled.
    ///
    /// This is a tap for side effects: it returns a handle to the same `Future` so that further
    /// reactions can be chained on. A rejection is ignored.
    ///
    /// ```
    /// # use settle::Future;
    /// # use std::sync::mpsc::channel;
    /// let (tx, rx) = channel();
    /// let fut = Future::value(1).then(move |v| tx.send(v).unwrap());
    /// assert_eq!(rx.recv().unwrap(), 1);
    /// assert_eq!(fut.wait().ok(), Some(1));
    /// ```
    #[inline]
    pub fn then<S>(&self, on_success: S) -> Future<T>
        where S: FnOnce(T) + Send + 'static
    {
        self.then_else(on_success, |_| ())
    }

    /// Run `on_success` or `on_failure`, whichever matches the outcome, once the `Future` is
    /// settled. Returns a handle to the same `Future`.
    pub fn then_else<S, F>(&self, on_success: S, on_failure: F) -> Future<T>
        where S: FnOnce(T) + Send + 'static,
              F: FnOnce(Error) + Send + 'static
    {
        self.add_callbacks(on_success, on_failure, self.context());
        self.clone()
    }

    /// Chain a `Future`-returning function onto the value.
    ///
    /// When this `Future` is fulfilled `func` is called with the value, and the returned `Future`
    /// settles the same way as the one `func` returns. A rejection passes straight through
    /// without calling `func`. If `func` panics the returned `Future` is rejected with
    /// `FutureError::Panicked`.
    ///
    /// ```
    /// # use settle::Future;
    /// let fut = Future::value(2).flat_map(|v| Future::value(v * 10));
    /// assert_eq!(fut.wait().ok(), Some(20));
    /// ```
    pub fn flat_map<F, U>(&self, func: F) -> Future<U>
        where F: FnOnce(T) -> Future<U> + Send + 'static,
              U: Clone + Send + 'static
    {
        let ctx = self.context().clone();
        let out = Future::pending_on(&ctx);
        let res = out.clone();

        self.add_callback(move |outcome| match outcome {
            Ok(v) => match catch_panic("flat_map function", move || func(v)) {
                Ok(next) => next.on(&ctx).forward(&res),
                Err(e) => res.reject(e),
            },
            Err(e) => res.reject(e),
        }, self.context());

        out
    }

    /// Apply a function to the value.
    ///
    /// The returned `Future` is fulfilled with `func`'s return, or rejected with the same error
    /// as this one. If `func` panics the returned `Future` is rejected with
    /// `FutureError::Panicked`.
    ///
    /// ```
    /// # use settle::Future;
    /// let fut = Future::value(1).map(|v| v + 1).map(|v| v * 3);
    /// assert_eq!(fut.wait().ok(), Some(6));
    /// ```
    #[inline]
    pub fn map<F, U>(&self, func: F) -> Future<U>
        where F: FnOnce(T) -> U + Send + 'static,
              U: Clone + Send + 'static
    {
        self.try_map(move |v| Ok::<U, Error>(func(v)))
    }

    /// Apply a fallible function to the value. An `Err` return rejects the returned `Future`.
    ///
    /// ```
    /// # use settle::Future;
    /// let fut = Future::value("12").try_map(|s| s.parse::<u32>());
    /// assert_eq!(fut.wait().ok(), Some(12));
    ///
    /// let fut = Future::value("twelve").try_map(|s| s.parse::<u32>());
    /// assert!(fut.wait().is_err());
    /// ```
    pub fn try_map<F, U, E>(&self, func: F) -> Future<U>
        where F: FnOnce(T) -> Result<U, E> + Send + 'static,
              U: Clone + Send + 'static,
              E: Into<Error>
    {
        let out = Future::pending_on(self.context());
        let res = out.clone();

        self.add_callback(move |outcome| {
            let mapped = outcome.and_then(|v| {
                catch_panic("map function", move || func(v).map_err(Into::into)).and_then(|r| r)
            });
            res.settle(mapped)
        }, self.context());

        out
    }

    /// Run `block` once the `Future` settles, whatever the outcome.
    ///
    /// The returned `Future` settles with the original outcome after `block` has run. A panic in
    /// `block` is logged and does not change the outcome.
    ///
    /// ```
    /// # use settle::{Future, FutureError};
    /// # use std::sync::mpsc::channel;
    /// let (tx, rx) = channel();
    /// let fut = Future::<i32>::error(FutureError::Abandoned).finally(move || tx.send(()).unwrap());
    /// assert!(fut.wait().is_err());
    /// assert!(rx.recv().is_ok());
    /// ```
    pub fn finally<B>(&self, block: B) -> Future<T>
        where B: FnOnce() + Send + 'static
    {
        let out = Future::pending_on(self.context());
        let res = out.clone();

        self.add_callback(move |outcome| {
            let _ = catch_panic("finally block", block);
            res.settle(outcome)
        }, self.context());

        out
    }
}
