use std::error::Error as StdError;

use crate::error::{catch_panic, Error};
use crate::future::Future;

impl<T: Clone + Send + 'static> Future<T> {
    /// Run `on_failure` with the error if the `Future` is rejected. Returns a handle to the same
    /// `Future`; the rejection is observed, not consumed.
    #[inline]
    pub fn catch<F>(&self, on_failure: F) -> Future<T>
        where F: FnOnce(Error) + Send + 'static
    {
        self.then_else(|_| (), on_failure)
    }

    /// Run `on_failure` only if the rejection's error is an `E`.
    ///
    /// Any number of these may be attached to one `Future`; each one whose type matches runs.
    ///
    /// ```
    /// # use settle::{Future, FutureError};
    /// # use std::fmt;
    /// # use std::sync::mpsc::channel;
    /// #[derive(Debug)]
    /// struct Timeout;
    /// # impl fmt::Display for Timeout {
    /// #     fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "timeout") }
    /// # }
    /// impl std::error::Error for Timeout {}
    ///
    /// let (tx, rx) = channel();
    /// let fut = Future::<()>::error(Timeout);
    /// let tx2 = tx.clone();
    /// fut.catch_kind(move |_: &FutureError| tx2.send("future").unwrap());
    /// fut.catch_kind(move |_: &Timeout| tx.send("timeout").unwrap());
    ///
    /// assert_eq!(rx.recv().unwrap(), "timeout");
    /// ```
    pub fn catch_kind<E, F>(&self, on_failure: F) -> Future<T>
        where E: StdError + 'static,
              F: FnOnce(&E) + Send + 'static
    {
        self.catch(move |err| {
            if let Some(e) = err.downcast_ref::<E>() {
                on_failure(e)
            }
        })
    }

    /// Run `on_failure` only if the rejection's error is an `E` equal to `error`.
    ///
    /// ```
    /// # use settle::{Future, FutureError};
    /// # use std::sync::mpsc::channel;
    /// let (tx, rx) = channel();
    /// Future::<()>::error(FutureError::Abandoned)
    ///     .catch_err(FutureError::AlreadyInitialized, || panic!("wrong error"))
    ///     .catch_err(FutureError::Abandoned, move || tx.send(()).unwrap());
    ///
    /// assert!(rx.recv().is_ok());
    /// ```
    pub fn catch_err<E, F>(&self, error: E, on_failure: F) -> Future<T>
        where E: StdError + PartialEq + Send + 'static,
              F: FnOnce() + Send + 'static
    {
        self.catch(move |err| {
            if err.downcast_ref::<E>() == Some(&error) {
                on_failure()
            }
        })
    }

    /// Recover from a rejection with a `Future`-returning function.
    ///
    /// The returned `Future` is fulfilled with this one's value. On rejection `func` is called
    /// with the error, and the returned `Future` settles the same way as the one `func` returns,
    /// so the error is consumed. If `func` panics the returned `Future` is rejected with
    /// `FutureError::Panicked`.
    ///
    /// ```
    /// # use settle::{Future, FutureError};
    /// let fut = Future::error(FutureError::Abandoned).replace(|_| Future::value(1));
    /// assert_eq!(fut.wait().ok(), Some(1));
    /// ```
    pub fn replace<F>(&self, func: F) -> Future<T>
        where F: FnOnce(Error) -> Future<T> + Send + 'static
    {
        let ctx = self.context().clone();
        let out = Future::pending_on(&ctx);
        let res = out.clone();

        self.add_callback(move |outcome| match outcome {
            Ok(v) => res.fulfill(v),
            Err(e) => match catch_panic("replace function", move || func(e)) {
                Ok(next) => next.on(&ctx).forward(&res),
                Err(e) => res.reject(e),
            },
        }, self.context());

        out
    }

    /// As `replace`, for a fallback which doesn't care what the error was.
    #[inline]
    pub fn replace_fail<F>(&self, func: F) -> Future<T>
        where F: FnOnce() -> Future<T> + Send + 'static
    {
        self.replace(move |_| func())
    }
}
