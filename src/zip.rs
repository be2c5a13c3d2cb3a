use std::sync::{Arc, Mutex};

use crate::future::Future;

// Values collected so far by a binary zip.
struct Pair<A, B> {
    first: Option<A>,
    second: Option<B>,
}

impl<A, B> Pair<A, B> {
    // Take both values once both are present.
    fn complete(&mut self) -> Option<(A, B)> {
        if self.first.is_some() && self.second.is_some() {
            self.first.take().and_then(|a| self.second.take().map(|b| (a, b)))
        } else {
            None
        }
    }
}

impl<T: Clone + Send + 'static> Future<T> {
    /// Join two `Future`s.
    ///
    /// The returned `Future` is fulfilled with both values once both are fulfilled, and rejected
    /// as soon as either is rejected. If both are rejected, which of the two errors is delivered
    /// depends on which rejection is observed first.
    ///
    /// ```
    /// # use settle::Future;
    /// let fut = Future::value(1).zip(&Future::value("a"));
    /// assert_eq!(fut.wait().ok(), Some((1, "a")));
    /// ```
    pub fn zip<U>(&self, other: &Future<U>) -> Future<(T, U)>
        where U: Clone + Send + 'static
    {
        let ctx = self.context().clone();
        let out = Future::pending_on(&ctx);
        let pair = Arc::new(Mutex::new(Pair { first: None, second: None }));

        {
            let (out, pair) = (out.clone(), pair.clone());
            self.add_callback(move |outcome| match outcome {
                Ok(a) => {
                    let both = {
                        let mut p = pair.lock().unwrap_or_else(|e| e.into_inner());
                        p.first = Some(a);
                        p.complete()
                    };
                    if let Some(both) = both {
                        out.fulfill(both)
                    }
                },
                Err(e) => out.reject(e),
            }, &ctx);
        }

        {
            let (out, pair) = (out.clone(), pair);
            other.add_callback(move |outcome| match outcome {
                Ok(b) => {
                    let both = {
                        let mut p = pair.lock().unwrap_or_else(|e| e.into_inner());
                        p.second = Some(b);
                        p.complete()
                    };
                    if let Some(both) = both {
                        out.fulfill(both)
                    }
                },
                Err(e) => out.reject(e),
            }, &ctx);
        }

        out
    }

    /// Join three `Future`s. See `zip`.
    pub fn zip3<U, V>(&self, second: &Future<U>, third: &Future<V>) -> Future<(T, U, V)>
        where U: Clone + Send + 'static,
              V: Clone + Send + 'static
    {
        self.zip(second)
            .zip(third)
            .map(|((a, b), c)| (a, b, c))
    }

    /// Join four `Future`s. See `zip`.
    pub fn zip4<U, V, W>(&self, second: &Future<U>, third: &Future<V>, fourth: &Future<W>)
                         -> Future<(T, U, V, W)>
        where U: Clone + Send + 'static,
              V: Clone + Send + 'static,
              W: Clone + Send + 'static
    {
        self.zip3(second, third)
            .zip(fourth)
            .map(|((a, b, c), d)| (a, b, c, d))
    }

    /// Join five `Future`s. See `zip`.
    ///
    /// ```
    /// # use settle::Future;
    /// let v = |i: u32| Future::value(i);
    /// let fut = v(1).zip5(&v(2), &v(3), &v(4), &v(5));
    /// assert_eq!(fut.wait().ok(), Some((1, 2, 3, 4, 5)));
    /// ```
    pub fn zip5<U, V, W, X>(&self, second: &Future<U>, third: &Future<V>, fourth: &Future<W>,
                            fifth: &Future<X>) -> Future<(T, U, V, W, X)>
        where U: Clone + Send + 'static,
              V: Clone + Send + 'static,
              W: Clone + Send + 'static,
              X: Clone + Send + 'static
    {
        self.zip4(second, third, fourth)
            .zip(fifth)
            .map(|((a, b, c, d), e)| (a, b, c, d, e))
    }
}
