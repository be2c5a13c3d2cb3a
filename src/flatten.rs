use std::mem;
use std::sync::{Arc, Mutex};

use crate::config;
use crate::context::Context;
use crate::future::Future;

// Counted completion for `flatten`: one slot per input, filled by index.
struct Join<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
}

impl<T> Join<T> {
    fn new(n: usize) -> Join<T> {
        Join {
            slots: (0..n).map(|_| None).collect(),
            remaining: n,
        }
    }

    // Record the value for input `idx`. Returns all values, in input order, once the last slot
    // is filled.
    fn record(&mut self, idx: usize, v: T) -> Option<Vec<T>> {
        match self.slots.get_mut(idx) {
            Some(slot) if slot.is_none() => *slot = Some(v),
            _ => return None,
        }
        self.remaining -= 1;

        if self.remaining == 0 {
            Some(mem::take(&mut self.slots).into_iter().flatten().collect())
        } else {
            None
        }
    }
}

/// Return a `Future` of all values from an iterator of `Future`s.
///
/// Take an iterator producing `Future<T>` values and return a `Future<Vec<T>>`, bound to the
/// default context. See `flatten_with`.
///
/// ```
/// # use settle::{Future, flatten};
/// let v = vec![Future::value(10), Future::value(20), Future::value(30)];
/// assert_eq!(flatten(v).wait().ok(), Some(vec![10, 20, 30]));
/// ```
pub fn flatten<T, I>(futures: I) -> Future<Vec<T>>
    where T: Clone + Send + 'static,
          I: IntoIterator<Item=Future<T>>
{
    flatten_with(futures, &config::default_context())
}

/// Return a `Future` of all values from an iterator of `Future`s, bound to `context`.
///
/// The returned `Future` is fulfilled once every input is fulfilled, with the values in input
/// order regardless of the order in which the inputs settled. It is rejected as soon as any input
/// is rejected, without waiting for the others. An empty input yields an empty vector.
pub fn flatten_with<T, I>(futures: I, context: &Context) -> Future<Vec<T>>
    where T: Clone + Send + 'static,
          I: IntoIterator<Item=Future<T>>
{
    let futures: Vec<_> = futures.into_iter().collect();
    let out = Future::pending_on(context);

    if futures.is_empty() {
        out.fulfill(Vec::new());
        return out;
    }

    let join = Arc::new(Mutex::new(Join::new(futures.len())));

    for (idx, fut) in futures.into_iter().enumerate() {
        let (out, join) = (out.clone(), join.clone());

        fut.add_callback(move |outcome| match outcome {
            Ok(v) => {
                let done = join.lock().unwrap_or_else(|e| e.into_inner()).record(idx, v);
                if let Some(values) = done {
                    out.fulfill(values)
                }
            },
            Err(e) => out.reject(e),
        }, context);
    }

    out
}
