//! Settle-once Futures
//! ===================
//!
//! Quick example:
//!
//! ```
//! # use settle::Future;
//! # use std::thread;
//! # use std::time::Duration;
//! let fut = Future::pending();
//!
//! // A time-consuming process
//! let producer = fut.clone();
//! thread::spawn(move || { thread::sleep(Duration::from_millis(100)); producer.fulfill(123) });
//!
//! // do something when the value is ready
//! let fut = fut.map(|v| v + 1);
//!
//! // Wait for the final result
//! assert_eq!(fut.wait().ok(), Some(124));
//! ```
//!
//! This crate implements a `Future`: a shared handle to a value which becomes available at most
//! once, or fails with an `Error` instead. A `Future` is "pending" until it is "settled", either
//! by being fulfilled with a value or rejected with an error. It settles exactly once; any later
//! attempt to settle it is silently ignored.
//!
//! A `Future` can be settled through any clone of it, or through a write-once `Promise` created
//! in a pair with it by `future_promise()`. A `Promise` which is dropped without being used
//! rejects its `Future` with `FutureError::Abandoned`. A `Future` can also be created already
//! settled, with `Future::value` and `Future::error`, which is useful for lifting plain values
//! into the `Future` domain.
//!
//! Reactions to a settlement never run in the stack frame which registered them or settled the
//! `Future`. They are scheduled on an `ExecutionContext`: a `SerialQueue`, a
//! `threadpool::ThreadPool`, or anything else which implements the trait. Each `Future` carries a
//! context, and everything chained from it inherits that context unless rebound with `on`. Fresh
//! `Future`s use the process-wide default from `config`.
//!
//! `Future`s are combined with:
//!
//! * `then`, `then_else`: tap the outcome for side effects;
//! * `map`, `try_map`, `flat_map`: transform the value, passing errors through;
//! * `catch`, `catch_kind`, `catch_err`: observe errors, optionally only of one type or value;
//! * `replace`, `replace_fail`: recover from an error with another `Future`;
//! * `zip` ... `zip5`: join a fixed number of `Future`s of different types into a tuple;
//! * `flatten`: join any number of `Future`s of one type into a `Vec`, in input order;
//! * `finally`: run a block whatever the outcome, and pass the outcome on.
//!
//! A panic in a function passed to a combinator is caught at the combinator and turned into a
//! rejection with `FutureError::Panicked`.
//!
//! ```
//! # use settle::{Future, FutureError};
//! let fut = Future::value(2)
//!     .try_map(|v| if v > 1 { Err(FutureError::Abandoned) } else { Ok(v) })
//!     .replace(|_| Future::value(0))
//!     .zip(&Future::value("done"));
//!
//! assert_eq!(fut.wait().ok(), Some((0, "done")));
//! ```

#[macro_use]
extern crate log;

mod cvmx;
mod inner;
mod error;
mod context;
mod queue;
mod future;
mod promise;
mod then;
mod catch;
mod zip;
mod flatten;
pub mod config;

pub use error::{Error, FutureError};
pub use context::{ExecutionContext, Context, Job, context};
pub use queue::SerialQueue;
pub use future::Future;
pub use promise::{Promise, future_promise};
pub use flatten::{flatten, flatten_with};
