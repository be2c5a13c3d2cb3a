use std::fmt::{self, Debug};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Sender, Receiver, channel};
use std::sync::Mutex;
use std::thread;

use crate::context::{ExecutionContext, Job};
use crate::error::Error;

/// A serial execution context.
///
/// A `SerialQueue` owns a single named worker thread which runs jobs one at a time, strictly in
/// the order they were scheduled. A job which panics is logged and discarded; the worker carries
/// on with the next job.
///
/// The worker exits once the queue is dropped and every job already scheduled has run.
///
/// ```
/// # use settle::{Future, SerialQueue, context};
/// let main = context(SerialQueue::new("main"));
/// let fut = Future::value(1).on(&main).map(|v| v + 1);
/// assert_eq!(fut.wait().ok(), Some(2));
/// ```
pub struct SerialQueue {
    name: String,
    tx: Mutex<Sender<Job>>,
}

impl SerialQueue {
    /// Create a queue and start its worker thread.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to create the worker thread, as `std::thread::spawn` does. Use
    /// `try_new` to handle that failure.
    pub fn new<S: Into<String>>(name: S) -> SerialQueue {
        match SerialQueue::try_new(name) {
            Ok(q) => q,
            Err(e) => panic!("failed to spawn serial queue worker: {}", e),
        }
    }

    /// Create a queue, returning an error if the worker thread can't be started.
    pub fn try_new<S: Into<String>>(name: S) -> io::Result<SerialQueue> {
        let name = name.into();
        let (tx, rx) = channel();

        let worker_name = name.clone();
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(worker_name, rx))?;

        Ok(SerialQueue { name: name, tx: Mutex::new(tx) })
    }

    /// The queue's name, which is also the name of its worker thread.
    pub fn name(&self) -> &str {
        &self.name
    }
}

// Worker loop; ends when every Sender has gone.
fn run(name: String, rx: Receiver<Job>) {
    trace!("serial queue {:?} started", name);

    for job in rx {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            error!("job on serial queue {:?} panicked: {}", name, Error::from_panic(payload));
        }
    }

    trace!("serial queue {:?} drained", name);
}

impl ExecutionContext for SerialQueue {
    fn schedule(&self, job: Job) {
        let tx = self.tx.lock().unwrap_or_else(|e| e.into_inner());

        // Only fails if the worker is gone, which means it panicked outside a job.
        if tx.send(job).is_err() {
            error!("serial queue {:?} has no worker; job dropped", self.name);
        }
    }
}

impl Debug for SerialQueue {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "SerialQueue({:?})", self.name)
    }
}
