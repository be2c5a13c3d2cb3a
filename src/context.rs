use std::sync::Arc;

/// A unit of work handed to an `ExecutionContext`.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A shared handle to an execution context, as carried by every `Future`.
pub type Context = Arc<dyn ExecutionContext>;

/// A trait for running scheduled work.
///
/// Implementations accept a `Job` and run it later, possibly on another thread. Jobs submitted
/// to the same context must be started in submission order; nothing is promised about ordering
/// across different contexts.
///
/// `schedule` must never run the job within the caller's stack frame.
pub trait ExecutionContext: Send + Sync {
    /// Schedule `job` to run.
    fn schedule(&self, job: Job);
}

impl<C: ExecutionContext + ?Sized> ExecutionContext for Arc<C> {
    fn schedule(&self, job: Job) {
        (**self).schedule(job)
    }
}

/// An implementation of `ExecutionContext` that dispatches work onto a `ThreadPool`.
///
/// Jobs are started in FIFO order but run concurrently on the pool's workers.
#[cfg(feature = "threadpool")]
impl ExecutionContext for threadpool::ThreadPool {
    fn schedule(&self, job: Job) {
        self.execute(job)
    }
}

/// Wrap an `ExecutionContext` into a shareable `Context`.
pub fn context<C>(ctx: C) -> Context
    where C: ExecutionContext + 'static
{
    Arc::new(ctx)
}

