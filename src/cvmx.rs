use std::sync::{Mutex, MutexGuard, Condvar};
use std::time::Duration;

// A Condvar and its Mutex.
//
// No user code ever runs with the lock held, so a poisoned lock still guards consistent state
// and is simply recovered.
pub struct CvMx<T> {
    cv: Condvar,
    mx: Mutex<T>,
}

impl<T> CvMx<T> {
    pub fn new(v: T) -> CvMx<T> {
        CvMx {
            cv: Condvar::new(),
            mx: Mutex::new(v),
        }
    }

    pub fn lock(&self) -> MutexGuard<T> {
        self.mx.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn notify_all(&self) {
        self.cv.notify_all()
    }

    pub fn wait<'a>(&self, lk: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        self.cv.wait(lk).unwrap_or_else(|e| e.into_inner())
    }

    pub fn wait_timeout<'a>(&self, lk: MutexGuard<'a, T>, timeout: Duration) -> MutexGuard<'a, T> {
        match self.cv.wait_timeout(lk, timeout) {
            Ok((lk, _)) => lk,
            Err(e) => e.into_inner().0,
        }
    }
}
