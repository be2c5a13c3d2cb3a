use std::mem;

use crate::context::Context;
use crate::error::Error;

pub type Thunk<P> = Box<dyn FnOnce(P) + Send + 'static>;

// A registered reaction to a settlement, bound to the context it runs on.
pub struct Waiter<T> {
    pub callback: Thunk<Result<T, Error>>,
    pub context: Context,
}

impl<T: Clone + Send + 'static> Waiter<T> {
    // Schedule the reaction with a copy of `outcome`. Never runs it inline.
    pub fn fire(self, outcome: &Result<T, Error>) {
        let Waiter { callback, context } = self;
        let outcome = outcome.clone();

        context.schedule(Box::new(move || callback(outcome)))
    }
}

pub enum State<T> {
    Pending(Vec<Waiter<T>>),    // not settled; waiters in registration order
    Fulfilled(T),
    Rejected(Error),
}

impl<T: Clone> State<T> {
    pub fn new() -> State<T> { State::Pending(Vec::new()) }

    pub fn is_pending(&self) -> bool {
        if let &State::Pending(_) = self { true } else { false }
    }

    pub fn outcome(&self) -> Option<Result<T, Error>> {
        match self {
            &State::Pending(_) => None,
            &State::Fulfilled(ref v) => Some(Ok(v.clone())),
            &State::Rejected(ref e) => Some(Err(e.clone())),
        }
    }

    // Move to the settled state for `outcome`, returning the waiters to fire. Returns `None`
    // if already settled, leaving the state untouched.
    pub fn settle(&mut self, outcome: &Result<T, Error>) -> Option<Vec<Waiter<T>>> {
        if !self.is_pending() {
            return None;
        }

        let settled = match outcome {
            &Ok(ref v) => State::Fulfilled(v.clone()),
            &Err(ref e) => State::Rejected(e.clone()),
        };

        match mem::replace(self, settled) {
            State::Pending(waiters) => Some(waiters),
            _ => None,
        }
    }

    pub fn waiter_count(&self) -> usize {
        match self {
            &State::Pending(ref w) => w.len(),
            _ => 0,
        }
    }
}
