use std::any::Any;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Failures raised by the future machinery itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FutureError {
    /// A transform, work closure or callback panicked; the payload message is kept if there was
    /// one.
    #[error("callback panicked: {0}")]
    Panicked(String),

    /// A `Promise` was dropped without settling its `Future`.
    #[error("promise dropped without settling its future")]
    Abandoned,

    /// `config::init` was called more than once.
    #[error("default configuration already initialized")]
    AlreadyInitialized,
}

/// The failure carried by a rejected `Future`.
///
/// An `Error` wraps any `std::error::Error` and is cheap to clone, since a single rejection is
/// delivered to every waiter on the `Future`. The wrapped error can be recovered with
/// `downcast_ref` to match on its concrete type.
///
/// ```
/// # use settle::{Error, FutureError};
/// let err = Error::from(FutureError::Abandoned);
/// assert!(err.is::<FutureError>());
/// assert_eq!(err.downcast_ref::<FutureError>(), Some(&FutureError::Abandoned));
/// ```
#[derive(Clone)]
pub struct Error(Arc<dyn StdError + Send + Sync + 'static>);

impl Error {
    pub fn new<E>(err: E) -> Error
        where E: StdError + Send + Sync + 'static
    {
        Error(Arc::new(err))
    }

    /// Convert a panic payload, as returned by `catch_unwind`, into an `Error`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Error {
        let msg = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };

        Error::new(FutureError::Panicked(msg))
    }

    /// Return true if the wrapped error is an `E`.
    pub fn is<E>(&self) -> bool
        where E: StdError + 'static
    {
        self.0.is::<E>()
    }

    /// Borrow the wrapped error as an `E`, if that is its concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
        where E: StdError + 'static
    {
        self.0.downcast_ref::<E>()
    }

    /// Return true if both handles refer to the same underlying error value.
    pub fn ptr_eq(&self, other: &Error) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<E> From<E> for Error
    where E: StdError + Send + Sync + 'static
{
    fn from(err: E) -> Error {
        Error::new(err)
    }
}

impl AsRef<dyn StdError + Send + Sync + 'static> for Error {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&*self.0, f)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Error({:?})", &*self.0)
    }
}

// Run a user-supplied closure at a combinator boundary, turning a panic into an `Error`.
pub(crate) fn catch_panic<F, R>(what: &str, f: F) -> Result<R, Error>
    where F: FnOnce() -> R
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let err = Error::from_panic(payload);
        warn!("{} panicked: {}", what, err);
        err
    })
}
