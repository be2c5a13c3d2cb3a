//! Process-wide defaults.
//!
//! Freshly constructed `Future`s (`Future::pending`, `Future::value`, `Future::error`, `flatten`)
//! are bound to the default execution context. It is set once, explicitly, with `init`:
//!
//! ```
//! # use settle::{config, context, SerialQueue};
//! let ui = context(SerialQueue::new("ui"));
//! let _ = config::init(config::Config::new().default_context(ui));
//! ```
//!
//! If `init` is never called, the first use installs `Config::default()`, whose default context
//! is a `SerialQueue` named `"main"`.

use once_cell::sync::OnceCell;

use crate::context::{Context, context};
use crate::error::{Error, FutureError};
use crate::queue::SerialQueue;

const DEFAULT_QUEUE: &'static str = "main";

static DEFAULTS: OnceCell<Defaults> = OnceCell::new();

struct Defaults {
    context: Context,
}

/// Process-wide configuration, built up and then passed to `init`.
pub struct Config {
    default_context: Option<Context>,
    queue_name: String,
}

impl Config {
    pub fn new() -> Config {
        Config {
            default_context: None,
            queue_name: DEFAULT_QUEUE.to_string(),
        }
    }

    /// Use `ctx` as the default context.
    pub fn default_context(mut self, ctx: Context) -> Config {
        self.default_context = Some(ctx);
        self
    }

    /// Name of the `SerialQueue` created when no default context is given.
    pub fn queue_name<S: Into<String>>(mut self, name: S) -> Config {
        self.queue_name = name.into();
        self
    }

    fn build(self) -> Defaults {
        let context = match self.default_context {
            Some(ctx) => ctx,
            None => context(SerialQueue::new(self.queue_name)),
        };

        Defaults { context: context }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

/// Install the process-wide configuration.
///
/// Returns `FutureError::AlreadyInitialized` if a configuration is already in place, either from
/// an earlier `init` or because a default was already needed.
pub fn init(config: Config) -> Result<(), Error> {
    let mut fresh = false;

    DEFAULTS.get_or_init(|| {
        fresh = true;
        config.build()
    });

    if fresh {
        info!("configured default execution context");
        Ok(())
    } else {
        Err(FutureError::AlreadyInitialized.into())
    }
}

/// The default execution context.
pub fn default_context() -> Context {
    DEFAULTS.get_or_init(|| {
            debug!("no configuration installed; using serial queue {:?}", DEFAULT_QUEUE);
            Config::default().build()
        })
        .context
        .clone()
}
