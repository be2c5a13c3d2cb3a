// Explicit configuration installed before anything needs a default context.
use settle::config::{self, Config};
use settle::{context, flatten, Future, FutureError, SerialQueue};
use std::thread;
use std::time::Duration;

fn thread_name() -> Option<String> {
    thread::current().name().map(String::from)
}

fn settled<T: Clone + Send + 'static>(fut: &Future<T>) -> T {
    match fut.wait_timeout(Duration::from_secs(5)) {
        Some(Ok(v)) => v,
        Some(Err(e)) => panic!("rejected: {}", e),
        None => panic!("timed out"),
    }
}

// One test only: the configuration is per process.
#[test]
fn init_binds_fresh_futures() {
    let _ = env_logger::builder().is_test(true).try_init();
    let ui = context(SerialQueue::new("configured"));

    assert!(config::init(Config::new().default_context(ui)).is_ok());

    let pending = Future::pending();
    let mapped = pending.map(|v: i32| (v, thread_name()));
    pending.fulfill(1);
    assert_eq!(settled(&mapped), (1, Some("configured".to_string())));

    let value = Future::value(2).map(|v| (v, thread_name()));
    assert_eq!(settled(&value), (2, Some("configured".to_string())));

    let all = flatten(vec![Future::value(3), Future::value(4)]).map(|v| (v, thread_name()));
    assert_eq!(settled(&all), (vec![3, 4], Some("configured".to_string())));

    match config::init(Config::new().queue_name("again")) {
        Err(e) => assert_eq!(e.downcast_ref::<FutureError>(), Some(&FutureError::AlreadyInitialized)),
        Ok(()) => panic!("second configuration accepted"),
    }
    let still = Future::value(()).map(|_| thread_name());
    assert_eq!(settled(&still), Some("configured".to_string()));
}
