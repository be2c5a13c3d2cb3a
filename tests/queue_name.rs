// A configured queue name is used for the lazily created default queue.
use settle::config::{self, Config};
use settle::Future;
use std::thread;
use std::time::Duration;

#[test]
fn init_names_default_queue() {
    assert!(config::init(Config::new().queue_name("renamed")).is_ok());

    let fut = Future::value(()).map(|_| thread::current().name().map(String::from));

    match fut.wait_timeout(Duration::from_secs(5)) {
        Some(Ok(name)) => assert_eq!(name, Some("renamed".to_string())),
        other => panic!("unexpected {:?}", other),
    }
}
