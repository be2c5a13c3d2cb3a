// Check out the properties of serial queues
use settle::{context, ExecutionContext, SerialQueue};
use std::mem;
use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;

fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn basic() {
    let q = SerialQueue::new("basic");
    let (tx, rx) = channel();

    q.schedule(Box::new(move || tx.send(123).expect("send")));
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(123));
}

#[test]
fn name() {
    let q = SerialQueue::new("named");
    let (tx, rx) = channel();

    assert_eq!(q.name(), "named");
    assert_eq!(format!("{:?}", q), "SerialQueue(\"named\")");

    q.schedule(Box::new(move || tx.send(thread::current().name().map(String::from)).expect("send")));
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(Some("named".to_string())));
}

#[test]
fn fifo() {
    let q = context(SerialQueue::new("fifo"));
    let (tx, rx) = channel();

    for i in 0..1000 {
        let tx = tx.clone();
        q.schedule(Box::new(move || {
            // uneven job lengths must not reorder anything
            if i % 100 == 0 {
                thread::sleep(Duration::from_millis(1))
            }
            tx.send(i).expect("send")
        }));
    }
    mem::drop(tx);

    let got: Vec<_> = rx.iter().collect();
    assert_eq!(got, (0..1000).collect::<Vec<_>>());
}

#[test]
fn one_at_a_time() {
    let q = SerialQueue::new("serial");
    let (tx, rx) = channel();

    for i in 0..10 {
        let tx = tx.clone();
        q.schedule(Box::new(move || {
            tx.send(("start", i)).expect("send");
            thread::sleep(Duration::from_millis(5));
            tx.send(("end", i)).expect("send");
        }));
    }
    mem::drop(tx);

    let got: Vec<_> = rx.iter().collect();
    let expected: Vec<_> = (0..10).flat_map(|i| vec![("start", i), ("end", i)]).collect();
    assert_eq!(got, expected);
}

#[test]
fn survives_panic() {
    init_log();
    let q = SerialQueue::new("panicky");
    let (tx, rx) = channel();

    q.schedule(Box::new(|| panic!("job failed")));
    q.schedule(Box::new(move || tx.send(()).expect("send")));

    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
}

#[test]
fn drain_on_drop() {
    let q = SerialQueue::new("drain");
    let (tx, rx) = channel();

    for i in 0..5 {
        let tx = tx.clone();
        q.schedule(Box::new(move || {
            thread::sleep(Duration::from_millis(10));
            tx.send(i).expect("send")
        }));
    }
    mem::drop(tx);
    mem::drop(q);

    // jobs already scheduled still run after the queue goes away
    assert_eq!(rx.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn from_many_threads() {
    let q = context(SerialQueue::new("shared"));
    let (tx, rx) = channel();

    let threads: Vec<_> = (0..4).map(|t| {
        let (q, tx) = (q.clone(), tx.clone());
        thread::spawn(move || {
            for i in 0..100 {
                let tx = tx.clone();
                q.schedule(Box::new(move || tx.send((t, i)).expect("send")));
            }
        })
    }).collect();
    mem::drop(tx);

    for t in threads {
        assert!(t.join().is_ok());
    }

    // per-thread submission order is kept
    let got: Vec<(i32, i32)> = rx.iter().collect();
    assert_eq!(got.len(), 400);
    for t in 0..4 {
        let mine: Vec<_> = got.iter().filter(|&&(s, _)| s == t).map(|&(_, i)| i).collect();
        assert_eq!(mine, (0..100).collect::<Vec<_>>());
    }
}
