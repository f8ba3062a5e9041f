use packring::{channel, CapacityError, PushError, RingQueue};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_basic_push_pop() {
    let mut queue = RingQueue::<i32>::new(8).unwrap();

    queue.push(42);
    assert_eq!(queue.pop(), Some(42));
}

#[test]
fn test_fifo_order() {
    let mut queue = RingQueue::<i32>::new(16).unwrap();

    for i in 0..10 {
        queue.push(i);
    }

    for i in 0..10 {
        assert_eq!(queue.pop(), Some(i));
    }
}

#[test]
fn test_full_queue_drops_newest() {
    let mut queue = RingQueue::<i32>::new(4).unwrap();

    for i in 0..5 {
        queue.push(i);
    }

    assert_eq!(queue.len(), 4);
    assert_eq!(queue.drain().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn test_empty_queue() {
    let queue = RingQueue::<i32>::new(4).unwrap();
    assert_eq!(queue.pop(), None);
    assert_eq!(format!("{queue:?}"), "RingQueue { capacity: 4, head: 0, tail: 0 }");
}

#[test]
fn test_capacity() {
    let queue = RingQueue::<i32>::new(1024).unwrap();
    assert_eq!(queue.capacity(), 1024);
}

#[test]
fn test_len_and_empty() {
    let mut queue = RingQueue::<i32>::new(8).unwrap();

    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);

    queue.push(1);
    queue.push(2);

    assert!(!queue.is_empty());
    assert_eq!(queue.len(), 2);
    assert!(!queue.is_full());
}

#[test]
fn test_scenario_capacity_four() {
    let mut queue = RingQueue::new(4).unwrap();

    for v in ["A", "B", "C", "D"] {
        queue.push(v);
    }
    queue.push("E");
    assert!(queue.is_full());

    assert_eq!(queue.pop(), Some("A"));
    queue.push("E");

    assert_eq!(queue.pop(), Some("B"));
    assert_eq!(queue.pop(), Some("C"));
    assert_eq!(queue.pop(), Some("D"));
    assert_eq!(queue.pop(), Some("E"));
    assert_eq!(queue.pop(), None);
}

#[test]
fn test_zero_capacity_rejected() {
    let err = RingQueue::<i32>::new(0).unwrap_err();
    assert_eq!(err, CapacityError::Zero);
    assert_eq!(err.to_string(), "capacity must be greater than 0");
}

#[test]
fn test_non_power_of_2_capacity_rejected() {
    let err = RingQueue::<i32>::new(7).unwrap_err();
    assert_eq!(err, CapacityError::NotPowerOfTwo(7));
    assert_eq!(err.to_string(), "capacity must be a power of 2, got 7");
}

#[test]
fn test_push_error_returns_value() {
    let mut queue = RingQueue::<String>::new(2).unwrap();

    queue.push("first".to_string());
    queue.push("second".to_string());

    match queue.try_push("third".to_string()) {
        Err(PushError::Full(value)) => assert_eq!(value, "third"),
        other => panic!("expected PushError::Full, got {other:?}"),
    }
}

#[test]
fn test_drop_elements() {
    static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct DropCounter;

    impl Drop for DropCounter {
        fn drop(&mut self) {
            DROP_COUNT.fetch_add(1, Ordering::Relaxed);
        }
    }

    {
        let mut queue = RingQueue::<DropCounter>::new(8).unwrap();
        for _ in 0..5 {
            queue.push(DropCounter);
        }
        drop(queue.pop());
        assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 1);
    }

    assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 5);
}

#[test]
fn test_alternating_push_pop() {
    let mut queue = RingQueue::<i32>::new(4).unwrap();

    for i in 0..100 {
        queue.push(i);
        assert_eq!(queue.pop(), Some(i));
    }
}

#[test]
fn test_wrap_around() {
    let mut queue = RingQueue::<usize>::new(8).unwrap();

    for round in 0..10 {
        for i in 0..8 {
            queue.push(round * 100 + i);
        }
        for i in 0..8 {
            assert_eq!(queue.pop(), Some(round * 100 + i));
        }
    }
}

#[test]
fn test_spsc_threaded() {
    let (mut tx, rx) = channel::<usize>(128).unwrap();

    let producer = thread::spawn(move || {
        let mut i = 0;
        while i < 1000 {
            if tx.try_push(i).is_ok() {
                i += 1;
            } else {
                std::hint::spin_loop();
            }
        }
    });

    let consumer = thread::spawn(move || {
        for i in 0..1000 {
            let val = loop {
                if let Some(v) = rx.pop() {
                    break v;
                }
                std::hint::spin_loop();
            };
            assert_eq!(val, i);
        }
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}

#[test]
fn test_spmc_threaded() {
    const CONSUMERS: usize = 4;
    const TOTAL_MESSAGES: usize = 1000;

    let (mut tx, rx) = channel::<usize>(512).unwrap();
    let mut handles = vec![];

    handles.push(thread::spawn(move || {
        let mut i = 0;
        while i < TOTAL_MESSAGES {
            match tx.try_push(i) {
                Ok(()) => i += 1,
                Err(_) => std::hint::spin_loop(),
            }
        }
    }));

    let consumed_count = Arc::new(AtomicUsize::new(0));
    for _ in 0..CONSUMERS {
        let rx = rx.clone();
        let count = consumed_count.clone();
        handles.push(thread::spawn(move || loop {
            match rx.pop() {
                Some(_) => {
                    count.fetch_add(1, Ordering::Relaxed);
                }
                None => {
                    if count.load(Ordering::Relaxed) >= TOTAL_MESSAGES {
                        break;
                    }
                    std::hint::spin_loop();
                }
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(consumed_count.load(Ordering::Relaxed), TOTAL_MESSAGES);
}

/// One producer pushes `0..N` with pauses so nothing is dropped, several
/// consumers pop until all `N` are seen. Every value must arrive exactly once
/// and each consumer must see its own values in increasing order.
#[test]
fn test_stress_exactly_once() {
    const N: usize = 20_000;
    const CONSUMERS: usize = 4;

    let (mut tx, rx) = channel::<usize>(64).unwrap();
    let received = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::with_capacity(N)));

    let mut consumers = vec![];
    for _ in 0..CONSUMERS {
        let rx = rx.clone();
        let received = received.clone();
        let seen = seen.clone();
        consumers.push(thread::spawn(move || {
            let mut local = Vec::new();
            while received.load(Ordering::Acquire) < N {
                match rx.pop() {
                    Some(v) => {
                        local.push(v);
                        received.fetch_add(1, Ordering::AcqRel);
                    }
                    None => thread::yield_now(),
                }
            }
            assert!(local.windows(2).all(|w| w[0] < w[1]));
            seen.lock().unwrap().extend(local);
        }));
    }

    let producer = thread::spawn(move || {
        for i in 0..N {
            while tx.is_full() {
                thread::yield_now();
            }
            // Only this thread pushes and the queue was not full, so the
            // push either lands or hits a slot a consumer is still reading.
            let mut value = i;
            while let Err(err) = tx.try_push(value) {
                value = err.into_inner();
                thread::yield_now();
            }
            if i % 4096 == 0 {
                thread::sleep(Duration::from_micros(50));
            }
        }
    });

    producer.join().unwrap();
    for c in consumers {
        c.join().unwrap();
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), N);
    let unique: HashSet<_> = seen.iter().copied().collect();
    assert_eq!(unique.len(), N);
    assert!((0..N).all(|i| unique.contains(&i)));
}

#[test]
fn test_stress_rapid_push_pop() {
    let (mut tx, rx) = channel::<usize>(64).unwrap();

    let producer = thread::spawn(move || {
        let mut pushed = 0;
        for i in 0..10_000 {
            if tx.try_push(i).is_ok() {
                pushed += 1;
            }
        }
        pushed
    });

    let consumer_rx = rx.clone();
    let consumer = thread::spawn(move || {
        let mut last = None;
        let mut popped = 0;
        for _ in 0..50_000 {
            if let Some(v) = consumer_rx.pop() {
                assert!(last.map_or(true, |l| l < v), "out of order: {last:?} then {v}");
                last = Some(v);
                popped += 1;
            }
        }
        popped
    });

    let pushed = producer.join().unwrap();
    let popped = consumer.join().unwrap();
    let remaining = rx.drain().count();

    assert_eq!(pushed, popped + remaining);
}
