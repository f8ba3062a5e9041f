use packring::channel;
use std::thread;
use std::time::{Duration, Instant};

const MESSAGES: usize = 1_000_000;
const BUFFER_SIZE: usize = 1024;

fn report(label: &str, elapsed: Duration) {
    let throughput = MESSAGES as f64 / elapsed.as_secs_f64();
    println!("{} ({} messages):", label, MESSAGES);
    println!("  Time: {:?}", elapsed);
    println!("  Throughput: {:.2} msgs/sec", throughput);
    println!("  Latency: {:.0} ns/op\n", elapsed.as_nanos() as f64 / MESSAGES as f64);
}

fn main() {
    println!("packring Performance Test");
    println!("==============================\n");

    let start = Instant::now();
    test_1p_1c();
    report("1 Producer, 1 Consumer", start.elapsed());

    let start = Instant::now();
    test_1p_4c();
    report("1 Producer, 4 Consumers", start.elapsed());

    let start = Instant::now();
    let dropped = test_drop_on_full();
    report("1 Producer, 1 Consumer, no retry", start.elapsed());
    println!(
        "  Dropped: {} ({:.2}%)",
        dropped,
        dropped as f64 * 100.0 / MESSAGES as f64
    );
}

fn test_1p_1c() {
    let (mut tx, rx) = channel::<usize>(BUFFER_SIZE).unwrap();

    let producer = thread::spawn(move || {
        let mut i = 0;
        while i < MESSAGES {
            if tx.try_push(i).is_ok() {
                i += 1;
            } else {
                std::hint::spin_loop();
            }
        }
    });

    let consumer = thread::spawn(move || {
        for _ in 0..MESSAGES {
            while rx.pop().is_none() {
                std::hint::spin_loop();
            }
        }
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}

fn test_1p_4c() {
    const CONSUMERS: usize = 4;
    const MSGS_PER_CONSUMER: usize = MESSAGES / CONSUMERS;

    let (mut tx, rx) = channel::<usize>(BUFFER_SIZE).unwrap();
    let mut handles = vec![];

    handles.push(thread::spawn(move || {
        let mut i = 0;
        while i < MESSAGES {
            if tx.try_push(i).is_ok() {
                i += 1;
            } else {
                std::hint::spin_loop();
            }
        }
    }));

    for _ in 0..CONSUMERS {
        let rx = rx.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..MSGS_PER_CONSUMER {
                while rx.pop().is_none() {
                    std::hint::spin_loop();
                }
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }
}

/// Producer never retries; returns how many pushes were dropped.
fn test_drop_on_full() -> usize {
    let (mut tx, rx) = channel::<usize>(BUFFER_SIZE).unwrap();
    let counter = rx.clone();

    let producer = thread::spawn(move || {
        (0..MESSAGES).filter(|&i| tx.try_push(i).is_err()).count()
    });

    let consumer = thread::spawn(move || {
        let mut received = 0;
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            match rx.pop() {
                Some(_) => received += 1,
                None if received > 0 && rx.is_empty() => {
                    thread::sleep(Duration::from_millis(1));
                    if rx.is_empty() {
                        break;
                    }
                }
                None => std::hint::spin_loop(),
            }
        }
        received
    });

    let dropped = producer.join().unwrap();
    let received = consumer.join().unwrap() + counter.drain().count();
    assert_eq!(dropped + received, MESSAGES);
    dropped
}
