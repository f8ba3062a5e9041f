//! One dispatcher fans jobs out to several workers; each worker reports back
//! on its own result queue.

use packring::{channel, trace, Producer};
use std::thread;
use std::time::Duration;

const NUM_WORKERS: usize = 4;
const NUM_JOBS: usize = 20;

fn push_retry(queue: &mut Producer<String>, value: String) {
    let mut pending = value;
    while let Err(err) = queue.try_push(pending) {
        pending = err.into_inner();
        std::hint::spin_loop();
    }
}

fn main() {
    trace::init_tracing();
    println!("Work Queue Example\n");

    let (mut jobs_tx, jobs_rx) = channel::<String>(128).unwrap();

    let producer = thread::spawn(move || {
        for i in 0..NUM_JOBS {
            let job = format!("Job-{:02}", i);
            println!("Enqueued: {}", job);
            push_retry(&mut jobs_tx, job);
            thread::sleep(Duration::from_millis(50));
        }
        println!("All jobs enqueued!");
    });

    // Each worker is the single producer of its own result queue.
    let mut workers = vec![];
    let mut result_queues = vec![];
    for worker_id in 0..NUM_WORKERS {
        let jobs_rx = jobs_rx.clone();
        let (mut results_tx, results_rx) = channel::<String>(32).unwrap();
        result_queues.push(results_rx);

        workers.push(thread::spawn(move || {
            let mut processed = 0;
            let mut idle_rounds = 0;
            loop {
                match jobs_rx.pop() {
                    Some(job) => {
                        idle_rounds = 0;
                        println!("Worker {} processing: {}", worker_id, job);
                        thread::sleep(Duration::from_millis(200));

                        let result = format!("{} -> completed by worker {}", job, worker_id);
                        push_retry(&mut results_tx, result);
                        processed += 1;
                    }
                    None => {
                        idle_rounds += 1;
                        if idle_rounds > 100 {
                            break;
                        }
                        thread::sleep(Duration::from_millis(10));
                    }
                }
            }
            println!("Worker {} finished ({} jobs)", worker_id, processed);
        }));
    }

    producer.join().unwrap();
    for worker in workers {
        worker.join().unwrap();
    }

    let mut collected = 0;
    for results in &result_queues {
        for result in results.drain() {
            println!("Result: {}", result);
            collected += 1;
        }
    }
    assert_eq!(collected, NUM_JOBS);

    println!("\nWork queue example completed!");
}
