//! Simple usage example

use packring::{channel, trace};
use std::thread;
use std::time::Duration;

fn main() {
    trace::init_tracing();
    println!("packring - Simple Example\n");

    // A queue with 16 slots, split into its producer and a consumer
    let (mut producer_queue, consumer_queue) = channel::<String>(16).unwrap();

    // Producer thread
    let producer = thread::spawn(move || {
        for i in 0..10 {
            let message = format!("Message {}", i);
            println!("Sending: {}", message);

            // A full queue would drop the message; hand it back and retry.
            let mut pending = message;
            while let Err(err) = producer_queue.try_push(pending) {
                pending = err.into_inner();
                std::hint::spin_loop();
            }

            // Small delay to make output readable
            thread::sleep(Duration::from_millis(100));
        }
        println!("Producer finished!");
    });

    // Consumer thread
    let consumer = thread::spawn(move || {
        for _ in 0..10 {
            loop {
                match consumer_queue.pop() {
                    Some(message) => {
                        println!("Received: {}", message);
                        break;
                    }
                    // Queue is empty, spin and retry
                    None => std::hint::spin_loop(),
                }
            }
        }
        println!("Consumer finished!");
    });

    producer.join().unwrap();
    consumer.join().unwrap();

    println!("\nExample completed successfully!");
}
