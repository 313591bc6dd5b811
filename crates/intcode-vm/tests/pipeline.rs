//! Two VMs on separate threads connected by blocking queues.

#![cfg(feature = "multithread")]

use intcode_vm::{spawn, BlockingQueue, Vm, VmError};

/// Reads one value, outputs it plus one, halts.
fn increment() -> Vec<i64> {
    // in 0; add 0 #1 0; out 0; halt
    vec![3, 0, 1001, 0, 1, 0, 4, 0, 99]
}

#[test]
fn test_producer_feeds_consumer() {
    let source = BlockingQueue::with_values([41]);
    let link = BlockingQueue::new();
    let sink = BlockingQueue::new();

    let consumer = spawn(Vm::new(&increment()), link.clone(), sink.clone());
    let producer = spawn(Vm::new(&increment()), source, link);

    producer.join().unwrap().unwrap();
    consumer.join().unwrap().unwrap();
    assert_eq!(sink.drain(), vec![43]);
    assert!(sink.is_closed());
}

#[test]
fn test_consumer_sees_end_of_stream() {
    let source = BlockingQueue::with_values([]);
    source.close();
    let link = BlockingQueue::new();
    let sink = BlockingQueue::new();

    let producer = spawn(Vm::new(&[104, 5, 99]), source, link.clone());
    // Wants two values, producer only ever sends one.
    let consumer = spawn(Vm::new(&[3, 0, 3, 1, 99]), link, sink);

    producer.join().unwrap().unwrap();
    match consumer.join().unwrap() {
        Err(VmError::InputExhausted { ip: 2 }) => {}
        other => panic!("expected input exhaustion, got {:?}", other.map(|vm| vm.ip())),
    }
}

#[test]
fn test_queue_feedback_loop() {
    // Program doubles its input until it reaches 100, echoing each value.
    // in 20; out 20; mul 20 #2 20; setlt 20 #100 21; jnz 21 #2; halt
    let doubler = vec![3, 20, 4, 20, 1002, 20, 2, 20, 1007, 20, 100, 21, 1005, 21, 2, 99];
    let input = BlockingQueue::with_values([3]);
    let output = BlockingQueue::new();
    let vm = spawn(Vm::new(&doubler), input, output.clone())
        .join()
        .unwrap()
        .unwrap();
    assert_eq!(output.drain(), vec![3, 6, 12, 24, 48, 96]);
    assert_eq!(vm.memory().get(20), Some(192));
}
