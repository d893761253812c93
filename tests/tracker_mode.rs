//! Tracker mode: generic before_call/after_call observers.

mod common;

use common::Calculator;
use interpose::{args, track, Block, InvokeError, Invoker, TrackerClass, Value};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn observed() -> (interpose::Tracker<Calculator>, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let mut tracker = track(Calculator::default());

    let before = Arc::clone(&log);
    tracker.before_call(move |op, args| {
        before
            .lock()
            .expect("lock")
            .push(format!("before {op} {:?} block={}", args.values, args.block.is_some()));
        Ok(())
    });
    let after = Arc::clone(&log);
    tracker.after_call(move |op, result| {
        after.lock().expect("lock").push(format!("after {op} {result}"));
        Ok(())
    });
    (tracker, log)
}

#[test]
fn test_hooks_fire_once_in_order() {
    let (mut tracker, log) = observed();

    tracker.invoke("add", args![1, 2]).expect("add");
    tracker.invoke("recall", args![]).expect("recall");

    assert_eq!(
        *log.lock().expect("lock"),
        vec![
            "before add [Int(1), Int(2)] block=false",
            "after add 3",
            "before recall [] block=false",
            "after recall 0",
        ]
    );
}

#[test]
fn test_block_reaches_hook_and_target() {
    let (mut tracker, log) = observed();
    let double = Block::new(|values| Ok(Value::Int(values[0].as_int().unwrap_or(0) * 2)));

    let result = tracker
        .invoke("each", args![vec![1, 2]].with_block(double))
        .expect("each");

    assert_eq!(result, Value::from(vec![2, 4]));
    assert_eq!(
        *log.lock().expect("lock"),
        vec![
            "before each [List([Int(1), Int(2)])] block=true",
            "after each [2, 4]",
        ]
    );
}

#[test]
fn test_result_is_never_altered() {
    let mut tracker = track(Calculator::default());
    tracker.before_call(|_, _| Ok(()));
    tracker.after_call(|_, _| Ok(()));
    assert_eq!(tracker.invoke("add", args![20, 22]).expect("add"), Value::Int(42));
    assert_eq!(tracker.wrapped().received.len(), 1);
}

#[test]
fn test_after_call_skipped_when_target_fails() {
    let (mut tracker, log) = observed();
    let err = tracker.invoke("add", args![1]).unwrap_err();
    assert!(matches!(err, InvokeError::Arity { .. }));
    assert_eq!(
        *log.lock().expect("lock"),
        vec!["before add [Int(1)] block=false"]
    );
}

#[test]
fn test_before_call_error_aborts_call() {
    let mut tracker = track(Calculator::default());
    tracker.before_call(|op, _| Err(InvokeError::failed(format!("{op} denied"))));
    let err = tracker.invoke("store", args![9]).unwrap_err();
    assert_eq!(err.to_string(), "store denied");
    assert_eq!(tracker.wrapped().memory, 0);
}

#[test]
fn test_tracker_class_instances_are_isolated() {
    let class = TrackerClass::<Calculator>::new();
    let count = Arc::new(Mutex::new(0));

    let mut counted = class.construct();
    let seen = Arc::clone(&count);
    counted.after_call(move |_, _| {
        *seen.lock().expect("lock") += 1;
        Ok(())
    });
    let mut silent = class.construct();

    counted.invoke("recall", args![]).expect("recall");
    silent.invoke("recall", args![]).expect("recall");
    assert_eq!(*count.lock().expect("lock"), 1);
}
