//! Identity and raw-invoke operations are never intercepted.

mod common;

use common::Calculator;
use interpose::surface::{IDENTITY, RAW_INVOKE};
use interpose::{args, catch, op, proxy, track, InvokeError, Invoker, Object, Value};
use std::sync::{Arc, Mutex};

#[test]
fn test_surface_excludes_reserved_names() {
    let wrapped = proxy(Calculator::default());
    let names: Vec<_> = wrapped.surface().names().collect();
    assert_eq!(names, vec!["add", "sub", "store", "recall", "each"]);
}

#[test]
fn test_identity_is_answered_by_the_wrapper() {
    let mut wrapped = proxy(Calculator::default());
    let id = wrapped.invoke(IDENTITY, args![]).expect("identity");
    assert_eq!(id, Value::from(wrapped.id()));
    // The target's own identity accessor is never reached.
    assert!(wrapped.wrapped().received.is_empty());
}

#[test]
fn test_identity_is_not_tracked() {
    let calls = Arc::new(Mutex::new(0));
    let mut tracker = track(Calculator::default());
    let seen = Arc::clone(&calls);
    tracker.before_call(move |_, _| {
        *seen.lock().expect("lock") += 1;
        Ok(())
    });

    tracker.invoke(IDENTITY, args![]).expect("identity");
    assert_eq!(*calls.lock().expect("lock"), 0);
}

#[test]
fn test_identity_is_not_caught() {
    let mut caught = catch(Calculator::default());
    caught.method_call(|_, _, _| Ok(Value::from("caught")));
    let id = caught.invoke(IDENTITY, args![]).expect("identity");
    assert_eq!(id, Value::from(caught.id()));
}

#[test]
fn test_raw_invoke_dispatches_through_interception() {
    let mut wrapped = proxy(Calculator::default());
    wrapped
        .after("add", |v| Ok(Value::Int(v.as_int().unwrap_or(0) * 2)))
        .expect("register");

    let result = wrapped.invoke(RAW_INVOKE, args!["add", 2, 3]).expect("send");
    assert_eq!(result, Value::Int(10));
}

#[test]
fn test_raw_invoke_without_name_fails() {
    let mut wrapped = catch(Calculator::default());
    assert!(matches!(
        wrapped.invoke(RAW_INVOKE, args![]),
        Err(InvokeError::Arity { expected: 1, got: 0, .. })
    ));
}

#[test]
fn test_constructor_is_not_callable() {
    let mut wrapped = proxy(Calculator::default());
    assert!(matches!(
        wrapped.invoke("initialize", args![]),
        Err(InvokeError::NoSuchOperation { .. })
    ));
}

#[test]
fn test_surface_is_fixed_at_construction() {
    let object = Object::builder("Late")
        .method("early", |_, _| Ok(Value::from("early")))
        .build();
    let mut late_proxy_target = Object::builder("Late")
        .method("early", |_, _| Ok(Value::from("early")))
        .build();
    late_proxy_target
        .define_method("late", |_, _| Ok(Value::from("late")))
        .expect("define");

    let mut wrapped = proxy(object);
    wrapped
        .wrapped_mut()
        .define_method("late", |_, _| Ok(Value::from("late")))
        .expect("define");
    assert!(matches!(
        wrapped.invoke("late", args![]),
        Err(InvokeError::NoSuchOperation { .. })
    ));

    // A wrapper built after the method was added sees it.
    let mut fresh = op::proxy(late_proxy_target);
    assert_eq!(fresh.invoke("late", args![]).expect("late"), Value::from("late"));

    let mut object = wrapped.into_inner();
    assert_eq!(object.invoke("late", args![]).expect("direct"), Value::from("late"));
}
