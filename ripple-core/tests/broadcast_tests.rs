// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use ripple_core::{
    set_notify_mode, Consumer, ConsumerId, EvaluationContext, NotifyMode, ReactiveConfig,
    RippleError, Subject,
};
use ripple_test_utils::{ReactionLog, RecordingConsumer};
use std::io;

fn synchronous() -> EvaluationContext {
    EvaluationContext::with_config(ReactiveConfig::new().with_mode(NotifyMode::Synchronous))
}

#[test]
fn broadcast_without_subscribers_is_ok() {
    let subject = Subject::new();
    subject.broadcast().unwrap();
    subject.broadcast_in(&synchronous()).unwrap();
}

#[test]
fn batched_mode_keeps_subscription_order() {
    let log = ReactionLog::new();
    let c2 = RecordingConsumer::with_id(&log, ConsumerId::from_raw(5));
    let c1 = RecordingConsumer::with_id(&log, ConsumerId::from_raw(2));
    let subject = Subject::new();
    subject.add_subscriber(c2.handle());
    subject.add_subscriber(c1.handle());

    subject.broadcast_in(&EvaluationContext::new()).unwrap();

    assert_eq!(log.ids(), vec![c2.id(), c1.id()]);
}

#[cfg(feature = "diagnostics")]
#[test]
fn synchronous_mode_notifies_in_creation_order() {
    let log = ReactionLog::new();
    let c2 = RecordingConsumer::with_id(&log, ConsumerId::from_raw(5));
    let c1 = RecordingConsumer::with_id(&log, ConsumerId::from_raw(2));
    let subject = Subject::new();
    subject.add_subscriber(c2.handle());
    subject.add_subscriber(c1.handle());

    subject.broadcast_in(&synchronous()).unwrap();

    assert_eq!(log.ids(), vec![c1.id(), c2.id()]);
    // the sort applies to the snapshot only
    assert_eq!(subject.subscribers()[0].id(), c2.id());
}

#[cfg(feature = "diagnostics")]
#[test]
fn synchronous_mode_keeps_duplicates_adjacent() {
    let log = ReactionLog::new();
    let late = RecordingConsumer::with_id(&log, ConsumerId::from_raw(40));
    let early = RecordingConsumer::with_id(&log, ConsumerId::from_raw(10));
    let subject = Subject::new();
    subject.add_subscriber(late.handle());
    subject.add_subscriber(early.handle());
    subject.add_subscriber(late.handle());

    subject.broadcast_in(&synchronous()).unwrap();

    assert_eq!(log.ids(), vec![early.id(), late.id(), late.id()]);
}

#[cfg(feature = "diagnostics")]
#[test]
fn thread_context_mode_is_read_at_broadcast_time() {
    let log = ReactionLog::new();
    let c2 = RecordingConsumer::with_id(&log, ConsumerId::from_raw(9));
    let c1 = RecordingConsumer::with_id(&log, ConsumerId::from_raw(1));
    let subject = Subject::new();
    subject.add_subscriber(c2.handle());
    subject.add_subscriber(c1.handle());

    subject.broadcast().unwrap();
    set_notify_mode(NotifyMode::Synchronous);
    subject.broadcast().unwrap();
    set_notify_mode(NotifyMode::Batched);

    assert_eq!(log.ids(), vec![c2.id(), c1.id(), c1.id(), c2.id()]);
}

#[test]
fn duplicate_subscription_reacts_twice() {
    let log = ReactionLog::new();
    let c = RecordingConsumer::new(&log);
    let subject = Subject::new();
    subject.add_subscriber(c.handle());
    subject.add_subscriber(c.handle());

    subject.broadcast().unwrap();

    assert_eq!(log.count_of(c.id()), 2);
}

#[test]
fn removal_during_broadcast_still_notifies_the_snapshot() {
    let log = ReactionLog::new();
    let c1 = RecordingConsumer::new(&log);
    let c2 = RecordingConsumer::new(&log);
    let subject = Subject::new();
    subject.add_subscriber(c1.handle());
    subject.add_subscriber(c2.handle());

    let target = subject.clone();
    let victim = c2.handle();
    c1.on_react(move || {
        target.remove_subscriber(&victim);
        Ok(())
    });

    subject.broadcast_in(&synchronous()).unwrap();

    assert_eq!(log.ids(), vec![c1.id(), c2.id()]);
    assert!(!subject.has_subscriber(&c2.handle()));

    log.clear();
    subject.broadcast().unwrap();
    assert_eq!(log.ids(), vec![c1.id()]);
}

#[test]
fn subscription_added_during_broadcast_waits_for_the_next_one() {
    let log = ReactionLog::new();
    let c1 = RecordingConsumer::new(&log);
    let newcomer = RecordingConsumer::new(&log);
    let subject = Subject::new();
    subject.add_subscriber(c1.handle());

    let target = subject.clone();
    let joining = newcomer.handle();
    c1.on_react(move || {
        target.add_subscriber(joining.clone());
        Ok(())
    });

    subject.broadcast().unwrap();
    assert_eq!(log.ids(), vec![c1.id()]);
    assert_eq!(subject.subscriber_count(), 2);

    log.clear();
    subject.broadcast().unwrap();
    assert_eq!(log.count_of(newcomer.id()), 1);
}

#[test]
fn self_removal_during_broadcast() {
    let log = ReactionLog::new();
    let c = RecordingConsumer::new(&log);
    let subject = Subject::new();
    subject.add_subscriber(c.handle());

    let target = subject.clone();
    let me = c.handle();
    c.on_react(move || {
        target.remove_subscriber(&me);
        Ok(())
    });

    subject.broadcast().unwrap();
    subject.broadcast().unwrap();

    assert_eq!(log.count_of(c.id()), 1);
    assert!(!subject.is_observed());
}

#[test]
fn nested_broadcast_from_a_reaction() {
    let log = ReactionLog::new();
    let upstream_consumer = RecordingConsumer::new(&log);
    let downstream_consumer = RecordingConsumer::new(&log);
    let upstream = Subject::new();
    let downstream = Subject::new();
    upstream.add_subscriber(upstream_consumer.handle());
    downstream.add_subscriber(downstream_consumer.handle());

    let forward = downstream.clone();
    upstream_consumer.on_react(move || forward.broadcast());

    upstream.broadcast().unwrap();

    assert_eq!(log.ids(), vec![upstream_consumer.id(), downstream_consumer.id()]);
}

#[test]
fn failing_reaction_stops_the_broadcast() {
    let log = ReactionLog::new();
    let first = RecordingConsumer::new(&log);
    let failing = RecordingConsumer::new(&log);
    let skipped = RecordingConsumer::new(&log);
    failing.fail_with("render target gone");

    let subject = Subject::new();
    subject.add_subscriber(first.handle());
    subject.add_subscriber(failing.handle());
    subject.add_subscriber(skipped.handle());

    let err = subject.broadcast_in(&synchronous()).unwrap_err();

    assert!(matches!(err, RippleError::ReactionFailed { .. }));
    assert!(err.to_string().contains("render target gone"));
    assert_eq!(log.ids(), vec![first.id(), failing.id()]);
    assert_eq!(log.count_of(skipped.id()), 0);
    // nothing is rolled back or unsubscribed
    assert_eq!(subject.subscriber_count(), 3);
}

#[test]
fn hook_error_is_returned_unchanged() {
    let log = ReactionLog::new();
    let c = RecordingConsumer::new(&log);
    c.on_react(|| Err(RippleError::user_error(io::Error::other("disk full"))));
    let subject = Subject::new();
    subject.add_subscriber(c.handle());

    let err = subject.broadcast().unwrap_err();

    assert!(matches!(err, RippleError::UserError(_)));
    assert_eq!(err.to_string(), "User error: disk full");
}
