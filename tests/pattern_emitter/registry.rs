use crate::support::Recorder;
use regex_emitter::{EmitterError, PatternEmitter, Regex, Subscription};

fn re(source: &str) -> Regex {
    Regex::new(source).unwrap()
}

#[test]
fn removing_last_pattern_listener_drops_the_pattern() {
    let emitter = PatternEmitter::new();
    let recorder = Recorder::new();
    let a = recorder.listener("a");
    let b = recorder.listener("b");
    emitter.on(re("^t"), a.clone()).unwrap();
    emitter.on(re("^t"), b.clone()).unwrap();

    emitter.off(re("^t"), &a).unwrap();
    assert_eq!(emitter.event_names().unwrap(), vec![Subscription::pattern("^t").unwrap()]);

    emitter.off(re("^t"), &b).unwrap();
    assert!(emitter.event_names().unwrap().is_empty());
    assert!(!emitter.emit("test", &[]).unwrap());
}

#[test]
fn removing_an_absent_listener_is_a_no_op() {
    let emitter = PatternEmitter::new();
    let recorder = Recorder::new();
    emitter.on("a", recorder.listener("a")).unwrap();
    emitter.on(re("^a"), recorder.listener("pattern")).unwrap();

    let stranger = recorder.listener("stranger");
    emitter.remove_listener("a", &stranger).unwrap();
    emitter.remove_listener("missing", &stranger).unwrap();
    emitter.remove_pattern_listener("^zzz", &stranger).unwrap();

    assert_eq!(emitter.listener_count("a").unwrap(), 1);
    assert_eq!(emitter.pattern_listener_count(re("^a")).unwrap(), 1);
}

#[test]
fn removal_takes_the_first_instance_of_a_listener() {
    let emitter = PatternEmitter::new();
    let recorder = Recorder::new();
    let twice = recorder.listener("twice");
    emitter.on("test", twice.clone()).unwrap();
    emitter.on("test", twice.clone()).unwrap();

    emitter.off("test", &twice).unwrap();
    emitter.emit("test", &[]).unwrap();
    assert_eq!(recorder.count("twice"), 1);
}

#[test]
fn remove_all_listeners_clears_one_key() {
    let emitter = PatternEmitter::new();
    let recorder = Recorder::new();
    emitter.on_pattern(".*", recorder.listener("any-1")).unwrap();
    emitter.on_pattern(".*", recorder.listener("any-2")).unwrap();
    emitter.on("test", recorder.listener("literal")).unwrap();

    emitter.remove_all_pattern_listeners(".*").unwrap();
    assert_eq!(emitter.matching_listener_count("test").unwrap(), 1);
    assert_eq!(emitter.event_names().unwrap(), vec![Subscription::from("test")]);

    emitter.remove_all_listeners("test").unwrap();
    assert!(!emitter.emit("test", &[]).unwrap());
}

#[test]
fn clear_removes_every_subscription() {
    let emitter = PatternEmitter::new();
    let recorder = Recorder::new();
    emitter.on("a", recorder.listener("a")).unwrap();
    emitter.on(re("^b"), recorder.listener("b")).unwrap();

    emitter.clear().unwrap();
    assert!(emitter.event_names().unwrap().is_empty());
}

#[test]
fn listeners_returns_the_exact_bucket() {
    let emitter = PatternEmitter::new();
    let recorder = Recorder::new();
    let literal = recorder.listener("literal");
    let pattern = recorder.listener("pattern");
    emitter.on("test", literal.clone()).unwrap();
    emitter.on(re("^t"), pattern.clone()).unwrap();

    assert_eq!(emitter.listeners("test").unwrap(), vec![literal]);
    assert_eq!(emitter.listeners(re("^t")).unwrap(), vec![pattern.clone()]);
    assert_eq!(emitter.pattern_listeners(re("^t")).unwrap(), vec![pattern]);
    assert!(emitter.listeners("nothing").unwrap().is_empty());
}

#[test]
fn pattern_only_calls_reject_literal_keys() {
    let emitter = PatternEmitter::new();
    assert_eq!(
        emitter.pattern_listeners("test").unwrap_err(),
        EmitterError::NotAPattern("test".into())
    );
}

#[test]
fn invalid_pattern_source_is_a_contract_error() {
    let emitter = PatternEmitter::new();
    let recorder = Recorder::new();

    let err = emitter.on_pattern("[a-", recorder.listener("x")).unwrap_err();
    assert!(matches!(err, EmitterError::InvalidPattern { .. }));
    assert!(emitter.once_on_pattern("[a-", recorder.listener("x")).is_err());
    assert!(emitter.event_names().unwrap().is_empty());
}

#[test]
fn clones_share_one_registry() {
    let emitter = PatternEmitter::new();
    let handle = emitter.clone();
    let recorder = Recorder::new();
    handle.on(re("^a"), recorder.listener("a")).unwrap();

    assert!(emitter.emit("abc", &[]).unwrap());
    assert_eq!(recorder.len(), 1);
}
