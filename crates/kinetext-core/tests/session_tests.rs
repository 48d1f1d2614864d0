mod common;

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;

use common::RecordingTarget;
use kinetext_core::{Engine, EngineError, SessionState};

#[test]
fn test_start_pushes_text_and_zero_visible() {
    let engine = Engine::default();
    let result = engine.compile("{wait 0.5}Hi{/wait}").unwrap();
    let mut target = RecordingTarget::new();
    let session = engine.start(result, &mut target);

    assert_eq!(target.text, "Hi");
    assert_eq!(target.visible, 0);
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn test_wait_delays_reveal_then_zero_steps_consume_atomically() {
    let engine = Engine::default();
    let result = engine.compile("{wait 0.5}Hi{/wait}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    let complete = session.update(0.25, &mut target).unwrap();
    assert!(!complete);
    assert_eq!(target.visible, 0);

    // Crossing the wait consumes it and both zero-duration reveals together.
    let complete = session.update(0.25, &mut target).unwrap();
    assert!(complete);
    assert_eq!(target.visible, 2);
    assert_eq!(session.state(), SessionState::Complete);
}

#[test]
fn test_fractional_progress_carries_over() {
    let engine = Engine::default();
    let result = engine
        .compile("{charbychar duration=0.25}AB{/charbychar}")
        .unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.125, &mut target).unwrap();
    assert_eq!(target.visible, 0);

    session.update(0.125, &mut target).unwrap();
    assert_eq!(target.visible, 1);

    session.update(0.125, &mut target).unwrap();
    assert_eq!(target.visible, 1);

    let complete = session.update(0.125, &mut target).unwrap();
    assert_eq!(target.visible, 2);
    assert!(complete);
    assert_relative_eq!(session.elapsed_time(), 0.5);
}

#[test]
fn test_large_delta_consumes_multiple_instructions() {
    let engine = Engine::default();
    let result = engine
        .compile("{charbychar duration=0.25}ABCD{/charbychar}")
        .unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.75, &mut target).unwrap();
    assert_eq!(target.visible, 3);
}

#[test]
fn test_reveal_time_is_stamped_at_instruction_start() {
    // The character's reveal instruction spans [0, 0.5); the fade measures
    // elapsed-since-reveal from the instruction's start, so right after
    // consumption the fade has already advanced half its 1s ramp.
    let engine = Engine::default();
    let result = engine
        .compile("{fadein duration=1}{charbychar duration=0.5}A{/charbychar}{/fadein}")
        .unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.5, &mut target).unwrap();
    assert_eq!(target.visible, 1);
    let color = target.color_of(0).unwrap();
    assert_relative_eq!(color.a, 0.5);
}

#[test]
fn test_session_without_effects_completes_when_exhausted() {
    let engine = Engine::default();
    let result = engine.compile("Hi").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    let complete = session.update(0.0, &mut target).unwrap();
    assert!(complete);
    assert_eq!(target.visible, 2);
}

#[test]
fn test_session_with_effects_keeps_draining_after_full_reveal() {
    let engine = Engine::default();
    let result = engine.compile("{wave}Hi{/wave}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    for _ in 0..5 {
        let complete = session.update(0.25, &mut target).unwrap();
        assert!(!complete);
    }
    assert_eq!(session.state(), SessionState::Draining);
    assert_eq!(target.visible, 2);
}

#[test]
fn test_effects_with_no_characters_complete_immediately() {
    let engine = Engine::default();
    let result = engine.compile("{wave}{/wave}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    assert_eq!(session.state(), SessionState::Complete);
    assert!(session.update(1.0, &mut target).unwrap());
}

#[test]
fn test_complete_session_still_rerenders() {
    let engine = Engine::default();
    let result = engine.compile("Hi").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.0, &mut target).unwrap();
    let frames = target.frames_begun;
    assert!(session.update(1.0, &mut target).unwrap());
    assert_eq!(target.frames_begun, frames + 1);
    assert_eq!(target.visible, 2);
}

#[test]
fn test_negative_or_nan_delta_is_rejected() {
    let engine = Engine::default();
    let result = engine.compile("Hi").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    let err = session.update(-0.1, &mut target).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument { .. }));
    let err = session.update(f32::NAN, &mut target).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument { .. }));
    // The rejected calls mutated nothing.
    assert_relative_eq!(session.elapsed_time(), 0.0);
}

#[test]
fn test_reveal_character_is_idempotent_for_visibility() {
    let engine = Engine::default();
    let result = engine.compile("{wait 9}Hi{/wait}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.reveal_character(1, None).unwrap();
    assert_eq!(session.visible_characters(), 2);

    session.update(0.25, &mut target).unwrap();
    let before = target.color_of(1).unwrap().clone();

    // Repeat reveal: same visible count, same reveal clock, same output.
    session.reveal_character(1, None).unwrap();
    session.update(0.0, &mut target).unwrap();
    assert_eq!(session.visible_characters(), 2);
    assert_eq!(target.color_of(1).unwrap(), &before);
}

#[test]
fn test_reveal_character_callback_fires_every_call() {
    let engine = Engine::default();
    let result = engine.compile("{wait 9}Hi{/wait}").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    let fired: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let callback: kinetext_core::RevealCallback = Rc::new(move |index| sink.borrow_mut().push(index));

    session.reveal_character(0, Some(&callback)).unwrap();
    session.reveal_character(0, Some(&callback)).unwrap();
    assert_eq!(*fired.borrow(), vec![0, 0]);
}

#[test]
fn test_reveal_character_out_of_range_errors() {
    let engine = Engine::default();
    let result = engine.compile("Hi").unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    let err = session.reveal_character(2, None).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument { .. }));
}

#[test]
fn test_event_callbacks_fire_on_timed_reveals() {
    let mut engine = Engine::default();
    let fired: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    engine.register_callback("tick", Rc::new(move |index| sink.borrow_mut().push(index)));

    let result = engine
        .compile("{event name=tick}{charbychar duration=0.25}ab{/charbychar}{/event}")
        .unwrap();
    let mut target = RecordingTarget::new();
    let mut session = engine.start(result, &mut target);

    session.update(0.25, &mut target).unwrap();
    assert_eq!(*fired.borrow(), vec![0]);
    session.update(0.25, &mut target).unwrap();
    assert_eq!(*fired.borrow(), vec![0, 1]);
}
