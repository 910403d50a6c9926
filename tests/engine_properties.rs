//! Property tests for the timer engine.
//!
//! Random operation sequences on random templates must keep the engine
//! state consistent after every single step.

use std::sync::Arc;

use proptest::prelude::*;

use focusplan::timer::metrics::{interval_progress_percent, session_progress_percent};
use focusplan::timer::{ManualClock, RecordingNotifier, TimerEngine};
use focusplan::types::{Interval, IntervalKind, SessionTemplate, TimerStatus};

#[derive(Debug, Clone)]
enum Op {
    Play,
    Pause,
    Toggle,
    Reset,
    Skip,
    /// Move the clock forward by this many milliseconds, then tick
    Elapse(i64),
    /// Move the clock backwards, then tick
    Rewind(i64),
    Reload,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Play),
        1 => Just(Op::Pause),
        1 => Just(Op::Toggle),
        1 => Just(Op::Reset),
        1 => Just(Op::Skip),
        6 => (0i64..5_000).prop_map(Op::Elapse),
        1 => (0i64..3_000).prop_map(Op::Rewind),
        1 => Just(Op::Reload),
    ]
}

fn template_strategy() -> impl Strategy<Value = SessionTemplate> {
    proptest::collection::vec((0u32..120, any::<bool>()), 0..6).prop_map(|specs| {
        SessionTemplate {
            id: "prop".to_string(),
            name: "Generated".to_string(),
            intervals: specs
                .into_iter()
                .enumerate()
                .map(|(i, (duration, work))| {
                    let kind = if work {
                        IntervalKind::Work
                    } else {
                        IntervalKind::Break
                    };
                    Interval::new(format!("I{i}"), duration, kind)
                })
                .collect(),
            created_at: 0,
        }
    })
}

fn check_invariants(engine: &TimerEngine) -> Result<(), TestCaseError> {
    let state = engine.state();

    prop_assert_eq!(engine.is_ticking(), state.running);
    if state.running {
        prop_assert!(state.is_playable());
    }

    match state.template.as_ref() {
        Some(template) if !template.is_empty() => {
            prop_assert!(state.current_index < template.len());
            let duration = template.intervals[state.current_index].duration;
            prop_assert!(state.remaining_seconds <= duration);
        }
        _ => {
            prop_assert_eq!(engine.status(), TimerStatus::Idle);
            prop_assert!(!state.running);
            prop_assert_eq!(state.current_index, 0);
            prop_assert_eq!(state.remaining_seconds, 0);
        }
    }

    let interval = interval_progress_percent(state);
    let session = session_progress_percent(state);
    prop_assert!((0.0..=100.0).contains(&interval));
    prop_assert!((0.0..=100.0).contains(&session));
    Ok(())
}

proptest! {
    #[test]
    fn engine_state_stays_consistent(
        template in template_strategy(),
        ops in proptest::collection::vec(op_strategy(), 1..200),
    ) {
        let clock = ManualClock::new(1_000_000);
        let recorder = RecordingNotifier::new();
        let mut engine = TimerEngine::new(clock.clone(), recorder.clone());
        let template = Arc::new(template);
        engine.load_template(Arc::clone(&template));
        check_invariants(&engine)?;

        for op in ops {
            let completed_before = recorder.completed_count();
            match op {
                Op::Play => engine.play(),
                Op::Pause => engine.pause(),
                Op::Toggle => engine.toggle(),
                Op::Reset => engine.reset(),
                Op::Skip => engine.skip_interval(),
                Op::Elapse(ms) => {
                    clock.advance(ms);
                    engine.tick();
                }
                Op::Rewind(ms) => {
                    clock.advance(-ms);
                    engine.tick();
                }
                Op::Reload => engine.load_template(Arc::clone(&template)),
            }
            check_invariants(&engine)?;

            if recorder.completed_count() > completed_before {
                prop_assert!(!engine.state().running);
                prop_assert_eq!(engine.state().current_index, 0);
            }
        }

        if template.is_empty() {
            prop_assert!(recorder.events().is_empty());
        }
    }

    #[test]
    fn idle_engine_ignores_everything(ops in proptest::collection::vec(op_strategy(), 1..50)) {
        let clock = ManualClock::new(0);
        let recorder = RecordingNotifier::new();
        let mut engine = TimerEngine::new(clock.clone(), recorder.clone());

        for op in ops {
            match op {
                Op::Play | Op::Toggle => engine.toggle(),
                Op::Pause => engine.pause(),
                Op::Reset => engine.reset(),
                Op::Skip | Op::Reload => engine.skip_interval(),
                Op::Elapse(ms) | Op::Rewind(ms) => {
                    clock.advance(ms);
                    engine.tick();
                }
            }
            prop_assert_eq!(engine.status(), TimerStatus::Idle);
            check_invariants(&engine)?;
        }
        prop_assert!(recorder.events().is_empty());
    }

    #[test]
    fn ticking_never_drifts(gaps in proptest::collection::vec(1i64..400, 1..500)) {
        let clock = ManualClock::new(0);
        let mut engine = TimerEngine::new(clock.clone(), RecordingNotifier::new());
        engine.load_template(Arc::new(SessionTemplate {
            id: "long".to_string(),
            name: "Long".to_string(),
            intervals: vec![Interval::new("Focus", 3600, IntervalKind::Work)],
            created_at: 0,
        }));
        engine.play();

        let mut now = 0i64;
        for gap in gaps {
            now += gap;
            clock.set(now);
            engine.tick();
            prop_assert_eq!(engine.state().remaining_seconds, 3600 - (now / 1000) as u32);
        }
    }
}
