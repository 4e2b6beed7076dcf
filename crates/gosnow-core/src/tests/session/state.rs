use crate::{RecordingState, Transition};

const STATES: [RecordingState; 4] = [
    RecordingState::Idle,
    RecordingState::Recording,
    RecordingState::Paused,
    RecordingState::Stopped,
];

const TRANSITIONS: [Transition; 4] = [
    Transition::Start,
    Transition::Pause,
    Transition::Resume,
    Transition::Stop,
];

fn expected(state: RecordingState, transition: Transition) -> Option<RecordingState> {
    match (state, transition) {
        (RecordingState::Idle, Transition::Start) => Some(RecordingState::Recording),
        (RecordingState::Recording, Transition::Pause) => Some(RecordingState::Paused),
        (RecordingState::Paused, Transition::Resume) => Some(RecordingState::Recording),
        (RecordingState::Recording, Transition::Stop) => Some(RecordingState::Stopped),
        (RecordingState::Paused, Transition::Stop) => Some(RecordingState::Stopped),
        _ => None,
    }
}

/// WHAT: Every state/transition pair matches the lifecycle table
/// WHY: Anything outside the table must be a no-op
#[test]
fn given_every_state_when_applying_every_transition_then_matches_table() {
    for state in STATES {
        for transition in TRANSITIONS {
            assert_eq!(
                state.apply(transition),
                expected(state, transition),
                "{state} + {transition:?}"
            );
        }
    }
}

/// WHAT: A full session walk ends back at Idle
/// WHY: Stopped is transient and settles to Idle
#[test]
fn given_idle_when_walking_full_session_then_settles_idle() {
    // Given: Idle
    let mut state = RecordingState::Idle;

    // When: start, pause, resume, pause, stop
    for transition in [
        Transition::Start,
        Transition::Pause,
        Transition::Resume,
        Transition::Pause,
        Transition::Stop,
    ] {
        state = state.apply(transition).unwrap_or(state);
    }

    // Then: Stopped, which settles to Idle
    assert_eq!(state, RecordingState::Stopped);
    assert_eq!(state.settled(), RecordingState::Idle);
}

/// WHAT: Only recording and paused count as active
/// WHY: Drives the fast polling cadence
#[test]
fn given_states_when_checking_active_then_only_open_sessions() {
    assert!(!RecordingState::Idle.is_active());
    assert!(RecordingState::Recording.is_active());
    assert!(RecordingState::Paused.is_active());
    assert!(!RecordingState::Stopped.is_active());
}
